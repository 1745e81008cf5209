use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::SeedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChallengeStatus {
    New,
    Draft,
    Approved,
    Active,
    Completed,
    Deleted,
    Cancelled,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::New => "NEW",
            ChallengeStatus::Draft => "DRAFT",
            ChallengeStatus::Approved => "APPROVED",
            ChallengeStatus::Active => "ACTIVE",
            ChallengeStatus::Completed => "COMPLETED",
            ChallengeStatus::Deleted => "DELETED",
            ChallengeStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for ChallengeStatus {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(ChallengeStatus::New),
            "DRAFT" => Ok(ChallengeStatus::Draft),
            "APPROVED" => Ok(ChallengeStatus::Approved),
            "ACTIVE" => Ok(ChallengeStatus::Active),
            "COMPLETED" => Ok(ChallengeStatus::Completed),
            "DELETED" => Ok(ChallengeStatus::Deleted),
            "CANCELLED" => Ok(ChallengeStatus::Cancelled),
            _ => Err(SeedError::Internal(format!("Unknown challenge status: {}", s))),
        }
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an upsert inserted a new row or found one already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    Existing,
}

impl UpsertOutcome {
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows > 0 {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Existing
        }
    }
}

#[derive(Debug, Clone)]
pub struct Upserted<T> {
    pub row: T,
    pub outcome: UpsertOutcome,
}

fn parse_id(entity: &str, raw: Option<String>) -> Result<Uuid, SeedError> {
    let raw = raw.unwrap_or_default();
    Uuid::parse_str(&raw)
        .map_err(|e| SeedError::Internal(format!("Invalid {} id '{}': {}", entity, raw, e)))
}

fn to_utc(column: &str, value: Option<NaiveDateTime>) -> Result<DateTime<Utc>, SeedError> {
    value
        .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
        .ok_or_else(|| SeedError::Internal(format!("Missing {} timestamp", column)))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: ChallengeStatus,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Clone, Default)]
pub struct DbChallenge {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl TryFrom<DbChallenge> for Challenge {
    type Error = SeedError;

    fn try_from(db: DbChallenge) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id("challenge", db.id)?,
            name: db.name.unwrap_or_default(),
            description: db.description.unwrap_or_default(),
            status: db.status.unwrap_or_default().parse()?,
            created_by: db.created_by.unwrap_or_default(),
            updated_by: db.updated_by.unwrap_or_default(),
            created_at: to_utc("created_at", db.created_at)?,
            updated_at: to_utc("updated_at", db.updated_at)?,
        })
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewChallenge {
    pub id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Challenge name is required"))]
    pub name: String,
    pub description: String,
    pub status: ChallengeStatus,
    #[validate(length(min = 1, message = "createdBy is required"))]
    pub created_by: String,
    #[validate(length(min = 1, message = "updatedBy is required"))]
    pub updated_by: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRole {
    pub id: Uuid,
    pub name: String,
    pub name_lower: String,
    pub full_read_access: bool,
    pub full_write_access: bool,
    pub is_active: bool,
    pub self_obtainable: bool,
    pub legacy_id: Option<i64>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Clone, Default)]
pub struct DbResourceRole {
    pub id: Option<String>,
    pub name: Option<String>,
    pub name_lower: Option<String>,
    pub full_read_access: Option<bool>,
    pub full_write_access: Option<bool>,
    pub is_active: Option<bool>,
    pub self_obtainable: Option<bool>,
    pub legacy_id: Option<i64>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl TryFrom<DbResourceRole> for ResourceRole {
    type Error = SeedError;

    fn try_from(db: DbResourceRole) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id("resource role", db.id)?,
            name: db.name.unwrap_or_default(),
            name_lower: db.name_lower.unwrap_or_default(),
            full_read_access: db.full_read_access.unwrap_or_default(),
            full_write_access: db.full_write_access.unwrap_or_default(),
            is_active: db.is_active.unwrap_or_default(),
            self_obtainable: db.self_obtainable.unwrap_or_default(),
            legacy_id: db.legacy_id,
            created_by: db.created_by.unwrap_or_default(),
            updated_by: db.updated_by.unwrap_or_default(),
            created_at: to_utc("created_at", db.created_at)?,
            updated_at: to_utc("updated_at", db.updated_at)?,
        })
    }
}

/// Insert payload for a resource role.
///
/// `name_lower` is derived from `name` by [`NewResourceRole::new`]; a payload
/// built by hand with a mismatching value fails validation.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_name_lower"))]
pub struct NewResourceRole {
    pub id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Role name is required"))]
    pub name: String,
    pub name_lower: String,
    pub full_read_access: bool,
    pub full_write_access: bool,
    pub is_active: bool,
    pub self_obtainable: bool,
    pub legacy_id: Option<i64>,
    #[validate(length(min = 1, message = "createdBy is required"))]
    pub created_by: String,
    #[validate(length(min = 1, message = "updatedBy is required"))]
    pub updated_by: String,
}

impl NewResourceRole {
    pub fn new(id: Uuid, name: &str, author: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            name_lower: name.to_lowercase(),
            full_read_access: false,
            full_write_access: false,
            is_active: true,
            self_obtainable: false,
            legacy_id: None,
            created_by: author.to_string(),
            updated_by: author.to_string(),
        }
    }

    pub fn access(mut self, full_read: bool, full_write: bool) -> Self {
        self.full_read_access = full_read;
        self.full_write_access = full_write;
        self
    }

    pub fn self_obtainable(mut self, self_obtainable: bool) -> Self {
        self.self_obtainable = self_obtainable;
        self
    }

    pub fn legacy_id(mut self, legacy_id: i64) -> Self {
        self.legacy_id = Some(legacy_id);
        self
    }
}

fn validate_name_lower(role: &NewResourceRole) -> Result<(), ValidationError> {
    if role.name_lower != role.name.to_lowercase() {
        let mut error = ValidationError::new("name_lower_mismatch");
        error.message = Some(
            format!(
                "nameLower '{}' must equal the lower-cased name '{}'",
                role.name_lower,
                role.name.to_lowercase()
            )
            .into(),
        );
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    pub challenge_id: Uuid,
    pub member_id: String,
    pub member_handle: String,
    pub role_id: Uuid,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Clone, Default)]
pub struct DbResource {
    pub id: Option<String>,
    pub challenge_id: Option<String>,
    pub member_id: Option<String>,
    pub member_handle: Option<String>,
    pub role_id: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl TryFrom<DbResource> for Resource {
    type Error = SeedError;

    fn try_from(db: DbResource) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id("resource", db.id)?,
            challenge_id: parse_id("challenge", db.challenge_id)?,
            member_id: db.member_id.unwrap_or_default(),
            member_handle: db.member_handle.unwrap_or_default(),
            role_id: parse_id("resource role", db.role_id)?,
            created_by: db.created_by.unwrap_or_default(),
            updated_by: db.updated_by.unwrap_or_default(),
            created_at: to_utc("created_at", db.created_at)?,
            updated_at: to_utc("updated_at", db.updated_at)?,
        })
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewResource {
    pub challenge_id: Uuid,
    pub role_id: Uuid,
    #[validate(length(min = 1, message = "memberId is required"))]
    pub member_id: String,
    #[validate(length(min = 1, message = "memberHandle is required"))]
    pub member_handle: String,
    #[validate(length(min = 1, message = "createdBy is required"))]
    pub created_by: String,
    #[validate(length(min = 1, message = "updatedBy is required"))]
    pub updated_by: String,
}

/// Resource rows that share challenge, role and member.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateResources {
    pub challenge_id: String,
    pub role_id: String,
    pub member_id: String,
    pub copies: i64,
}
