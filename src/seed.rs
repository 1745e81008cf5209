//! The seeding routine: one Challenge, one ResourceRole and one Resource
//! that references both, written in that order.

use std::io::Write;

use serde::Serialize;
use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::{
    connect, count_resources, create_resource, disconnect, find_duplicate_resources,
    get_challenge, get_resource_role, get_resources_for_challenge, upsert_challenge,
    upsert_resource_role,
};
use crate::env::SeedConfig;
use crate::error::SeedError;
use crate::models::{
    Challenge, ChallengeStatus, DuplicateResources, NewChallenge, NewResource, NewResourceRole,
    Resource, ResourceRole, Upserted,
};
use crate::schema::apply_schema;

pub const CHALLENGE_ID: Uuid = Uuid::from_u128(0x123e4567_e89b_12d3_a456_426614174000);
pub const RESOURCE_ROLE_ID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440000);
pub const SEED_AUTHOR: &str = "user1";

pub fn challenge_seed() -> NewChallenge {
    NewChallenge {
        id: CHALLENGE_ID,
        name: "Sample Challenge".to_string(),
        description: "A test challenge".to_string(),
        status: ChallengeStatus::New,
        created_by: SEED_AUTHOR.to_string(),
        updated_by: SEED_AUTHOR.to_string(),
    }
}

pub fn resource_role_seed() -> NewResourceRole {
    NewResourceRole::new(RESOURCE_ROLE_ID, "Developer", SEED_AUTHOR)
        .access(true, true)
        .self_obtainable(false)
        .legacy_id(1001)
}

pub fn resource_seed() -> NewResource {
    NewResource {
        challenge_id: CHALLENGE_ID,
        role_id: RESOURCE_ROLE_ID,
        member_id: "member1".to_string(),
        member_handle: "handle1".to_string(),
        created_by: SEED_AUTHOR.to_string(),
        updated_by: SEED_AUTHOR.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct SeedReport {
    pub challenge: Upserted<Challenge>,
    pub resource_role: Upserted<ResourceRole>,
    pub resource: Resource,
}

fn print_row<W: Write, T: Serialize>(out: &mut W, label: &str, row: &T) -> Result<(), SeedError> {
    writeln!(out, "{}: {}", label, serde_json::to_string_pretty(row)?)?;
    Ok(())
}

/// Writes the seed rows through `pool`, printing each result to `out`.
///
/// The first failure stops the sequence; nothing after it runs.
#[instrument(skip_all)]
pub async fn seed<W: Write>(pool: &Pool<Sqlite>, out: &mut W) -> Result<SeedReport, SeedError> {
    let challenge = upsert_challenge(pool, &challenge_seed()).await?;
    print_row(out, "Upserted Challenge", &challenge.row)?;

    let resource_role = upsert_resource_role(pool, &resource_role_seed()).await?;
    print_row(out, "Upserted ResourceRole", &resource_role.row)?;

    let resource = create_resource(pool, &resource_seed()).await?;
    print_row(out, "Created Resource", &resource)?;

    info!(
        challenge = ?challenge.outcome,
        resource_role = ?resource_role.outcome,
        resource_id = %resource.id,
        "Seeding complete"
    );

    Ok(SeedReport {
        challenge,
        resource_role,
        resource,
    })
}

/// Connects, ensures the tables exist and seeds. The pool is closed before
/// returning whether or not seeding succeeded.
#[instrument(skip_all)]
pub async fn run<W: Write>(config: &SeedConfig, out: &mut W) -> Result<SeedReport, SeedError> {
    let pool = connect(config).await?;

    let result = async {
        apply_schema(&pool).await?;
        seed(&pool, out).await
    }
    .await;

    disconnect(pool).await;
    result
}

/// What a database currently holds of the seed data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedStatus {
    pub challenge: Option<Challenge>,
    pub resource_role: Option<ResourceRole>,
    pub resources_for_challenge: usize,
    pub total_resources: i64,
    pub duplicates: Vec<DuplicateResources>,
}

impl SeedStatus {
    pub fn is_seeded(&self) -> bool {
        self.challenge.is_some() && self.resource_role.is_some()
    }
}

fn found<T>(result: Result<T, SeedError>) -> Result<Option<T>, SeedError> {
    match result {
        Ok(row) => Ok(Some(row)),
        Err(SeedError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

#[instrument(skip(pool))]
pub async fn inspect(pool: &Pool<Sqlite>) -> Result<SeedStatus, SeedError> {
    info!("Inspecting seed data");
    let challenge = found(get_challenge(pool, CHALLENGE_ID).await)?;
    let resource_role = found(get_resource_role(pool, RESOURCE_ROLE_ID).await)?;
    let resources_for_challenge = get_resources_for_challenge(pool, CHALLENGE_ID).await?.len();
    let total_resources = count_resources(pool).await?;
    let duplicates = find_duplicate_resources(pool).await?;

    Ok(SeedStatus {
        challenge,
        resource_role,
        resources_for_challenge,
        total_resources,
        duplicates,
    })
}
