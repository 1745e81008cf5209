use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::env::SeedConfig;
use crate::error::SeedError;
use crate::models::{
    Challenge, DbChallenge, DbResource, DbResourceRole, DuplicateResources, NewChallenge,
    NewResource, NewResourceRole, Resource, ResourceRole, UpsertOutcome, Upserted,
};

#[instrument(skip(config), fields(max_connections = config.max_connections))]
pub async fn connect(config: &SeedConfig) -> Result<Pool<Sqlite>, SeedError> {
    info!("Connecting to database");
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(config.create_if_missing)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

#[instrument(skip(pool))]
pub async fn disconnect(pool: Pool<Sqlite>) {
    pool.close().await;
    info!("Database connection closed");
}

#[instrument(skip(pool))]
pub async fn get_challenge(pool: &Pool<Sqlite>, id: Uuid) -> Result<Challenge, SeedError> {
    info!("Fetching challenge by ID");
    let row = sqlx::query_as::<_, DbChallenge>(
        "SELECT id, name, description, status, created_by, updated_by, created_at, updated_at
         FROM challenge WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(challenge) => Challenge::try_from(challenge),
        _ => Err(SeedError::NotFound(format!(
            "Challenge with id {} not found in database",
            id
        ))),
    }
}

#[instrument(skip(pool, challenge), fields(challenge_id = %challenge.id))]
pub async fn upsert_challenge(
    pool: &Pool<Sqlite>,
    challenge: &NewChallenge,
) -> Result<Upserted<Challenge>, SeedError> {
    info!("Upserting challenge");
    challenge.validate()?;

    // Conflicting rows are left untouched.
    let res = sqlx::query(
        "INSERT INTO challenge (id, name, description, status, created_by, updated_by)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(challenge.id.to_string())
    .bind(&challenge.name)
    .bind(&challenge.description)
    .bind(challenge.status.as_str())
    .bind(&challenge.created_by)
    .bind(&challenge.updated_by)
    .execute(pool)
    .await?;

    let outcome = UpsertOutcome::from_rows_affected(res.rows_affected());
    info!(outcome = ?outcome, "Challenge upserted");

    let row = get_challenge(pool, challenge.id).await?;
    Ok(Upserted { row, outcome })
}

#[instrument(skip(pool))]
pub async fn get_resource_role(pool: &Pool<Sqlite>, id: Uuid) -> Result<ResourceRole, SeedError> {
    info!("Fetching resource role by ID");
    let row = sqlx::query_as::<_, DbResourceRole>(
        "SELECT id, name, name_lower, full_read_access, full_write_access, is_active,
                self_obtainable, legacy_id, created_by, updated_by, created_at, updated_at
         FROM resource_role WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(role) => ResourceRole::try_from(role),
        _ => Err(SeedError::NotFound(format!(
            "Resource role with id {} not found in database",
            id
        ))),
    }
}

#[instrument(skip(pool, role), fields(role_id = %role.id, name = %role.name))]
pub async fn upsert_resource_role(
    pool: &Pool<Sqlite>,
    role: &NewResourceRole,
) -> Result<Upserted<ResourceRole>, SeedError> {
    info!("Upserting resource role");
    role.validate()?;

    let res = sqlx::query(
        "INSERT INTO resource_role
         (id, name, name_lower, full_read_access, full_write_access, is_active,
          self_obtainable, legacy_id, created_by, updated_by)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(role.id.to_string())
    .bind(&role.name)
    .bind(&role.name_lower)
    .bind(role.full_read_access)
    .bind(role.full_write_access)
    .bind(role.is_active)
    .bind(role.self_obtainable)
    .bind(role.legacy_id)
    .bind(&role.created_by)
    .bind(&role.updated_by)
    .execute(pool)
    .await?;

    let outcome = UpsertOutcome::from_rows_affected(res.rows_affected());
    info!(outcome = ?outcome, "Resource role upserted");

    let row = get_resource_role(pool, role.id).await?;
    Ok(Upserted { row, outcome })
}

#[instrument(skip(pool))]
pub async fn get_resource(pool: &Pool<Sqlite>, id: Uuid) -> Result<Resource, SeedError> {
    info!("Fetching resource by ID");
    let row = sqlx::query_as::<_, DbResource>(
        "SELECT id, challenge_id, member_id, member_handle, role_id,
                created_by, updated_by, created_at, updated_at
         FROM resource WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(resource) => Resource::try_from(resource),
        _ => Err(SeedError::NotFound(format!(
            "Resource with id {} not found in database",
            id
        ))),
    }
}

/// Inserts a new resource row with a freshly generated id.
///
/// There is no uniqueness check: calling this twice with the same payload
/// stores two rows.
#[instrument(skip(pool, resource), fields(challenge_id = %resource.challenge_id, role_id = %resource.role_id))]
pub async fn create_resource(
    pool: &Pool<Sqlite>,
    resource: &NewResource,
) -> Result<Resource, SeedError> {
    info!("Creating resource");
    resource.validate()?;

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO resource
         (id, challenge_id, member_id, member_handle, role_id, created_by, updated_by)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id.to_string())
    .bind(resource.challenge_id.to_string())
    .bind(&resource.member_id)
    .bind(&resource.member_handle)
    .bind(resource.role_id.to_string())
    .bind(&resource.created_by)
    .bind(&resource.updated_by)
    .execute(pool)
    .await?;

    get_resource(pool, id).await
}

#[instrument(skip(pool))]
pub async fn get_resources_for_challenge(
    pool: &Pool<Sqlite>,
    challenge_id: Uuid,
) -> Result<Vec<Resource>, SeedError> {
    info!("Getting resources for challenge");
    let rows = sqlx::query_as::<_, DbResource>(
        "SELECT id, challenge_id, member_id, member_handle, role_id,
                created_by, updated_by, created_at, updated_at
         FROM resource
         WHERE challenge_id = ?
         ORDER BY created_at, id",
    )
    .bind(challenge_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Resource::try_from).collect()
}

#[instrument(skip(pool))]
pub async fn count_challenges(pool: &Pool<Sqlite>) -> Result<i64, SeedError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM challenge")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[instrument(skip(pool))]
pub async fn count_resource_roles(pool: &Pool<Sqlite>) -> Result<i64, SeedError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM resource_role")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[instrument(skip(pool))]
pub async fn count_resources(pool: &Pool<Sqlite>) -> Result<i64, SeedError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM resource")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[instrument(skip(pool))]
pub async fn find_duplicate_resources(
    pool: &Pool<Sqlite>,
) -> Result<Vec<DuplicateResources>, SeedError> {
    info!("Looking for duplicate resources");
    let rows = sqlx::query_as::<_, DuplicateResources>(
        "SELECT challenge_id, role_id, member_id, COUNT(*) AS copies
         FROM resource
         GROUP BY challenge_id, role_id, member_id
         HAVING COUNT(*) > 1
         ORDER BY copies DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
