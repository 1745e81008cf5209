use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::SeedError;

pub const CURRENT_SCHEMA: &str = r#"
PRAGMA foreign_keys = 1;

CREATE TABLE IF NOT EXISTS challenge (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'NEW'
        CHECK (status IN ('NEW', 'DRAFT', 'APPROVED', 'ACTIVE', 'COMPLETED', 'DELETED', 'CANCELLED')),
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS resource_role (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    name_lower TEXT NOT NULL UNIQUE,
    full_read_access BOOLEAN NOT NULL DEFAULT FALSE,
    full_write_access BOOLEAN NOT NULL DEFAULT FALSE,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    self_obtainable BOOLEAN NOT NULL DEFAULT FALSE,
    legacy_id INTEGER,
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS resource (
    id TEXT PRIMARY KEY NOT NULL,
    challenge_id TEXT NOT NULL,
    member_id TEXT NOT NULL,
    member_handle TEXT NOT NULL,
    role_id TEXT NOT NULL,
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (challenge_id) REFERENCES challenge (id),
    FOREIGN KEY (role_id) REFERENCES resource_role (id)
);

CREATE INDEX IF NOT EXISTS resource_challenge_id_idx ON resource (challenge_id);
CREATE INDEX IF NOT EXISTS resource_role_id_idx ON resource (role_id);
"#;

/// Creates the seeded tables when they are missing. Existing tables are left
/// as they are.
#[instrument(skip(pool))]
pub async fn apply_schema(pool: &Pool<Sqlite>) -> Result<(), SeedError> {
    info!("Ensuring seed tables exist");
    sqlx::raw_sql(CURRENT_SCHEMA).execute(pool).await?;
    Ok(())
}
