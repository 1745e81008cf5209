use std::path::Path;

use crate::error::SeedError;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 1;

/// Loads the layered `.env` files for the active profile.
///
/// Returns the files that were found, in load order. Missing files are
/// skipped; later files override earlier ones.
pub fn load_environment() -> Result<Vec<&'static str>, SeedError> {
    let is_production =
        std::env::var("SEED_PROFILE").unwrap_or("development".to_string()) == "production";

    let env_files = if is_production {
        vec!["config/common.env", "config/prod.env", ".secrets.env"]
    } else {
        vec!["config/common.env", "config/dev.env", ".secrets.env"]
    };

    let mut loaded = Vec::new();
    for env_file in env_files {
        if load_env_file(env_file)? {
            loaded.push(env_file);
        }
    }

    Ok(loaded)
}

fn load_env_file(path: &str) -> Result<bool, SeedError> {
    if !Path::new(path).exists() {
        return Ok(false);
    }

    dotenvy::from_filename_override(path)?;
    Ok(true)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub create_if_missing: bool,
}

impl SeedConfig {
    pub fn new(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            create_if_missing: true,
        }
    }

    pub fn from_env() -> Result<Self, SeedError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| SeedError::Config("DATABASE_URL is not set".to_string()))?;

        if database_url.trim().is_empty() {
            return Err(SeedError::Config("DATABASE_URL is empty".to_string()));
        }

        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                SeedError::Config(format!(
                    "DATABASE_MAX_CONNECTIONS must be a positive integer, got '{}'",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let create_if_missing = std::env::var("DATABASE_CREATE_IF_MISSING")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        Ok(Self {
            database_url,
            max_connections,
            create_if_missing,
        })
    }
}
