use std::process::ExitCode;

use challenge_seeder::db::{connect, disconnect};
use challenge_seeder::env::{SeedConfig, load_environment};
use challenge_seeder::error::SeedError;
use challenge_seeder::models::DuplicateResources;
use challenge_seeder::seed::{CHALLENGE_ID, RESOURCE_ROLE_ID, SeedStatus, inspect};
use challenge_seeder::telemetry::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let loaded = match load_environment() {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Failed to load environment: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _telemetry = match init_tracing() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise tracing: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for file in loaded {
        info!("Loaded environment from: {}", file);
    }

    let status = match get_seed_status().await {
        Ok(status) => status,
        Err(e) => {
            e.log_and_record("Inspecting seed data");
            eprintln!("Failed to inspect seed data: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print_presence("Challenge", &CHALLENGE_ID.to_string(), status.challenge.is_some());
    print_presence(
        "ResourceRole",
        &RESOURCE_ROLE_ID.to_string(),
        status.resource_role.is_some(),
    );
    println!(
        "Resources referencing the seeded challenge: {} (of {} total)",
        status.resources_for_challenge, status.total_resources
    );

    if status.duplicates.is_empty() {
        println!("No duplicate resources ✓");
    } else {
        println!("Duplicate resources detected:");
        print_duplicates(&status.duplicates);
    }

    if status.is_seeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_presence(entity: &str, id: &str, present: bool) {
    let mark = if present { "present ✓" } else { "missing ✗" };
    println!("{} {}: {}", entity, id, mark);
}

fn print_duplicates(duplicates: &[DuplicateResources]) {
    for dup in duplicates {
        println!(
            "    {} copies for member {} (challenge {}, role {})",
            dup.copies, dup.member_id, dup.challenge_id, dup.role_id
        );
    }
}

async fn get_seed_status() -> Result<SeedStatus, SeedError> {
    let config = SeedConfig {
        create_if_missing: false,
        ..SeedConfig::from_env()?
    };

    let pool = connect(&config).await?;
    let status = inspect(&pool).await;
    disconnect(pool).await;

    status
}
