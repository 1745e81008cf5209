use std::process::ExitCode;

use anyhow::Context;
use challenge_seeder::env::{SeedConfig, load_environment};
use challenge_seeder::seed::run;
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

    let telemetry = match init_tracing() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise tracing: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for file in loaded {
        info!("Loaded environment from: {}", file);
    }
    if telemetry.exporting() {
        info!("Exporting spans to Honeycomb");
    }

    let code = match seed_database().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    };

    drop(telemetry);
    code
}

async fn seed_database() -> anyhow::Result<()> {
    let config = SeedConfig::from_env().context("Failed to read database configuration")?;

    info!("Starting challenge seeder");
    let mut stdout = std::io::stdout();
    run(&config, &mut stdout)
        .await
        .inspect_err(|e| e.log_and_record("Seeding database"))
        .context("Failed to seed database")?;

    Ok(())
}
