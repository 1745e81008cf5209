use opentelemetry_semantic_conventions::{attribute::OTEL_STATUS_CODE, trace::ERROR_TYPE};
use thiserror::Error;
use tracing::{Span, error, warn};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SeedError {
    pub fn kind(&self) -> &'static str {
        match self {
            SeedError::Database(_) => "database_error",
            SeedError::Validation(_) => "validation_error",
            SeedError::NotFound(_) => "not_found_error",
            SeedError::Config(_) => "configuration_error",
            SeedError::Internal(_) => "internal_error",
        }
    }

    pub fn log_and_record(&self, ctx: &str) {
        let current_span = Span::current();
        let is_valid_span = !current_span.is_none();

        let message = self.to_string();
        match self {
            SeedError::Database(err) => {
                error!(error = %message, context = %ctx, db_error = %err, "Database error");
            }
            SeedError::Validation(msg) => {
                warn!(message = %msg, context = %ctx, "Validation error");
            }
            SeedError::NotFound(msg) => {
                warn!(message = %msg, context = %ctx, "Not found error");
            }
            SeedError::Config(msg) => {
                error!(message = %msg, context = %ctx, "Configuration error");
            }
            SeedError::Internal(msg) => {
                error!(message = %msg, context = %ctx, "Internal error");
            }
        }

        if is_valid_span {
            current_span.record("error", tracing::field::display(true));
            current_span.record(ERROR_TYPE, tracing::field::display(self.kind()));
            current_span.record("error.message", tracing::field::display(&message));
            current_span.record(OTEL_STATUS_CODE, tracing::field::display("ERROR"));
        }
    }
}

impl From<validator::ValidationErrors> for SeedError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SeedError::Validation(errors.to_string())
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(error: serde_json::Error) -> Self {
        SeedError::Internal(format!("Serialization error: {}", error))
    }
}

impl From<std::io::Error> for SeedError {
    fn from(error: std::io::Error) -> Self {
        SeedError::Internal(format!("Output error: {}", error))
    }
}

impl From<dotenvy::Error> for SeedError {
    fn from(error: dotenvy::Error) -> Self {
        SeedError::Config(format!("Environment file error: {}", error))
    }
}
