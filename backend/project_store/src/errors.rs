//! Application-wide error types.

use thiserror::Error;
use usergy_wizard::ValidationError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Project {0} not found")]
    NotFound(String),

    #[error("Invalid payload: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Corrupt row for project {id}: {reason}")]
    CorruptRow { id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;
