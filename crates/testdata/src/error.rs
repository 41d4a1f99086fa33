//! Error types for test-data management

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error(transparent)]
    Common(#[from] fixturekit_common::Error),

    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    #[error("Fixture not found: {0}")]
    NotFound(String),

    #[error("Invalid fixture path component: {0}")]
    InvalidPath(String),

    #[error("Cleanup failed in {backend}: {reason}")]
    Cleanup { backend: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DataResult<T> = Result<T, DataError>;
