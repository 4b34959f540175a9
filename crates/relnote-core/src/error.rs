use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelnoteError {
    #[error("Invalid dedup thresholds: {0}")]
    InvalidThresholds(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RelnoteError>;
