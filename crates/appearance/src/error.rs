//! Error types for the appearance model

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppearanceError>;

#[derive(Error, Debug)]
pub enum AppearanceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Preference store error: {0}")]
    Store(String),
}
