//! Error types for faketories.

use thiserror::Error;

/// Result type alias for faketory operations.
pub type Result<T> = std::result::Result<T, FaketoryError>;

/// Errors that can occur while generating or storing fake entities.
#[derive(Error, Debug)]
pub enum FaketoryError {
    /// An entity or partial does not fit the collection's schema.
    #[error("validation failed for {collection}: {message}")]
    Validation { collection: String, message: String },

    /// A partial override was not a JSON object.
    #[error("partial override must be an object, got {0}")]
    InvalidPartial(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FaketoryError {
    pub(crate) fn validation(collection: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            collection: collection.to_string(),
            message: message.into(),
        }
    }
}
