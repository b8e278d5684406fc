//! Error types for inbox operations

use thiserror::Error;

/// Errors that can occur while loading or configuring the inbox
///
/// Aggregation and thread lookup cannot fail; these errors only arise at the
/// snapshot boundary and during configuration.
#[derive(Error, Debug)]
pub enum InboxError {
    #[error("Message {message_id} has no thread key")]
    MissingThreadKey { message_id: String },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
