//! Tourdesk Inbox - conversation threads for showing-request messages
//!
//! This crate turns the flat message list fetched for one user into the
//! conversation list rendered by an inbox: one thread per showing request,
//! most recent activity first, with unread counts computed for the viewer.
//!
//! # Architecture
//!
//! - **models**: `Message`, `ThreadMetadata`, `Conversation` and the boundary `RawMessage`
//! - **conversations**: `build_conversations` groups, dates and counts threads
//! - **thread**: `messages_for_thread` selects the messages of one thread
//! - **snapshot**: `MessageSource` trait and the `JsonSnapshot` boundary
//! - **error**: `InboxError`
//!
//! Everything here is a pure, synchronous computation over a snapshot the
//! caller already holds. Conversations are views; they are rebuilt on every
//! call and never persisted.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use tourdesk_inbox::{build_conversations, messages_for_thread, JsonSnapshot, MessageSource};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let snapshot = JsonSnapshot::from_path("messages.json");
//! let messages = snapshot.fetch_all()?;
//!
//! for conv in build_conversations(&messages, Some("user-1")) {
//!     println!("{} ({} unread)", conv.display_label, conv.unread_count);
//! }
//!
//! let thread = messages_for_thread(&messages, "showing-42");
//! # Ok(())
//! # }
//! ```

pub mod conversations;
pub mod error;
pub mod models;
pub mod snapshot;
pub mod thread;

pub use conversations::{build_conversations, build_conversations_with, total_unread};
pub use error::InboxError;
pub use models::{Conversation, Message, RawMessage, ThreadMetadata};
pub use snapshot::{resolve_records, JsonSnapshot, MessageSource};
pub use thread::{messages_for_thread, thread_messages};

/// Label used when no message of a thread carries one
pub const UNKNOWN_LABEL: &str = "Unknown Property";

/// Status used when no message of a thread carries one
pub const UNKNOWN_STATUS: &str = "unknown";

/// What to do with a boundary record that has no thread key
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MissingThreadPolicy {
    /// Fail the whole snapshot with `InboxError::MissingThreadKey`
    #[default]
    Reject,
    /// File the record under the given key
    GroupUnder(String),
}

impl MissingThreadPolicy {
    /// A `GroupUnder` key must itself be a usable thread key
    pub fn validate(&self) -> Result<(), InboxError> {
        if let Self::GroupUnder(key) = self {
            if key.trim().is_empty() {
                return Err(InboxError::InvalidConfig(
                    "Fallback thread key cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Configuration for conversation building
#[derive(Debug, Clone)]
pub struct InboxConfig {
    /// Display label for threads without one (default: "Unknown Property")
    pub unknown_label: String,

    /// Status for threads without one (default: "unknown")
    pub unknown_status: String,

    /// Handling of records without a thread key (default: reject), applied
    /// by [`JsonSnapshot::with_config`]
    pub missing_thread_policy: MissingThreadPolicy,
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            unknown_label: UNKNOWN_LABEL.to_string(),
            unknown_status: UNKNOWN_STATUS.to_string(),
            missing_thread_policy: MissingThreadPolicy::Reject,
        }
    }
}

impl InboxConfig {
    /// Validates the configuration
    ///
    /// Sentinels must be non-blank so a defaulted thread is still
    /// distinguishable in the rendered list, and a `GroupUnder` key must be
    /// usable as a thread key.
    pub fn validate(&self) -> Result<(), InboxError> {
        if self.unknown_label.trim().is_empty() {
            return Err(InboxError::InvalidConfig(
                "Unknown label cannot be empty".to_string(),
            ));
        }
        if self.unknown_status.trim().is_empty() {
            return Err(InboxError::InvalidConfig(
                "Unknown status cannot be empty".to_string(),
            ));
        }
        self.missing_thread_policy.validate()
    }
}
