//! Message and conversation types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display fields duplicated onto each message of a showing request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadMetadata {
    /// Property address or other label for the thread
    #[serde(default)]
    pub label: Option<String>,
    /// Showing request status, e.g. "pending" or "confirmed"
    #[serde(default)]
    pub status: Option<String>,
}

/// A single message between two participants of a showing request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub thread_key: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,

    /// Unread while `None`
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub thread_metadata: Option<ThreadMetadata>,
}

impl Message {
    /// Whether this message counts as unread for `viewer`
    ///
    /// Only messages addressed to the viewer are ever unread for them; an
    /// absent viewer matches nothing.
    pub fn is_unread_for(&self, viewer: Option<&str>) -> bool {
        match viewer {
            Some(viewer) => self.receiver_id == viewer && self.read_at.is_none(),
            None => false,
        }
    }

    /// Thread label carried by this message; blank counts as absent
    pub fn label(&self) -> Option<&str> {
        non_blank(self.thread_metadata.as_ref()?.label.as_deref())
    }

    /// Thread status carried by this message; blank counts as absent
    pub fn status(&self) -> Option<&str> {
        non_blank(self.thread_metadata.as_ref()?.status.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Message record as delivered by the message store
///
/// Identical to [`Message`] except that the thread key may be missing. Records
/// are turned into messages by [`crate::snapshot`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub id: String,
    #[serde(default)]
    pub thread_key: Option<String>,
    pub sender_id: String,
    pub receiver_id: String,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thread_metadata: Option<ThreadMetadata>,
}

impl RawMessage {
    /// Attach a thread key, producing a [`Message`]
    pub fn with_thread_key(self, thread_key: String) -> Message {
        Message {
            id: self.id,
            thread_key,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            content: self.content,
            created_at: self.created_at,
            read_at: self.read_at,
            thread_metadata: self.thread_metadata,
        }
    }
}

/// Conversation view derived from the messages of one thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub thread_key: String,
    pub display_label: String,
    pub status: String,
    /// Messages in input order, not necessarily chronological
    pub messages: Vec<Message>,
    pub last_activity_at: DateTime<Utc>,
    pub unread_count: usize,
}

impl Conversation {
    /// Most recent message of the thread (earliest in input order on ties)
    pub fn latest_message(&self) -> Option<&Message> {
        self.messages.iter().fold(None::<&Message>, |latest, msg| match latest {
            Some(current) if current.created_at >= msg.created_at => Some(current),
            _ => Some(msg),
        })
    }

    pub fn is_unread(&self) -> bool {
        self.unread_count > 0
    }
}
