//! Snapshot boundary - loads the full message list held by the message store

use crate::error::InboxError;
use crate::models::{Message, RawMessage};
use crate::{InboxConfig, MissingThreadPolicy};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Supplier of the complete message list for one viewer
///
/// There is no pagination or incremental sync: every call returns the whole
/// current snapshot, which is then aggregated from scratch.
pub trait MessageSource {
    fn fetch_all(&self) -> Result<Vec<Message>, InboxError>;
}

impl MessageSource for Vec<Message> {
    fn fetch_all(&self) -> Result<Vec<Message>, InboxError> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone)]
enum SnapshotData {
    Path(PathBuf),
    Inline(String),
}

/// A JSON array of message records, read from a file or held inline
#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    data: SnapshotData,
    policy: MissingThreadPolicy,
}

impl JsonSnapshot {
    /// Snapshot read from `path` on every fetch
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            data: SnapshotData::Path(path.into()),
            policy: MissingThreadPolicy::default(),
        }
    }

    /// Snapshot over an in-memory JSON document
    pub fn from_json(json: impl Into<String>) -> Self {
        Self {
            data: SnapshotData::Inline(json.into()),
            policy: MissingThreadPolicy::default(),
        }
    }

    /// Set the handling of records without a thread key
    pub fn with_policy(mut self, policy: MissingThreadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate `config` and take the missing thread key handling from it
    pub fn with_config(self, config: &InboxConfig) -> Result<Self, InboxError> {
        config.validate()?;
        Ok(self.with_policy(config.missing_thread_policy.clone()))
    }

    fn read_records(&self) -> Result<Vec<RawMessage>, InboxError> {
        let records: Vec<RawMessage> = match &self.data {
            SnapshotData::Path(path) => {
                let json = std::fs::read_to_string(path)?;
                let records: Vec<RawMessage> = serde_json::from_str(&json)?;
                info!(
                    "Loaded {} message records from {}",
                    records.len(),
                    path.display()
                );
                records
            }
            SnapshotData::Inline(json) => serde_json::from_str(json)?,
        };

        Ok(records)
    }
}

impl MessageSource for JsonSnapshot {
    fn fetch_all(&self) -> Result<Vec<Message>, InboxError> {
        resolve_records(self.read_records()?, &self.policy)
    }
}

/// Turn boundary records into messages, applying `policy` to records whose
/// thread key is missing or blank
pub fn resolve_records(
    records: Vec<RawMessage>,
    policy: &MissingThreadPolicy,
) -> Result<Vec<Message>, InboxError> {
    policy.validate()?;

    let mut messages = Vec::with_capacity(records.len());
    let mut orphans = 0usize;

    for mut record in records {
        let thread_key = record
            .thread_key
            .take()
            .filter(|key| !key.trim().is_empty());

        let thread_key = match (thread_key, policy) {
            (Some(key), _) => key,
            (None, MissingThreadPolicy::Reject) => {
                return Err(InboxError::MissingThreadKey {
                    message_id: record.id,
                });
            }
            (None, MissingThreadPolicy::GroupUnder(fallback)) => {
                orphans += 1;
                fallback.clone()
            }
        };

        messages.push(record.with_thread_key(thread_key));
    }

    if orphans > 0 {
        warn!("{} message records had no thread key", orphans);
    }
    debug!("Resolved {} messages", messages.len());

    Ok(messages)
}
