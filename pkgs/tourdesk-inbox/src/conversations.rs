//! Conversation building - groups messages into threads with unread counts

use crate::models::{Conversation, Message};
use crate::InboxConfig;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

/// Running state for one thread while the input is folded
struct ThreadAccumulator {
    label: Option<String>,
    status: Option<String>,
    messages: Vec<Message>,
    last_activity_at: DateTime<Utc>,
    unread_count: usize,
}

impl ThreadAccumulator {
    fn new(first_seen_at: DateTime<Utc>) -> Self {
        Self {
            label: None,
            status: None,
            messages: Vec::new(),
            last_activity_at: first_seen_at,
            unread_count: 0,
        }
    }

    fn fold(&mut self, msg: &Message, viewer: Option<&str>) {
        // First value seen for each display field sticks
        if self.label.is_none() {
            self.label = msg.label().map(str::to_string);
        }
        if self.status.is_none() {
            self.status = msg.status().map(str::to_string);
        }

        self.last_activity_at = self.last_activity_at.max(msg.created_at);

        if msg.is_unread_for(viewer) {
            self.unread_count += 1;
        }

        self.messages.push(msg.clone());
    }

    fn into_conversation(self, thread_key: &str, config: &InboxConfig) -> Conversation {
        Conversation {
            thread_key: thread_key.to_string(),
            display_label: self
                .label
                .unwrap_or_else(|| config.unknown_label.clone()),
            status: self
                .status
                .unwrap_or_else(|| config.unknown_status.clone()),
            messages: self.messages,
            last_activity_at: self.last_activity_at,
            unread_count: self.unread_count,
        }
    }
}

/// Build the conversation list for `viewer` using the default sentinels
///
/// See [`build_conversations_with`].
pub fn build_conversations(messages: &[Message], viewer: Option<&str>) -> Vec<Conversation> {
    build_conversations_with(messages, viewer, &InboxConfig::default())
}

/// Build the conversation list for `viewer`
///
/// Messages are grouped by thread key in a single pass over the input, which
/// need not be sorted. Each conversation keeps its messages in input order,
/// tracks the latest `created_at` seen, and counts the messages addressed to
/// the viewer that have no `read_at`. With no viewer every count is zero.
///
/// The result is ordered by last activity, newest first; threads with equal
/// last activity are ordered by thread key ascending.
pub fn build_conversations_with(
    messages: &[Message],
    viewer: Option<&str>,
    config: &InboxConfig,
) -> Vec<Conversation> {
    let mut threads: IndexMap<&str, ThreadAccumulator> = IndexMap::new();

    for msg in messages {
        threads
            .entry(msg.thread_key.as_str())
            .or_insert_with(|| ThreadAccumulator::new(msg.created_at))
            .fold(msg, viewer);
    }

    let mut conversations: Vec<Conversation> = threads
        .into_iter()
        .map(|(thread_key, acc)| acc.into_conversation(thread_key, config))
        .collect();

    conversations.sort_by(|a, b| {
        b.last_activity_at
            .cmp(&a.last_activity_at)
            .then_with(|| a.thread_key.cmp(&b.thread_key))
    });

    debug!(
        "Built {} conversations from {} messages",
        conversations.len(),
        messages.len()
    );
    conversations
}

/// Total unread messages across conversations, e.g. for an inbox badge
pub fn total_unread(conversations: &[Conversation]) -> usize {
    conversations.iter().map(|c| c.unread_count).sum()
}
