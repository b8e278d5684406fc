//! Thread lookup

use crate::models::Message;

/// Messages of one thread, in their original relative order
///
/// Returns an empty vector when nothing matches.
pub fn messages_for_thread(messages: &[Message], thread_key: &str) -> Vec<Message> {
    thread_messages(messages, thread_key).cloned().collect()
}

/// Borrowing form of [`messages_for_thread`]
pub fn thread_messages<'a>(
    messages: &'a [Message],
    thread_key: &'a str,
) -> impl Iterator<Item = &'a Message> + 'a {
    messages
        .iter()
        .filter(move |msg| msg.thread_key == thread_key)
}
