use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tourdesk_inbox::{
    build_conversations_with, messages_for_thread, total_unread, Conversation, InboxConfig,
    JsonSnapshot, Message, MessageSource, MissingThreadPolicy,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tourdesk", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List conversations, most recent first
    Conversations {
        #[command(flatten)]
        source: SourceArgs,

        /// Viewer whose unread messages are counted
        #[arg(short, long)]
        viewer: Option<String>,

        /// Label for threads without one
        #[arg(long, default_value = tourdesk_inbox::UNKNOWN_LABEL)]
        unknown_label: String,

        /// Status for threads without one
        #[arg(long, default_value = tourdesk_inbox::UNKNOWN_STATUS)]
        unknown_status: String,
    },
    /// Show the messages of one thread in snapshot order
    Thread {
        #[command(flatten)]
        source: SourceArgs,

        /// Thread key (showing request id)
        #[arg(short, long)]
        thread: String,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// JSON file holding the message snapshot
    #[arg(short, long)]
    snapshot: PathBuf,

    /// File records without a thread key under this key instead of failing
    #[arg(long)]
    orphan_thread: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl SourceArgs {
    fn policy(&self) -> MissingThreadPolicy {
        match &self.orphan_thread {
            Some(key) => MissingThreadPolicy::GroupUnder(key.clone()),
            None => MissingThreadPolicy::Reject,
        }
    }

    fn load(&self, config: &InboxConfig) -> Result<Vec<Message>> {
        JsonSnapshot::from_path(&self.snapshot)
            .with_config(config)?
            .fetch_all()
            .with_context(|| format!("Failed to load snapshot {}", self.snapshot.display()))
    }
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Command::Conversations {
            source,
            viewer,
            unknown_label,
            unknown_status,
        } => {
            let config = InboxConfig {
                unknown_label,
                unknown_status,
                missing_thread_policy: source.policy(),
            };
            let messages = source.load(&config)?;
            let conversations = build_conversations_with(&messages, viewer.as_deref(), &config);
            info!(
                "{} conversations for viewer {:?}",
                conversations.len(),
                viewer
            );

            if source.json {
                println!("{}", serde_json::to_string_pretty(&conversations)?);
            } else {
                print!("{}", render_conversations(&conversations));
            }
        }
        Command::Thread { source, thread } => {
            let config = InboxConfig {
                missing_thread_policy: source.policy(),
                ..Default::default()
            };
            let messages = source.load(&config)?;
            let thread_messages = messages_for_thread(&messages, &thread);

            if source.json {
                println!("{}", serde_json::to_string_pretty(&thread_messages)?);
            } else {
                print!("{}", render_thread(&thread, &thread_messages));
            }
        }
    }

    Ok(())
}

fn render_conversations(conversations: &[Conversation]) -> String {
    let mut out = String::new();

    for conv in conversations {
        out.push_str(&format!(
            "{} [{}] {} - {} message(s), {} unread, last activity {}\n",
            conv.thread_key,
            conv.status,
            conv.display_label,
            conv.messages.len(),
            conv.unread_count,
            conv.last_activity_at.to_rfc3339(),
        ));
        if let Some(latest) = conv.latest_message() {
            out.push_str(&format!("    {}: {}\n", latest.sender_id, latest.content));
        }
    }
    out.push_str(&format!("Total unread: {}\n", total_unread(conversations)));

    out
}

fn render_thread(thread: &str, messages: &[Message]) -> String {
    if messages.is_empty() {
        return format!("No messages in thread {}\n", thread);
    }

    let mut out = String::new();
    for msg in messages {
        let state = if msg.read_at.is_some() { "read" } else { "unread" };
        out.push_str(&format!(
            "{} {} -> {} ({}): {}\n",
            msg.created_at.to_rfc3339(),
            msg.sender_id,
            msg.receiver_id,
            state,
            msg.content
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tourdesk_inbox::build_conversations;

    fn message(id: &str, thread: &str, secs: i64) -> Message {
        Message {
            id: id.to_string(),
            thread_key: thread.to_string(),
            sender_id: "agent".to_string(),
            receiver_id: "buyer".to_string(),
            content: format!("hello {}", id),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            read_at: None,
            thread_metadata: None,
        }
    }

    #[test]
    fn test_cli_parses_conversations() {
        let cli = Cli::try_parse_from([
            "tourdesk",
            "conversations",
            "--snapshot",
            "messages.json",
            "--viewer",
            "buyer",
            "--orphan-thread",
            "unassigned",
        ])
        .unwrap();

        match cli.command {
            Command::Conversations {
                source,
                viewer,
                unknown_label,
                ..
            } => {
                assert_eq!(viewer.as_deref(), Some("buyer"));
                assert_eq!(unknown_label, "Unknown Property");
                assert_eq!(
                    source.policy(),
                    MissingThreadPolicy::GroupUnder("unassigned".to_string())
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_thread_requires_key() {
        assert!(Cli::try_parse_from(["tourdesk", "thread", "--snapshot", "m.json"]).is_err());
    }

    #[test]
    fn test_render_conversations() {
        let messages = vec![message("1", "A", 100), message("2", "B", 200)];
        let out = render_conversations(&build_conversations(&messages, Some("buyer")));

        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("B [unknown] Unknown Property"));
        assert!(lines[1].contains("hello 2"));
        assert!(lines[2].starts_with("A "));
        assert_eq!(lines.last(), Some(&"Total unread: 2"));
    }

    #[test]
    fn test_render_empty_thread() {
        assert_eq!(render_thread("A", &[]), "No messages in thread A\n");
    }
}
