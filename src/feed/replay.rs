// Replay feed: load a JSON Lines transcript and deliver it as history
//
// Each line is either a channel record or a message record:
//
//   {"id": "C1", "name": "general", "kind": "public"}
//   {"channel": "C1", "id": "1700000000.000100", "author": "ann", "text": "hi",
//    "ts": "2024-05-02T08:30:00+02:00"}
//   {"channel": "C1", "id": "1700000000.000200", "parent_id": "1700000000.000100",
//    "author": "bob", "text": "hey"}
//
// Messages may name channels that have no channel record; those channels are
// created on the fly with the id as name. Blank lines are skipped. A line that
// does not parse is reported and skipped, the rest of the file still loads.

use super::{FeedChannels, MessageIds};
use crate::chat::{Channel, ChannelKind, ChannelRef, Message, MessageStyle};
use crate::events::ChatEvent;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// One line of a transcript
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Record {
    Message(MessageRecord),
    Channel(Channel),
}

#[derive(Debug, Deserialize)]
struct MessageRecord {
    channel: String,
    id: String,
    parent_id: Option<String>,
    author: Option<String>,
    text: String,
    ts: Option<DateTime<Local>>,
}

/// A parsed transcript, ready to hand to the session
#[derive(Debug, Default)]
pub struct Transcript {
    /// Channels in first-seen order
    pub channels: Vec<ChannelRef>,
    pub messages: Vec<Message>,
    /// `(line number, error)` for lines that were skipped
    pub skipped: Vec<(usize, String)>,
}

impl Transcript {
    /// Parse a transcript from any buffered reader
    pub fn parse(reader: impl BufRead, style: &MessageStyle) -> Result<Self> {
        let mut transcript = Transcript::default();
        let mut by_id: HashMap<String, ChannelRef> = HashMap::new();

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<Record>(&line) {
                Ok(Record::Channel(channel)) => {
                    let channel = channel.shared();
                    match transcript.channels.iter().position(|c| c.id == channel.id) {
                        Some(i) => transcript.channels[i] = ChannelRef::clone(&channel),
                        None => transcript.channels.push(ChannelRef::clone(&channel)),
                    }
                    by_id.insert(channel.id.clone(), channel);
                }
                Ok(Record::Message(record)) => {
                    let channel = transcript.channel_for(&mut by_id, &record.channel);
                    transcript.messages.push(record.into_message(channel, style));
                }
                Err(e) => transcript.skipped.push((line_no, e.to_string())),
            }
        }

        Ok(transcript)
    }

    /// Parse a transcript file
    pub fn load(path: &Path, style: &MessageStyle) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open transcript {}", path.display()))?;
        Self::parse(std::io::BufReader::new(file), style)
    }

    /// Id source for messages posted after this transcript
    pub(crate) fn message_ids(&self) -> MessageIds {
        MessageIds::after(self.messages.iter().map(|m| m.id.as_str()))
    }

    fn channel_for(&mut self, by_id: &mut HashMap<String, ChannelRef>, id: &str) -> ChannelRef {
        if let Some(channel) = by_id.get(id) {
            return ChannelRef::clone(channel);
        }
        let channel = Channel::new(id, id, ChannelKind::Public).shared();
        by_id.insert(id.to_string(), ChannelRef::clone(&channel));
        self.channels.push(ChannelRef::clone(&channel));
        channel
    }
}

impl MessageRecord {
    fn into_message(self, channel: ChannelRef, style: &MessageStyle) -> Message {
        let mut message = Message::new(self.id, channel, self.text).with_style(style.clone());
        if let Some(author) = self.author {
            message = message.with_author(author);
        }
        if let Some(ts) = self.ts {
            message = message.with_timestamp(ts);
        }
        if let Some(parent) = self.parent_id {
            message = message.with_parent(parent);
        }
        message
    }
}

/// Load the transcript, deliver it, then echo outgoing messages until shutdown
pub async fn run(path: PathBuf, channels: FeedChannels, style: MessageStyle) {
    let FeedChannels {
        events,
        outgoing,
        shutdown,
    } = channels;

    // File IO off the async runtime
    let load_style = style.clone();
    let loaded = tokio::task::spawn_blocking(move || Transcript::load(&path, &load_style)).await;

    let transcript = match loaded {
        Ok(Ok(transcript)) => transcript,
        Ok(Err(e)) => {
            tracing::error!("Replay failed: {:#}", e);
            let _ = events.send(ChatEvent::Error(format!("{:#}", e))).await;
            return;
        }
        Err(e) => {
            tracing::error!("Replay task failed: {}", e);
            return;
        }
    };

    for (line_no, error) in &transcript.skipped {
        tracing::warn!("Transcript line {} skipped: {}", line_no, error);
    }
    tracing::info!(
        "Loaded {} message(s) in {} channel(s)",
        transcript.messages.len(),
        transcript.channels.len()
    );

    let mut ids = transcript.message_ids();
    let channel_list = transcript
        .channels
        .iter()
        .map(|c| c.as_ref().clone())
        .collect();
    if events
        .send(ChatEvent::ChannelsLoaded(channel_list))
        .await
        .is_err()
    {
        return;
    }
    if events
        .send(ChatEvent::History(transcript.messages))
        .await
        .is_err()
    {
        return;
    }

    super::echo_outgoing(&events, outgoing, shutdown, &style, &mut ids).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatConfig;
    use crate::events::OutgoingMessage;
    use crate::feed::echo_event;
    use crate::session::ChatSession;

    const TRANSCRIPT: &str = r#"
{"id": "C1", "name": "general"}
{"id": "D1", "name": "maria", "kind": "direct"}
{"channel": "C1", "id": "1700000000.000100", "author": "ann", "text": "root", "ts": "2024-05-02T08:30:00Z"}
{"channel": "C1", "id": "1700000000.000200", "parent_id": "1700000000.000100", "author": "bob", "text": "re"}
not json at all
{"channel": "C9", "id": "1700000000.000300", "text": "orphan channel"}
{"channel": "D1", "id": "1700000000.000400", "author": "maria", "text": "psst"}
"#;

    fn parse(text: &str) -> Transcript {
        Transcript::parse(text.as_bytes(), &MessageStyle::default()).unwrap()
    }

    #[test]
    fn test_parses_channels_and_messages() {
        let t = parse(TRANSCRIPT);

        let names: Vec<&str> = t.channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["general", "maria", "C9"]);
        assert_eq!(t.channels[1].kind, ChannelKind::Direct);

        assert_eq!(t.messages.len(), 4);
        assert!(t.messages[0].timestamp.is_some());
        assert_eq!(t.messages[1].parent_id.as_deref(), Some("1700000000.000100"));
        assert!(t.messages[2].author.is_none());
        assert_eq!(t.messages[3].channel.id, "D1");
    }

    #[test]
    fn test_bad_lines_are_skipped_not_fatal() {
        let t = parse(TRANSCRIPT);
        assert_eq!(t.skipped.len(), 1);
        assert_eq!(t.skipped[0].0, 6);
    }

    #[test]
    fn test_replayed_history_threads_replies() {
        let t = parse(TRANSCRIPT);
        let mut session = ChatSession::new(&ChatConfig::default());
        session.register_channels(&t.channels);
        session.set_messages(t.messages);

        assert_eq!(session.store().len(), 3);
        assert!(session.store().has_existing_replies("1700000000.000100"));
        assert_eq!(session.current_channel_label(), "(1) maria");
        assert_eq!(
            session.channel_listing(),
            vec!["(0) general", "(1) maria", "(2) C9"]
        );
    }

    fn replayed_session(t: Transcript) -> ChatSession {
        let mut session = ChatSession::new(&ChatConfig::default());
        session.register_channels(&t.channels);
        session.set_messages(t.messages);
        session
    }

    fn deliver_typed(session: &mut ChatSession, ids: &mut MessageIds, channel: ChannelRef) {
        let sent = OutgoingMessage {
            channel,
            thread_key: None,
            text: "typed just now".to_string(),
        };
        let ChatEvent::Message {
            message,
            thread_key,
        } = echo_event(sent, &MessageStyle::default(), ids)
        else {
            panic!("echo should be a message delivery");
        };
        session.deliver_message(message, thread_key.as_deref());
    }

    #[test]
    fn test_message_typed_after_replay_is_last() {
        let t = parse(TRANSCRIPT);
        let mut ids = t.message_ids();
        let general = ChannelRef::clone(&t.channels[0]);
        let mut session = replayed_session(t);

        deliver_typed(&mut session, &mut ids, general);

        let texts: Vec<&str> = session
            .store()
            .ordered_view()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, vec!["root", "orphan channel", "psst", "typed just now"]);
    }

    #[test]
    fn test_messages_typed_after_unusual_ids_are_last() {
        let t = parse(
            r#"
{"channel": "C1", "id": "1700000000.000100", "text": "old"}
{"channel": "C1", "id": "4000000000.000000", "text": "from the future"}
{"channel": "C1", "id": "legacy-9", "text": "odd id"}
"#,
        );
        let mut ids = t.message_ids();
        let channel = ChannelRef::clone(&t.channels[0]);
        let mut session = replayed_session(t);

        deliver_typed(&mut session, &mut ids, ChannelRef::clone(&channel));
        deliver_typed(&mut session, &mut ids, channel);

        let view: Vec<&Message> = session.store().ordered_view().collect();
        assert_eq!(view.len(), 5);
        assert_eq!(view[2].text, "odd id");
        assert!(view[3..].iter().all(|m| m.text == "typed just now"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Transcript::load(
            Path::new("/nonexistent/chatterm/transcript.jsonl"),
            &MessageStyle::default(),
        );
        assert!(result.is_err());
    }
}
