//! Chat message model
//!
//! A message is either top-level or a reply nested one level below a
//! top-level message. Replies are kept in id order, and ids sort
//! chronologically (they are timestamp-derived strings).

use super::channel::ChannelRef;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;

/// Marker shown in front of the body of a threaded reply
pub const THREAD_MARKER: &str = "↳ ";

/// Style tokens for the four independently styled fragments of a message
///
/// Tokens use the `fg-red,bg-black,fg-bold` grammar understood by
/// [`crate::chat::style::parse_style_token`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageStyle {
    pub time: String,
    pub thread: String,
    pub name: String,
    pub text: String,
}

/// A single chat message
#[derive(Debug, Clone)]
pub struct Message {
    /// Sortable id; lexicographic order equals chronological order
    pub id: String,
    /// Parent message id for thread replies
    pub parent_id: Option<String>,
    /// Whether this message is nested inside another message's replies
    pub is_reply: bool,
    /// Replies keyed by id
    pub replies: BTreeMap<String, Message>,
    /// Channel this message was posted in
    pub channel: ChannelRef,
    pub author: Option<String>,
    pub text: String,
    /// Thread continuation marker, empty for top-level messages
    pub thread_marker: String,
    pub timestamp: Option<DateTime<Local>>,
    pub style: MessageStyle,
}

impl Message {
    pub fn new(id: impl Into<String>, channel: ChannelRef, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            is_reply: false,
            replies: BTreeMap::new(),
            channel,
            author: None,
            text: text.into(),
            thread_marker: String::new(),
            timestamp: None,
            style: MessageStyle::default(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_style(mut self, style: MessageStyle) -> Self {
        self.style = style;
        self
    }

    /// Replies in id order
    pub fn ordered_replies(&self) -> impl Iterator<Item = &Message> {
        self.replies.values()
    }

    pub fn has_replies(&self) -> bool {
        !self.replies.is_empty()
    }

    /// Synthetic messages (help text, attachments) render without a header
    pub fn has_header(&self) -> bool {
        self.timestamp.is_some() && self.author.as_deref().is_some_and(|a| !a.is_empty())
    }

    /// IRC style sender label: `[general] alice: ` or `alice: ` for direct messages
    pub fn sender_label(&self) -> String {
        let author = self.author.as_deref().unwrap_or_default();
        if self.channel.kind.is_direct() {
            format!("{}: ", author)
        } else {
            format!("[{}] {}: ", self.channel.name, author)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::channel::{Channel, ChannelKind};

    #[test]
    fn test_sender_label_by_channel_kind() {
        let public = Channel::new("C1", "general", ChannelKind::Public).shared();
        let group = Channel::new("G1", "ops", ChannelKind::Group).shared();
        let mpim = Channel::new("G2", "ann-bob-cy", ChannelKind::MultiDirect).shared();
        let im = Channel::new("D1", "bob", ChannelKind::Direct).shared();

        let label = |c: &ChannelRef| Message::new("1", c.clone(), "hi").with_author("bob").sender_label();

        assert_eq!(label(&public), "[general] bob: ");
        assert_eq!(label(&group), "[ops] bob: ");
        assert_eq!(label(&mpim), "[ann-bob-cy] bob: ");
        assert_eq!(label(&im), "bob: ");
    }

    #[test]
    fn test_header_requires_time_and_author() {
        let c = Channel::new("C1", "general", ChannelKind::Public).shared();
        let bare = Message::new("1", c.clone(), "help text");
        assert!(!bare.has_header());

        let authored = Message::new("2", c.clone(), "x").with_author("ann");
        assert!(!authored.has_header());

        let full = Message::new("3", c, "x")
            .with_author("ann")
            .with_timestamp(Local::now());
        assert!(full.has_header());
    }
}
