//! Working set of messages shown in the chat pane
//!
//! Top-level messages are keyed by id in a `BTreeMap`, so iteration order is
//! the render order. Mutations never fail: a reply whose parent is unknown is
//! promoted to a top-level message instead.

use super::message::{Message, THREAD_MARKER};
use std::collections::BTreeMap;

/// Where `attach_reply` placed a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Nested under its parent
    Threaded,
    /// Parent not present; stored at the top level
    PromotedToTopLevel,
}

/// Message store for one chat session
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: BTreeMap<String, Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a top-level message by id
    pub fn insert(&mut self, message: Message) {
        self.messages.insert(message.id.clone(), message);
    }

    /// Nest `message` under `parent_id`, or store it top-level if the parent is unknown
    pub fn attach_reply(&mut self, parent_id: &str, mut message: Message) -> ReplyOutcome {
        match self.messages.get_mut(parent_id) {
            Some(parent) => {
                message.is_reply = true;
                message.thread_marker = THREAD_MARKER.to_string();
                parent.replies.insert(message.id.clone(), message);
                ReplyOutcome::Threaded
            }
            None => {
                tracing::warn!(
                    "Reply {} targets unknown parent {}, showing it top-level",
                    message.id,
                    parent_id
                );
                self.insert(message);
                ReplyOutcome::PromotedToTopLevel
            }
        }
    }

    /// True iff `parent_id` is stored and already has at least one reply
    pub fn has_existing_replies(&self, parent_id: &str) -> bool {
        self.messages
            .get(parent_id)
            .is_some_and(Message::has_replies)
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.get(id)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of top-level messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Top-level messages in ascending id order
    pub fn ordered_view(&self) -> impl Iterator<Item = &Message> {
        self.messages.values()
    }
}
