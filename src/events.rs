// Events that flow between the message feeds and the TUI loop
//
// Feeds never touch the chat session directly. They send ChatEvents over an
// mpsc channel and the single owning loop applies them, in order. Messages
// typed by the user travel the other way as OutgoingMessages.

use crate::chat::{Channel, ChannelRef, Message};

/// Incoming event from a message feed
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// Channel list is known (usually once, at connect)
    ChannelsLoaded(Vec<Channel>),

    /// Bulk history for a channel; replaces the transcript
    History(Vec<Message>),

    /// A single new message, threaded under `thread_key` when present
    Message {
        message: Message,
        thread_key: Option<String>,
    },

    /// The feed hit a problem worth showing to the user
    Error(String),
}

/// A message typed into the input line, addressed to a channel or thread
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub channel: ChannelRef,
    /// Parent message id when replying in a thread
    pub thread_key: Option<String>,
    pub text: String,
}
