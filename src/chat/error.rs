//! Error types for short-id lookups

use std::fmt;

/// Errors returned by abbreviation lookups
///
/// A miss is always reported explicitly so callers can tell an unknown short
/// id apart from a real channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// No channel has been assigned this short id
    ChannelNotFound(String),
    /// The channel namespace has no thread with this short id
    ThreadNotFound { channel: String, thread: String },
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelNotFound(short) => write!(f, "Unknown channel /{}", short),
            Self::ThreadNotFound { channel, thread } => {
                write!(f, "Unknown thread /{}{}", channel, thread)
            }
        }
    }
}

impl std::error::Error for ChatError {}
