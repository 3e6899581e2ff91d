//! Channel identities as seen by the viewer
//!
//! Channels are owned by whatever backend delivers messages. The core only
//! holds shared read references (`Arc<Channel>`) and compares them by `id`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Kind of conversation a channel represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Public channel, e.g. `#general`
    #[default]
    Public,
    /// Private group
    Group,
    /// Multi-party direct message
    MultiDirect,
    /// One-to-one direct message
    Direct,
}

impl ChannelKind {
    /// Direct messages are rendered without a `[channel]` prefix
    pub fn is_direct(self) -> bool {
        matches!(self, Self::Direct)
    }
}

/// A channel identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Backend identity; two channels are the same iff their ids match
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub kind: ChannelKind,
}

/// Shared handle to a channel
pub type ChannelRef = Arc<Channel>;

impl Channel {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Wrap into a shared reference
    pub fn shared(self) -> ChannelRef {
        Arc::new(self)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
