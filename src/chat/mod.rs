//! Chat core: message store, short-id allocation, layout and scroll rendering
//!
//! # Data flow
//!
//! ```text
//! feed ──► MessageStore ──► layout_messages ──► wrap_lines ──► paint ──► Buffer
//!                 ▲               │
//!                 │               ▼
//!            ChatSession ◄── AbbrevAllocator (channel / thread tags)
//! ```
//!
//! Everything here is synchronous and free of I/O. The owner (`ChatSession`)
//! serializes all mutation; rendering only needs shared references.

pub mod abbrev;
pub mod channel;
pub mod error;
pub mod layout;
pub mod message;
pub mod render;
pub mod store;
pub mod style;

pub use abbrev::AbbrevAllocator;
pub use channel::{Channel, ChannelKind, ChannelRef};
pub use error::ChatError;
pub use layout::{layout_messages, LayoutOptions};
pub use message::{Message, MessageStyle};
pub use store::{MessageStore, ReplyOutcome};
