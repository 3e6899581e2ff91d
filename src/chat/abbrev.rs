//! Short-id allocation for channels and threads
//!
//! Channels get sequential decimal ids ("0", "1", ...). Threads get letter ids
//! ("a".."z", "aa", ...) scoped to the short id of the channel they live in,
//! so `/3b` addresses thread "b" of channel "3".
//!
//! Ids are never reassigned or reused for the lifetime of the allocator.

use super::channel::ChannelRef;
use super::error::ChatError;
use std::collections::HashMap;

/// Thread ids issued inside one channel namespace
#[derive(Debug, Default)]
struct ThreadNamespace {
    /// short id -> thread key
    by_short: HashMap<String, String>,
    /// thread key -> short id
    by_key: HashMap<String, String>,
    next: usize,
}

/// Allocator for channel and thread abbreviations
#[derive(Debug, Default)]
pub struct AbbrevAllocator {
    /// short id -> channel
    channels: HashMap<String, ChannelRef>,
    /// channel identity -> short id
    channel_ids: HashMap<String, String>,
    next_channel: u64,
    /// channel short id -> thread namespace
    threads: HashMap<String, ThreadNamespace>,
}

impl AbbrevAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Short id for `channel`, allocating the next decimal id on first sight
    pub fn resolve_channel(&mut self, channel: &ChannelRef) -> String {
        if let Some(short) = self.channel_ids.get(&channel.id) {
            return short.clone();
        }

        let short = self.next_channel.to_string();
        self.next_channel += 1;
        self.channel_ids.insert(channel.id.clone(), short.clone());
        self.channels.insert(short.clone(), ChannelRef::clone(channel));

        tracing::debug!("Assigned /{} to channel {}", short, channel.name);
        short
    }

    /// Short id for `thread_key` inside the namespace of `channel_short`
    ///
    /// The namespace is created on first use.
    pub fn resolve_thread(&mut self, channel_short: &str, thread_key: &str) -> String {
        let ns = self.threads.entry(channel_short.to_string()).or_default();
        if let Some(short) = ns.by_key.get(thread_key) {
            return short.clone();
        }

        let short = thread_abbrev(ns.next);
        ns.next += 1;
        ns.by_key.insert(thread_key.to_string(), short.clone());
        ns.by_short.insert(short.clone(), thread_key.to_string());
        short
    }

    /// Reverse lookup of a channel short id
    pub fn lookup_channel(&self, short: &str) -> Result<&ChannelRef, ChatError> {
        self.channels
            .get(short)
            .ok_or_else(|| ChatError::ChannelNotFound(short.to_string()))
    }

    /// Reverse lookup of a thread short id within a channel namespace
    pub fn lookup_thread(&self, channel_short: &str, thread_short: &str) -> Result<&str, ChatError> {
        self.threads
            .get(channel_short)
            .and_then(|ns| ns.by_short.get(thread_short))
            .map(String::as_str)
            .ok_or_else(|| ChatError::ThreadNotFound {
                channel: channel_short.to_string(),
                thread: thread_short.to_string(),
            })
    }

    /// Already-issued short id for a channel, without allocating
    pub fn channel_abbrev(&self, channel: &ChannelRef) -> Option<&str> {
        self.channel_ids.get(&channel.id).map(String::as_str)
    }

    /// Already-issued thread short id, without allocating
    pub fn thread_abbrev(&self, channel_short: &str, thread_key: &str) -> Option<&str> {
        self.threads
            .get(channel_short)
            .and_then(|ns| ns.by_key.get(thread_key))
            .map(String::as_str)
    }

    /// All channel short ids, shortest first then lexicographic
    ///
    /// For decimal ids this is numeric order ("9" before "10").
    pub fn list_channel_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.channels.keys().cloned().collect();
        ids.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        ids
    }
}

/// Spreadsheet-column style letter id: 0 -> "a", 25 -> "z", 26 -> "aa"
pub fn thread_abbrev(index: usize) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    loop {
        letters.push(b'a' + (n % 26) as u8);
        n /= 26;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
