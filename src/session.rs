// Chat session - the single owner of message and abbreviation state
//
// The TUI event loop owns exactly one ChatSession. Feeds never touch it
// directly; they send ChatEvents over a channel and the loop applies them
// here, so all mutation happens on one task.

use crate::chat::render::{self, paint, wrap_lines};
use crate::chat::{
    layout_messages, AbbrevAllocator, Channel, ChannelKind, ChannelRef, ChatError, LayoutOptions,
    Message, MessageStore, ReplyOutcome,
};
use crate::config::ChatConfig;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

/// Key bindings of one input mode, shown by `show_help`
pub type HelpSection<'a> = (&'a str, &'a [(&'a str, &'a str)]);

/// Channel (and optional thread) that outgoing messages go to
#[derive(Debug, Clone)]
pub struct SendTarget {
    pub channel: ChannelRef,
    /// Thread key (parent message id) when replying in a thread
    pub thread_key: Option<String>,
}

/// Message, abbreviation and scroll state for one connection
#[derive(Debug)]
pub struct ChatSession {
    store: MessageStore,
    abbrevs: AbbrevAllocator,
    layout: LayoutOptions,
    /// Scroll distance from the bottom of the transcript
    offset: usize,
    scroll_step: usize,
    current_channel: Option<String>,
    current_thread: Option<String>,
    /// Counter for synthetic message ids
    synthetic_seq: u64,
}

impl ChatSession {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            store: MessageStore::new(),
            abbrevs: AbbrevAllocator::new(),
            layout: LayoutOptions {
                time_format: config.time_format.clone(),
            },
            offset: 0,
            scroll_step: config.scroll_step,
            current_channel: None,
            current_thread: None,
            synthetic_seq: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Message delivery
    // ─────────────────────────────────────────────────────────────

    /// Assign short ids for every channel the backend knows about
    pub fn register_channels(&mut self, channels: &[ChannelRef]) {
        for channel in channels {
            self.abbrevs.resolve_channel(channel);
        }
        tracing::info!("Registered {} channel(s)", channels.len());
    }

    /// Store an incoming message, threading it under `thread_key` when present
    pub fn deliver_message(
        &mut self,
        mut message: Message,
        thread_key: Option<&str>,
    ) -> Option<ReplyOutcome> {
        let channel_short = self.abbrevs.resolve_channel(&message.channel);

        let Some(parent_id) = thread_key else {
            self.store.insert(message);
            return None;
        };

        let thread_short = self.abbrevs.resolve_thread(&channel_short, parent_id);
        if message.parent_id.is_none() {
            message.parent_id = Some(parent_id.to_string());
        }

        let opens_thread = !self.store.has_existing_replies(parent_id);
        let outcome = self.store.attach_reply(parent_id, message);
        if outcome == ReplyOutcome::Threaded && opens_thread {
            tracing::info!("New thread /{}{}", channel_short, thread_short);
        }
        Some(outcome)
    }

    /// Bulk load: reset scrolling, insert all, follow the last channel
    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.offset = 0;

        let mut last_channel = None;
        for message in messages {
            last_channel = Some(ChannelRef::clone(&message.channel));
            let thread_key = message.parent_id.clone();
            self.deliver_message(message, thread_key.as_deref());
        }

        if let Some(channel) = last_channel {
            self.current_channel = Some(self.abbrevs.resolve_channel(&channel));
            self.current_thread = None;
        }
    }

    /// Load the history of another channel in place of the current transcript
    pub fn switch_history(&mut self, messages: Vec<Message>) {
        self.store.clear();
        self.set_messages(messages);
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.offset = 0;
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────

    /// Scroll towards older content, at most one step per top-level message
    pub fn scroll_up(&mut self) {
        self.offset = (self.offset + self.scroll_step).min(self.store.len());
    }

    /// Scroll towards the newest content
    pub fn scroll_down(&mut self) {
        self.offset = self.offset.saturating_sub(self.scroll_step);
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    // ─────────────────────────────────────────────────────────────
    // Short-id queries (used by command parsing)
    // ─────────────────────────────────────────────────────────────

    pub fn resolve_channel_short_id(&mut self, channel: &ChannelRef) -> String {
        self.abbrevs.resolve_channel(channel)
    }

    pub fn resolve_thread_short_id(&mut self, channel_short: &str, thread_key: &str) -> String {
        self.abbrevs.resolve_thread(channel_short, thread_key)
    }

    pub fn lookup_channel(&self, short: &str) -> Result<&ChannelRef, ChatError> {
        self.abbrevs.lookup_channel(short)
    }

    pub fn list_channel_ids(&self) -> Vec<String> {
        self.abbrevs.list_channel_ids()
    }

    /// `(3) general`
    pub fn channel_label(&self, short: &str) -> Result<String, ChatError> {
        let channel = self.lookup_channel(short)?;
        Ok(format!("({}) {}", short, channel.name))
    }

    /// Label of every known channel in short-id order
    pub fn channel_listing(&self) -> Vec<String> {
        self.list_channel_ids()
            .iter()
            .filter_map(|short| self.channel_label(short).ok())
            .collect()
    }

    /// Label of the send target, e.g. `(3) general` or `(3b) general`
    pub fn current_channel_label(&self) -> String {
        let Some(short) = self.current_channel.as_deref() else {
            return "no channel".to_string();
        };
        match (self.abbrevs.lookup_channel(short), &self.current_thread) {
            (Ok(channel), Some(thread)) => format!("({}{}) {}", short, thread, channel.name),
            (Ok(channel), None) => format!("({}) {}", short, channel.name),
            (Err(_), _) => "???".to_string(),
        }
    }

    /// Point outgoing messages at `/short` or `/short<thread>`
    pub fn set_channel(&mut self, short: &str, thread_short: Option<&str>) -> Result<(), ChatError> {
        self.abbrevs.lookup_channel(short)?;
        let thread = match thread_short.filter(|t| !t.is_empty()) {
            Some(thread) => {
                self.abbrevs.lookup_thread(short, thread)?;
                Some(thread.to_string())
            }
            None => None,
        };

        self.current_channel = Some(short.to_string());
        self.current_thread = thread;
        Ok(())
    }

    /// Where a message typed now would be sent
    pub fn send_target(&self) -> Option<SendTarget> {
        let short = self.current_channel.as_deref()?;
        let channel = self.abbrevs.lookup_channel(short).ok()?;
        let thread_key = self
            .current_thread
            .as_deref()
            .and_then(|t| self.abbrevs.lookup_thread(short, t).ok())
            .map(str::to_string);

        Some(SendTarget {
            channel: ChannelRef::clone(channel),
            thread_key,
        })
    }

    // ─────────────────────────────────────────────────────────────
    // Help
    // ─────────────────────────────────────────────────────────────

    /// Replace the transcript with usage text and key bindings
    pub fn show_help(&mut self, usage: &str, sections: &[HelpSection<'_>]) {
        self.clear();

        let system = Channel::new("", "chatterm", ChannelKind::Direct).shared();
        let push = |session: &mut Self, text: String| {
            session.synthetic_seq += 1;
            let id = format!("~help-{:08}", session.synthetic_seq);
            session.store.insert(Message::new(id, ChannelRef::clone(&system), text));
        };

        push(self, usage.to_string());
        for (mode, bindings) in sections {
            push(self, mode.to_uppercase());
            push(self, String::new());

            let mut bindings = bindings.to_vec();
            bindings.sort_unstable();
            for (key, action) in bindings {
                push(self, format!("    {:<12}{:<15}", key, action));
            }
            push(self, String::new());
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────

    /// Lay out and paint the transcript into `area`
    pub fn render_into(&self, area: Rect, blank: Style, buf: &mut Buffer) {
        let glyphs = layout_messages(&self.store, &self.abbrevs, &self.layout);
        let lines = wrap_lines(&glyphs, usize::from(area.width));
        paint(&lines, area, self.offset, blank, buf);
    }

    /// Render the transcript into a standalone grid
    pub fn render_grid(&self, width: u16, height: u16) -> Buffer {
        let glyphs = layout_messages(&self.store, &self.abbrevs, &self.layout);
        render::render_grid(&glyphs, width, height, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::render::tests::row_text;
    use chrono::{Local, TimeZone};

    fn session() -> ChatSession {
        ChatSession::new(&ChatConfig::default())
    }

    fn general() -> ChannelRef {
        Channel::new("C1", "general", ChannelKind::Public).shared()
    }

    fn rows(buf: &Buffer) -> Vec<String> {
        (0..buf.area.height).map(|y| row_text(buf, y)).collect()
    }

    #[test]
    fn test_three_messages_render_in_id_order() {
        let c = general();
        let mut s = session();
        s.deliver_message(Message::new("3", c.clone(), "c"), None);
        s.deliver_message(Message::new("1", c.clone(), "a"), None);
        s.deliver_message(Message::new("2", c, "b"), None);

        let grid = s.render_grid(4, 3);
        assert_eq!(rows(&grid), vec!["a   ", "b   ", "c   "]);
        assert_eq!(grid, s.render_grid(4, 3));
    }

    #[test]
    fn test_reply_gets_thread_tag() {
        let c = general();
        let ts = Local.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
        let mut s = session();
        s.deliver_message(
            Message::new("1", c.clone(), "root").with_author("ann").with_timestamp(ts),
            None,
        );
        let outcome = s.deliver_message(
            Message::new("1.1", c, "re").with_author("bob").with_timestamp(ts),
            Some("1"),
        );
        assert_eq!(outcome, Some(ReplyOutcome::Threaded));
        assert!(s.store().has_existing_replies("1"));

        let grid = s.render_grid(40, 2);
        assert_eq!(row_text(&grid, 0).trim_end(), "08:30 (0a) [general] ann: root");
        assert_eq!(row_text(&grid, 1).trim_end(), "08:30 (0a) [general] bob: ↳ re");
    }

    #[test]
    fn test_reply_to_missing_parent_lands_top_level() {
        let mut s = session();
        let outcome = s.deliver_message(Message::new("5", general(), "x"), Some("missing"));
        assert_eq!(outcome, Some(ReplyOutcome::PromotedToTopLevel));
        assert!(s.store().get("5").is_some());
    }

    #[test]
    fn test_scroll_clamps_to_message_count() {
        let c = general();
        let mut s = session();
        for i in 0..3 {
            s.deliver_message(Message::new(i.to_string(), c.clone(), "m"), None);
        }

        s.scroll_up();
        assert_eq!(s.offset(), 3);
        s.scroll_down();
        assert_eq!(s.offset(), 0);
        s.scroll_down();
        assert_eq!(s.offset(), 0);

        for i in 3..25 {
            s.deliver_message(Message::new(i.to_string(), c.clone(), "m"), None);
        }
        s.scroll_up();
        s.scroll_up();
        assert_eq!(s.offset(), 20);
        s.scroll_up();
        assert_eq!(s.offset(), 25);
    }

    #[test]
    fn test_set_messages_follows_last_channel() {
        let a = Channel::new("C1", "general", ChannelKind::Public).shared();
        let b = Channel::new("C2", "random", ChannelKind::Public).shared();
        let mut s = session();
        s.scroll_up();

        s.set_messages(vec![
            Message::new("1", a, "x"),
            Message::new("2", b, "y"),
        ]);
        assert_eq!(s.offset(), 0);
        assert_eq!(s.current_channel_label(), "(1) random");
        assert_eq!(s.channel_listing(), vec!["(0) general", "(1) random"]);
    }

    #[test]
    fn test_set_channel_rejects_unknown_ids() {
        let c = general();
        let mut s = session();
        s.register_channels(&[c.clone()]);

        assert_eq!(
            s.set_channel("99", None),
            Err(ChatError::ChannelNotFound("99".to_string()))
        );
        assert!(s.lookup_channel("99").is_err());
        assert!(matches!(
            s.set_channel("0", Some("a")),
            Err(ChatError::ThreadNotFound { .. })
        ));

        s.deliver_message(Message::new("1", c.clone(), "root"), None);
        s.deliver_message(Message::new("2", c, "re"), Some("1"));
        s.set_channel("0", Some("a")).unwrap();
        assert_eq!(s.current_channel_label(), "(0a) general");

        let target = s.send_target().unwrap();
        assert_eq!(target.channel.id, "C1");
        assert_eq!(target.thread_key.as_deref(), Some("1"));
    }

    #[test]
    fn test_help_renders_without_headers() {
        let mut s = session();
        s.deliver_message(Message::new("1", general(), "old"), None);

        let insert: &[(&str, &str)] = &[("<enter>", "send"), ("<esc>", "clear-input")];
        s.show_help("usage: chatterm", &[("insert", insert)]);

        let grid = s.render_grid(40, 6);
        assert_eq!(
            rows(&grid).iter().map(|r| r.trim_end()).collect::<Vec<_>>(),
            vec![
                "usage: chatterm",
                "INSERT",
                "",
                "    <enter>     send",
                "    <esc>       clear-input",
                "",
            ]
        );
    }
}
