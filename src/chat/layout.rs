// Message layout - flatten the message tree into styled glyphs
//
// Each top-level message becomes one run of glyphs:
//
//   "12:04 " "(3a) " "[general] alice: " "↳ " "body text..."
//    time     tag     sender label       marker  body
//
// followed by its replies (one level), with explicit line breaks between
// messages. No wrapping happens here; see `render` for that.

use super::abbrev::AbbrevAllocator;
use super::message::Message;
use super::store::MessageStore;
use super::style::{name_style, parse_style_token};
use ratatui::style::Style;

/// One unit of laid-out transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Char { ch: char, style: Style },
    LineBreak,
}

impl Glyph {
    pub fn char(ch: char, style: Style) -> Self {
        Self::Char { ch, style }
    }
}

/// Layout settings that come from config
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// chrono format string for message timestamps
    pub time_format: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            time_format: "%H:%M".to_string(),
        }
    }
}

/// Lay out every message in the store, in render order
pub fn layout_messages(
    store: &MessageStore,
    abbrevs: &AbbrevAllocator,
    options: &LayoutOptions,
) -> Vec<Glyph> {
    let messages: Vec<&Message> = store.ordered_view().collect();
    let mut glyphs = Vec::new();
    layout_sequence(&messages, abbrevs, options, &mut glyphs);
    glyphs
}

fn layout_sequence(
    messages: &[&Message],
    abbrevs: &AbbrevAllocator,
    options: &LayoutOptions,
    out: &mut Vec<Glyph>,
) {
    for (i, msg) in messages.iter().enumerate() {
        layout_message(msg, abbrevs, options, out);

        if msg.has_replies() {
            out.push(Glyph::LineBreak);
            let replies: Vec<&Message> = msg.ordered_replies().collect();
            layout_sequence(&replies, abbrevs, options, out);
        }

        if i + 1 < messages.len() {
            out.push(Glyph::LineBreak);
        }
    }
}

/// Header fragments followed by the body of a single message
pub fn layout_message(
    msg: &Message,
    abbrevs: &AbbrevAllocator,
    options: &LayoutOptions,
    out: &mut Vec<Glyph>,
) {
    if msg.has_header() {
        if let Some(ts) = msg.timestamp {
            let time = format!("{} ", ts.format(&options.time_format));
            push_str(out, &time, parse_style_token(&msg.style.time));
        }

        push_str(out, &abbrev_tag(msg, abbrevs), Style::default());

        let author = msg.author.as_deref().unwrap_or_default();
        push_str(out, &msg.sender_label(), name_style(&msg.style.name, author));

        push_str(out, &msg.thread_marker, parse_style_token(&msg.style.thread));
    }

    // Body goes out verbatim with one style; it is never parsed for markup
    let body_style = parse_style_token(&msg.style.text);
    for ch in msg.text.chars() {
        match ch {
            '\n' => out.push(Glyph::LineBreak),
            '\t' => out.push(Glyph::char(' ', body_style)),
            c if c.is_control() => {}
            c => out.push(Glyph::char(c, body_style)),
        }
    }
}

/// `(3) ` for a channel message, `(3a) ` once the message belongs to a thread
fn abbrev_tag(msg: &Message, abbrevs: &AbbrevAllocator) -> String {
    let Some(channel) = abbrevs.channel_abbrev(&msg.channel) else {
        return "(?) ".to_string();
    };

    let thread_key = msg.parent_id.as_deref().unwrap_or(&msg.id);
    match abbrevs.thread_abbrev(channel, thread_key) {
        Some(thread) => format!("({}{}) ", channel, thread),
        None => format!("({}) ", channel),
    }
}

fn push_str(out: &mut Vec<Glyph>, s: &str, style: Style) {
    out.extend(s.chars().map(|ch| Glyph::char(ch, style)));
}
