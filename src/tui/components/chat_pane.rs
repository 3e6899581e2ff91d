//! Chat pane component
//!
//! Bordered block titled with the current send target. The transcript is
//! laid out and painted straight into the block's inner area, bottom-anchored
//! at the session's scroll offset.

use crate::session::ChatSession;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

/// Widget view of a chat session
pub struct ChatPane<'a> {
    session: &'a ChatSession,
}

impl<'a> ChatPane<'a> {
    pub fn new(session: &'a ChatSession) -> Self {
        Self { session }
    }

    fn title(&self) -> String {
        let label = self.session.current_channel_label();
        match self.session.offset() {
            0 => format!(" {} ", label),
            offset => format!(" {} [-{}] ", label, offset),
        }
    }
}

impl Widget for ChatPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(self.title());
        let inner = block.inner(area);
        block.render(area, buf);

        self.session.render_into(inner, Style::default(), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::render::tests::row_text;
    use crate::chat::{Channel, ChannelKind, Message};
    use crate::config::ChatConfig;

    fn session_with(texts: &[&str]) -> ChatSession {
        let channel = Channel::new("C1", "general", ChannelKind::Public).shared();
        let mut session = ChatSession::new(&ChatConfig::default());
        for (i, text) in texts.iter().enumerate() {
            session.deliver_message(Message::new(format!("{:02}", i), channel.clone(), *text), None);
        }
        session
    }

    #[test]
    fn test_transcript_sits_inside_border() {
        let session = session_with(&["one", "two"]);
        let area = Rect::new(0, 0, 12, 5);
        let mut buf = Buffer::empty(area);

        ChatPane::new(&session).render(area, &mut buf);

        assert!(row_text(&buf, 0).starts_with('┌'));
        assert_eq!(row_text(&buf, 1), "│          │");
        assert_eq!(row_text(&buf, 2), "│one       │");
        assert_eq!(row_text(&buf, 3), "│two       │");
        assert!(row_text(&buf, 4).starts_with('└'));
    }

    #[test]
    fn test_title_shows_scroll_offset() {
        let mut session = session_with(&["a", "b", "c"]);
        assert_eq!(ChatPane::new(&session).title(), " no channel ");
        session.scroll_up();
        assert_eq!(ChatPane::new(&session).title(), " no channel [-3] ");
    }
}
