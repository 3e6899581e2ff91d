//! Input line at the bottom of the screen
//!
//! Prompt shows where the text will go, e.g. `(0a) general> `. The terminal
//! cursor is placed at the edit position; long lines scroll horizontally.

use crate::tui::app::App;
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Render the input line and place the cursor
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let prompt = format!("{}> ", app.session.current_channel_label());
    let prompt_width = prompt.width();

    let text = app.input.text();
    let before_cursor: String = text.chars().take(app.input.cursor()).collect();
    let cursor_col = prompt_width + before_cursor.width();

    // Keep the cursor on screen by scrolling the line left
    let width = usize::from(area.width);
    let scroll = (cursor_col + 1).saturating_sub(width);

    let line = Line::from(vec![
        Span::styled(prompt, Style::default().fg(Color::Cyan)),
        Span::raw(text),
    ]);
    let scroll_x = u16::try_from(scroll).unwrap_or(u16::MAX);
    f.render_widget(Paragraph::new(line).scroll((0, scroll_x)), area);

    let x = u16::try_from(cursor_col - scroll).unwrap_or(area.width.saturating_sub(1));
    f.set_cursor_position(Position::new(area.x + x, area.y));
}
