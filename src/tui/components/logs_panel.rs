//! Debug pane: recent system log entries
//!
//! Shows the tail of the log buffer, newest at the bottom. Channel listings
//! (/l) and command feedback arrive here as log lines.

use crate::logging::{LogEntry, LogLevel};
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the debug pane
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let visible = usize::from(area.height.saturating_sub(2));
    let entries = app.log_buffer.tail(visible);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| ListItem::new(format_log_entry(entry)).style(log_level_style(entry.level)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Debug "),
    );

    f.render_widget(list, area);
}

/// Format a log entry for display
fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {:5} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

/// Get color style for log level
fn log_level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        LogLevel::Warn => Style::default().fg(Color::Yellow),
        LogLevel::Info => Style::default(),
        LogLevel::Debug | LogLevel::Trace => Style::default().fg(Color::DarkGray),
    }
}
