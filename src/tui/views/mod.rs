// Views module - screen layout
//
// One screen: chat pane on the left, optional debug pane on the right,
// input line along the bottom.

use super::app::App;
use super::components::{self, ChatPane};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

/// Width share of the chat pane when the debug pane is shown
const CHAT_PERCENT: u16 = 65;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let (chat_area, debug_area) = split_panes(rows[0], app.show_debug);

    f.render_widget(ChatPane::new(&app.session), chat_area);
    if let Some(area) = debug_area {
        components::logs_panel::render(f, area, app);
    }
    components::input_bar::render(f, rows[1], app);
}

/// Chat pane area and, when enabled, debug pane area
fn split_panes(area: Rect, show_debug: bool) -> (Rect, Option<Rect>) {
    if !show_debug {
        return (area, None);
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(CHAT_PERCENT),
            Constraint::Percentage(100 - CHAT_PERCENT),
        ])
        .split(area);
    (columns[0], Some(columns[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_pane_takes_right_side() {
        let area = Rect::new(0, 0, 100, 20);
        let (chat, debug) = split_panes(area, true);
        let debug = debug.unwrap();
        assert_eq!(chat.x, 0);
        assert_eq!(chat.width + debug.width, 100);
        assert_eq!(debug.x, chat.width);

        assert_eq!(split_panes(area, false), (area, None));
    }
}
