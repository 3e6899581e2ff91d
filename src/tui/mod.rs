// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, feed events)
// - Rendering the chat pane, debug pane and input line
//
// The loop is the single owner of the chat session. Feed events and key
// presses are applied one at a time between draws.

pub mod app;
pub mod components;
pub mod input;
pub mod views;

use crate::config::Config;
use crate::events::{ChatEvent, OutgoingMessage};
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI
///
/// This function sets up the terminal, runs the event loop, and cleans up
/// when done. The event loop handles both keyboard input and feed events.
pub async fn run_tui(
    mut event_rx: mpsc::Receiver<ChatEvent>,
    outgoing_tx: mpsc::Sender<OutgoingMessage>,
    log_buffer: LogBuffer,
    config: Config,
) -> Result<()> {
    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(&config, log_buffer, outgoing_tx);

    // Run the event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut event_rx).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// This loop handles three types of events:
/// 1. Keyboard and mouse input
/// 2. Timer ticks (periodic redraws, so the debug pane stays current)
/// 3. Feed events (channels, history, new messages)
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::Receiver<ChatEvent>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard or mouse input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => handle_key_event(app, key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            // Periodic tick for redrawing
            _ = tick_interval.tick() => {}

            // Feed events
            Some(chat_event) = event_rx.recv() => {
                app.apply_event(chat_event);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    // Release/repeat events only arrive on some platforms; act on presses
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    match key_event.code {
        KeyCode::Char('c') if ctrl => app.should_quit = true,

        // Chat pane
        KeyCode::PageUp => app.session.scroll_up(),
        KeyCode::PageDown => app.session.scroll_down(),
        KeyCode::F(1) => app.show_help(),
        KeyCode::F(2) => app.toggle_debug(),

        // Input line
        KeyCode::Enter => app.submit_input(),
        KeyCode::Esc => app.input.clear(),
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Delete => app.input.delete(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Home => app.input.move_home(),
        KeyCode::End => app.input.move_end(),
        KeyCode::Char(ch) if !ctrl => app.input.insert(ch),
        _ => {}
    }
}

/// Handle mouse input
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    match mouse_event.kind {
        MouseEventKind::ScrollUp => app.session.scroll_up(),
        MouseEventKind::ScrollDown => app.session.scroll_down(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{Channel, ChannelKind, Message};
    use ratatui::backend::TestBackend;

    fn app() -> (App, mpsc::Receiver<OutgoingMessage>) {
        let (tx, rx) = mpsc::channel(8);
        (App::new(&Config::default(), LogBuffer::new(), tx), rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_typing_and_sending() {
        let (mut app, mut rx) = app();
        app.apply_event(ChatEvent::ChannelsLoaded(vec![Channel::new(
            "C1",
            "general",
            ChannelKind::Public,
        )]));

        for ch in "/0 hi".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(rx.try_recv().unwrap().text, "hi");
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_escape_clears_and_ctrl_c_quits() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Esc);
        assert!(app.input.is_empty());

        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_page_keys_scroll_chat() {
        let (mut app, _rx) = app();
        let channel = Channel::new("C1", "general", ChannelKind::Public).shared();
        for i in 0..30 {
            app.apply_event(ChatEvent::Message {
                message: Message::new(format!("{:03}", i), channel.clone(), "m"),
                thread_key: None,
            });
        }

        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.session.offset(), 10);
        press(&mut app, KeyCode::PageDown);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.session.offset(), 0);
    }

    #[test]
    fn test_full_screen_draw() {
        let (mut app, _rx) = app();
        app.show_debug = false;
        app.apply_event(ChatEvent::History(vec![Message::new(
            "1",
            Channel::new("C1", "general", ChannelKind::Public).shared(),
            "hello world",
        )]));

        let mut terminal = Terminal::new(TestBackend::new(30, 6)).unwrap();
        terminal.draw(|f| views::draw(f, &app)).unwrap();

        let screen = screen_text(&terminal);
        let rows: Vec<&str> = screen.lines().collect();
        assert!(rows[0].contains("(0) general"));
        assert_eq!(rows[3], format!("│{:<28}│", "hello world"));
        assert!(rows[5].starts_with("(0) general> "));
    }
}
