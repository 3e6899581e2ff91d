// TUI application state
//
// App owns the chat session (the only place message and short-id state is
// mutated), the input line, and the handle for sending typed messages back
// to the feed. Key handling in tui/mod.rs calls into the methods here.

use super::input::InputLine;
use crate::chat::{Channel, ChannelRef};
use crate::commands::{parse_input, Command, Input};
use crate::config::Config;
use crate::events::{ChatEvent, OutgoingMessage};
use crate::logging::LogBuffer;
use crate::session::{ChatSession, HelpSection};
use tokio::sync::mpsc;

/// First line of the help screen
pub const USAGE: &str =
    "chatterm: /<n> picks channel n, /<n><t> thread t in it, /l lists channels, /q quits";

/// Keys active while reading the transcript
const CHAT_KEYS: &[(&str, &str)] = &[
    ("<pageup>", "scroll-up"),
    ("<pagedown>", "scroll-down"),
    ("<f1>", "help"),
    ("<f2>", "toggle-debug"),
    ("<ctrl-c>", "quit"),
];

/// Keys for editing the input line
const INPUT_KEYS: &[(&str, &str)] = &[
    ("<enter>", "send"),
    ("<esc>", "clear-input"),
    ("<backspace>", "delete-back"),
    ("<delete>", "delete"),
    ("<left>", "cursor-left"),
    ("<right>", "cursor-right"),
    ("<home>", "cursor-start"),
    ("<end>", "cursor-end"),
];

/// Key bindings per mode, as listed on the help screen
pub const HELP_SECTIONS: &[HelpSection<'static>] = &[("chat", CHAT_KEYS), ("input", INPUT_KEYS)];

/// Main application state for the TUI
pub struct App {
    /// Transcript, short ids and scroll position
    pub session: ChatSession,

    /// Text being typed
    pub input: InputLine,

    /// Log buffer shown in the debug pane
    pub log_buffer: LogBuffer,

    /// Whether the debug pane is visible
    pub show_debug: bool,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Typed messages go back to the feed here
    outgoing: mpsc::Sender<OutgoingMessage>,
}

impl App {
    pub fn new(
        config: &Config,
        log_buffer: LogBuffer,
        outgoing: mpsc::Sender<OutgoingMessage>,
    ) -> Self {
        Self {
            session: ChatSession::new(&config.chat),
            input: InputLine::new(),
            log_buffer,
            show_debug: config.debug_pane,
            should_quit: false,
            outgoing,
        }
    }

    /// Apply one feed event to the session
    pub fn apply_event(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::ChannelsLoaded(channels) => {
                let channels: Vec<ChannelRef> =
                    channels.into_iter().map(Channel::shared).collect();
                self.session.register_channels(&channels);
            }
            ChatEvent::History(messages) => {
                tracing::debug!("Loading {} message(s) of history", messages.len());
                self.session.switch_history(messages);
            }
            ChatEvent::Message {
                message,
                thread_key,
            } => {
                self.session.deliver_message(message, thread_key.as_deref());
            }
            ChatEvent::Error(message) => {
                tracing::error!("Feed error: {}", message);
            }
        }
    }

    /// Handle Enter on the input line
    pub fn submit_input(&mut self) {
        let line = self.input.take();

        match parse_input(&line) {
            Input::SelectChannel {
                channel,
                thread,
                text,
            } => {
                if let Err(e) = self.session.set_channel(&channel, thread.as_deref()) {
                    tracing::warn!("{}", e);
                    return;
                }
                tracing::debug!("Sending to {}", self.session.current_channel_label());
                if !text.is_empty() {
                    self.send(text);
                }
            }
            Input::Command(Command::ListChannels) => self.list_channels(),
            Input::Command(Command::Quit) => self.should_quit = true,
            Input::Command(Command::Help) => self.show_help(),
            Input::Text(text) => self.send(text),
            Input::Empty => {}
        }
    }

    /// Write every channel label to the debug pane
    fn list_channels(&mut self) {
        let listing = self.session.channel_listing();
        if listing.is_empty() {
            tracing::info!("No channels");
        }
        for label in listing {
            tracing::info!("{}", label);
        }
        self.show_debug = true;
    }

    fn send(&mut self, text: String) {
        let Some(target) = self.session.send_target() else {
            tracing::warn!("No channel selected, use /<n> first (/l lists channels)");
            return;
        };

        let outgoing = OutgoingMessage {
            channel: target.channel,
            thread_key: target.thread_key,
            text,
        };
        if let Err(e) = self.outgoing.try_send(outgoing) {
            tracing::warn!("Message not sent: {}", e);
        }
    }

    pub fn show_help(&mut self) {
        self.session.show_help(USAGE, HELP_SECTIONS);
    }

    pub fn toggle_debug(&mut self) {
        self.show_debug = !self.show_debug;
    }
}
