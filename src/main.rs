// chatterm - terminal chat viewer
//
// Renders a tree of possibly-threaded chat messages into a scrollable pane
// and gives every channel and thread a short id (`/3`, `/3b`) so the input
// line can address them.
//
// Architecture:
// - Chat core (chat/): message store, short-id allocation, layout, rendering
// - Session: single owner of the core state, lives inside the TUI loop
// - Feeds (feed/): demo script or JSONL replay, standing in for a backend
// - TUI (ratatui): chat pane, debug pane, input line
// - Event system: mpsc channels connect the feed and the TUI loop

mod chat;
mod cli;
mod commands;
mod config;
mod events;
mod feed;
mod logging;
mod session;
mod tui;

use anyhow::Result;
use clap::Parser;
use config::Config;
use events::ChatEvent;
use logging::{LogBuffer, TuiLogLayer};
use session::ChatSession;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Size of the transcript snapshot logged when headless mode exits
const HEADLESS_GRID_WIDTH: u16 = 100;
const HEADLESS_GRID_HEIGHT: u16 = 40;

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config --show, --reset, --path)
    // If a command was handled, exit early
    let cli = cli::Cli::parse();
    if cli::handle_cli(&cli) {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    // Load configuration first to determine TUI vs headless mode
    let mut config = Config::from_env();
    cli.apply_overrides(&mut config);

    // Create log buffer for TUI mode
    let log_buffer = LogBuffer::new();

    // Initialize tracing/logging with conditional output
    // In TUI mode: capture logs to buffer (prevents garbling the display)
    // In headless mode: output logs to stdout
    // File logging: optionally write to rotating log files (in addition to above)
    //
    // Precedence: RUST_LOG env var > config file > default "info"
    let _file_guard = init_logging(&config, &log_buffer);

    // Event channels
    // Feed -> TUI: bounded, senders wait when the loop falls behind
    // TUI -> feed: typed messages
    let (event_tx, event_rx) = mpsc::channel(1000);
    let (outgoing_tx, outgoing_rx) = mpsc::channel(100);

    // Oneshot shutdown signal for the feed task
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let feed_handle = feed::spawn(
        &config,
        feed::FeedChannels {
            events: event_tx,
            outgoing: outgoing_rx,
            shutdown: shutdown_rx,
        },
    );

    // Run the TUI in the main task
    // This blocks until the user quits (/q or Ctrl-C)
    if config.enable_tui {
        tracing::info!("Starting TUI");
        if let Err(e) = tui::run_tui(event_rx, outgoing_tx, log_buffer, config).await {
            tracing::error!("TUI error: {:?}", e);
        }
    } else {
        tracing::info!("TUI disabled, running in headless mode");
        // No input line: feeds stop once their content is delivered
        drop(outgoing_tx);
        let mut session = ChatSession::new(&config.chat);
        tokio::select! {
            _ = run_headless(event_rx, &mut session) => {}
            result = tokio::signal::ctrl_c() => result?,
        }
        log_final_transcript(&session);
    }

    tracing::info!("Shutting down...");

    // Signal the feed to stop; if the send fails it has already finished
    let _ = shutdown_tx.send(());
    let _ = feed_handle.await;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Set up the tracing subscriber. The returned guard must live until exit so
/// the non-blocking file writer flushes.
fn init_logging(
    config: &Config,
    log_buffer: &LogBuffer,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.default_directive().into());

    // Layers are optional so every combination builds the same subscriber type
    let tui_layer = config
        .enable_tui
        .then(|| TuiLogLayer::new(log_buffer.clone()));
    let stdout_layer = (!config.enable_tui).then(tracing_subscriber::fmt::layer);

    let mut guard = None;
    let file_layer = match config.logging.file_appender() {
        Ok(Some(file_appender)) => {
            // Wrap in non-blocking writer (writes happen in background thread)
            let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(file_guard);

            // File layer uses JSON format for structured log parsing
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
        }
        Ok(None) => None,
        Err(e) => {
            // The subscriber is not up yet, so this can only go to stderr
            eprintln!("Warning: file logging disabled: {:#}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tui_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}

/// Headless mode: keep a session up to date and log each delivered message
async fn run_headless(mut event_rx: mpsc::Receiver<ChatEvent>, session: &mut ChatSession) {

    while let Some(event) = event_rx.recv().await {
        match event {
            ChatEvent::ChannelsLoaded(channels) => {
                let channels: Vec<_> = channels.into_iter().map(chat::Channel::shared).collect();
                session.register_channels(&channels);
                for label in session.channel_listing() {
                    tracing::info!("{}", label);
                }
            }
            ChatEvent::History(messages) => {
                tracing::info!("History: {} message(s)", messages.len());
                session.switch_history(messages);
            }
            ChatEvent::Message {
                message,
                thread_key,
            } => {
                let channel = session.resolve_channel_short_id(&message.channel);
                let thread = thread_key
                    .as_deref()
                    .map(|key| session.resolve_thread_short_id(&channel, key))
                    .unwrap_or_default();
                let line = format!(
                    "/{}{} {}{}",
                    channel,
                    thread,
                    message.sender_label(),
                    message.text
                );
                session.deliver_message(message, thread_key.as_deref());
                tracing::info!("{}", line);
            }
            ChatEvent::Error(message) => tracing::error!("Feed error: {}", message),
        }
    }
}

/// Log the transcript as the chat pane would show it, newest line last
fn log_final_transcript(session: &ChatSession) {
    let grid = session.render_grid(HEADLESS_GRID_WIDTH, HEADLESS_GRID_HEIGHT);
    let rows = chat::render::grid_rows(&grid);
    let first = rows.iter().position(|row| !row.is_empty()).unwrap_or(rows.len());

    tracing::info!("Final transcript ({} message(s)):", session.store().len());
    for row in &rows[first..] {
        tracing::info!("| {}", row);
    }
}
