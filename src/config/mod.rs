//! Configuration for the chat viewer
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/chatterm/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod chat;
mod observability;
mod serialization;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use chat::{ChatConfig, FileChat};
pub use observability::{FileLogging, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to enable the TUI (can be disabled for headless mode)
    pub enable_tui: bool,

    /// Demo mode: feed scripted channels and messages
    pub demo_mode: bool,

    /// JSON Lines transcript to replay instead of the demo feed
    pub replay: Option<PathBuf>,

    /// Show the debug pane (system logs, channel listings) beside the chat
    pub debug_pane: bool,

    /// Chat pane settings: scrolling, timestamps, message styles
    pub chat: ChatConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_tui: true,
            demo_mode: false,
            replay: None,
            debug_pane: true,
            chat: ChatConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure (subset of Config that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub debug_pane: Option<bool>,

    /// Optional [chat] section
    pub chat: Option<FileChat>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/chatterm/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("chatterm").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Silently fail - config is optional
            }
        }

        let template = Self::default().to_toml();

        // Write config (ignore errors - config is optional)
        let _ = std::fs::write(&path, template);
    }

    /// Load file config if it exists
    ///
    /// # Panics
    /// Exits the process if the config file exists but cannot be parsed or
    /// read. A broken config should fail fast with a clear error.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::parse_file_config(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  To reset, run `chatterm config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    pub(crate) fn parse_file_config(contents: &str) -> Result<FileConfig, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load configuration: file -> env vars -> defaults
    pub fn from_env() -> Self {
        Self::from_file_config(Self::load_file_config())
    }

    /// Merge a parsed config file with environment overrides
    pub(crate) fn from_file_config(file: FileConfig) -> Self {
        // TUI toggle: env only (runtime flag)
        let enable_tui = std::env::var("CHATTERM_NO_TUI")
            .map(|v| v != "1" && v.to_lowercase() != "true")
            .unwrap_or(true);

        // Demo mode: env only (runtime flag)
        let demo_mode = std::env::var("CHATTERM_DEMO")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        // Replay transcript: env only
        let replay = std::env::var("CHATTERM_REPLAY").ok().map(PathBuf::from);

        let debug_pane = file.debug_pane.unwrap_or(true);

        // Scroll step: env > file > default
        let scroll_step_env = std::env::var("CHATTERM_SCROLL_STEP")
            .ok()
            .and_then(|v| v.parse().ok());
        let chat = ChatConfig::from_file(file.chat, scroll_step_env);

        // Logging settings: file config only (RUST_LOG env var handled in main.rs)
        let logging = LoggingConfig::from_file(file.logging);

        Self {
            enable_tui,
            demo_mode,
            replay,
            debug_pane,
            chat,
            logging,
        }
    }
}
