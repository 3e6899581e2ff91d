//! Chat pane configuration
//!
//! Scroll step, timestamp format and the default style tokens applied to
//! incoming messages.

use crate::chat::MessageStyle;
use serde::Deserialize;

/// Default style tokens for the four message fragments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleConfig {
    pub time: String,
    pub thread: String,
    pub name: String,
    pub text: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            time: "fg-blue".to_string(),
            thread: "fg-bold".to_string(),
            name: "colorize,fg-bold".to_string(),
            text: String::new(),
        }
    }
}

impl StyleConfig {
    /// Style tokens stamped onto each delivered message
    pub fn message_style(&self) -> MessageStyle {
        MessageStyle {
            time: self.time.clone(),
            thread: self.thread.clone(),
            name: self.name.clone(),
            text: self.text.clone(),
        }
    }
}

/// Chat pane configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Scroll offset change per PageUp/PageDown
    pub scroll_step: usize,
    /// chrono format string for message timestamps
    pub time_format: String,
    pub styles: StyleConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            scroll_step: 10,
            time_format: "%H:%M".to_string(),
            styles: StyleConfig::default(),
        }
    }
}

/// [chat.styles] as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileStyles {
    pub time: Option<String>,
    pub thread: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
}

/// [chat] as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileChat {
    pub scroll_step: Option<usize>,
    pub time_format: Option<String>,
    pub styles: Option<FileStyles>,
}

impl ChatConfig {
    /// Create from file config with defaults; `scroll_step_env` wins over the file
    pub fn from_file(file: Option<FileChat>, scroll_step_env: Option<usize>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();
        let styles = file.styles.unwrap_or_default();

        Self {
            scroll_step: scroll_step_env
                .or(file.scroll_step)
                .filter(|step| *step > 0)
                .unwrap_or(defaults.scroll_step),
            time_format: file.time_format.unwrap_or(defaults.time_format),
            styles: StyleConfig {
                time: styles.time.unwrap_or(defaults.styles.time),
                thread: styles.thread.unwrap_or(defaults.styles.thread),
                name: styles.name.unwrap_or(defaults.styles.name),
                text: styles.text.unwrap_or(defaults.styles.text),
            },
        }
    }
}
