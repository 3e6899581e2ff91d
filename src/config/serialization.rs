//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize config to TOML string
    pub fn to_toml(&self) -> String {
        let styles = &self.chat.styles;
        format!(
            r#"# chatterm configuration

# Show the debug pane (system logs, /l channel listings) beside the chat
debug_pane = {debug_pane}

# Chat pane
[chat]
scroll_step = {scroll_step}      # PageUp/PageDown scroll distance
time_format = "{time_format}"  # chrono strftime format

# Style tokens: fg-<color>, bg-<color>, fg-bold, fg-underline
# Colors: default, black, red, green, yellow, blue, magenta, cyan, white, 0-255
# "colorize" in name picks a stable color per author
[chat.styles]
time = "{style_time}"
thread = "{style_thread}"
name = "{style_name}"
text = "{style_text}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to TUI buffer or stdout)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            debug_pane = self.debug_pane,
            scroll_step = self.chat.scroll_step,
            time_format = self.chat.time_format,
            style_time = styles.time,
            style_thread = styles.thread,
            style_name = styles.name,
            style_text = styles.text,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<(), std::io::Error> {
        let Some(path) = Self::config_path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config path",
            ));
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_toml())
    }
}
