//! Logging settings: the level filter and the optional rolling JSON log file

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// How often the log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// One file forever
    Never,
}

impl LogRotation {
    /// Case-insensitive; anything unrecognized rolls daily
    pub fn parse(s: &str) -> Self {
        [Self::Hourly, Self::Daily, Self::Never]
            .into_iter()
            .find(|rotation| rotation.as_str().eq_ignore_ascii_case(s.trim()))
            .unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

/// The `[logging]` section after defaults are applied
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level for chatterm's own events, used when RUST_LOG is unset
    pub level: String,
    /// Also write JSON lines to a rolling file
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// "chatterm" gives files like chatterm.2024-01-15
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "chatterm".to_string(),
        }
    }
}

/// `[logging]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<PathBuf>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let mut config = Self::default();
        let Some(file) = file else {
            return config;
        };

        if let Some(level) = file.level {
            config.level = level;
        }
        if let Some(enabled) = file.file_enabled {
            config.file_enabled = enabled;
        }
        if let Some(dir) = file.file_dir {
            config.file_dir = dir;
        }
        if let Some(rotation) = file.file_rotation {
            config.file_rotation = LogRotation::parse(&rotation);
        }
        if let Some(prefix) = file.file_prefix {
            config.file_prefix = prefix;
        }
        config
    }

    /// EnvFilter directive applied when RUST_LOG is not set
    pub fn default_directive(&self) -> String {
        format!("chatterm={}", self.level)
    }

    /// Open the rolling log file, creating its directory first.
    /// `Ok(None)` when file logging is switched off.
    pub fn file_appender(&self) -> Result<Option<RollingFileAppender>> {
        if !self.file_enabled {
            return Ok(None);
        }

        std::fs::create_dir_all(&self.file_dir).with_context(|| {
            format!("Could not create log directory {}", self.file_dir.display())
        })?;

        let appender = RollingFileAppender::builder()
            .rotation(self.file_rotation.into())
            .filename_prefix(self.file_prefix.as_str())
            .build(&self.file_dir)
            .with_context(|| format!("Could not open log file in {}", self.file_dir.display()))?;
        Ok(Some(appender))
    }
}
