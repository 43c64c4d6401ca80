//! Logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;

/// Filter used when nothing else is configured.
pub const DEFAULT_FILTER: &str = "warn";

/// Filter used with `--verbose`.
pub const VERBOSE_FILTER: &str = "debug";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name, returning `None` if unrecognised.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
    /// Append log lines to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds logging configuration from config settings with env overrides.
    ///
    /// The filter comes from `AIVENO_LOG`, then `--verbose`, then the config
    /// file, then [`DEFAULT_FILTER`]. `AIVENO_LOG_FORMAT` and
    /// `AIVENO_LOG_FILE` override the file's format and path.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let from_file = settings.and_then(|s| s.level.clone());
        let filter = env_value("AIVENO_LOG")
            .or_else(|| verbose.then(|| VERBOSE_FILTER.to_string()))
            .or(from_file)
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let format = env_value("AIVENO_LOG_FORMAT")
            .or_else(|| settings.and_then(|s| s.format.clone()))
            .and_then(|f| LogFormat::parse(&f))
            .unwrap_or_default();

        let file = env_value("AIVENO_LOG_FILE")
            .or_else(|| settings.and_then(|s| s.file.clone()))
            .map(PathBuf::from);

        Self {
            filter,
            format,
            file,
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
