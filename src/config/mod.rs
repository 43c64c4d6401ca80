//! Configuration management.
//!
//! Settings come from, in increasing precedence: built-in defaults, a TOML
//! file, then `AIVENO_*` environment variables. The file is looked up at
//! `--config`, then `AIVENO_CONFIG_PATH`, then the platform config directory
//! (`<config>/aiveno/config.toml`).
//!
//! ```toml
//! data_dir = "~/aiveno-data"
//!
//! [llm]
//! provider = "gemini"
//! model = "gemini-2.5-flash"
//! api_key = "${GEMINI_API_KEY}"
//! timeout_ms = 20000
//!
//! [logging]
//! level = "info"
//! format = "json"
//! file = "/tmp/aiveno.log"
//! ```

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration for aiveno.
#[derive(Debug, Clone, Default)]
pub struct AivenoConfig {
    /// Directory holding the state snapshot. `None` uses the platform data
    /// directory.
    pub data_dir: Option<PathBuf>,
    /// LLM provider configuration.
    pub llm: LlmConfig,
    /// Logging settings from the config file.
    pub logging: LoggingSettings,
    /// File the configuration was loaded from, if any.
    pub source: Option<PathBuf>,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    /// Provider: "gemini", "openai", "anthropic".
    pub provider: LlmProvider,
    /// Model name.
    pub model: Option<String>,
    /// API key, after `${VAR}` expansion.
    pub api_key: Option<String>,
    /// Base URL override for the provider API.
    pub base_url: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,
}

/// Available LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// Google Gemini.
    #[default]
    Gemini,
    /// `OpenAI` GPT.
    OpenAi,
    /// Anthropic Claude.
    Anthropic,
}

impl LlmProvider {
    /// Parses a provider string, falling back to Gemini.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "openai" | "open_ai" | "gpt" => Self::OpenAi,
            "anthropic" | "claude" => Self::Anthropic,
            "gemini" | "google" => Self::Gemini,
            other => {
                tracing::warn!(provider = other, "Unknown LLM provider; using gemini");
                Self::Gemini
            },
        }
    }

    /// Returns the provider name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }
}

/// Logging section as written in the config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `aiveno=debug`.
    pub level: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Log file path; stderr when absent.
    pub file: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Data directory.
    pub data_dir: Option<String>,
    /// LLM configuration.
    pub llm: Option<ConfigFileLlm>,
    /// Logging configuration.
    pub logging: Option<LoggingSettings>,
}

/// LLM section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLlm {
    /// Provider name.
    pub provider: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// API key, may reference an environment variable as `${NAME}`.
    pub api_key: Option<String>,
    /// Base URL.
    pub base_url: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,
}

impl AivenoConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let mut config = Self::from_toml(&contents)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration TOML.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks `AIVENO_CONFIG_PATH`, then the platform config dir, then
    /// `~/.config/aiveno/`. Returns the default configuration if no file is
    /// found; a file that fails to parse is logged and skipped.
    #[must_use]
    pub fn load_default() -> Self {
        Self::default_paths()
            .into_iter()
            .filter(|path| path.exists())
            .find_map(|path| match Self::load_from_file(&path) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
                    None
                },
            })
            .unwrap_or_default()
    }

    /// Loads configuration from an explicit path or the default locations,
    /// then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be loaded.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default(),
        };
        Ok(config.with_env_overrides())
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(path) = std::env::var("AIVENO_CONFIG_PATH") {
            if !path.trim().is_empty() {
                paths.push(PathBuf::from(path));
            }
        }
        if let Some(base_dirs) = directories::BaseDirs::new() {
            paths.push(base_dirs.config_dir().join("aiveno").join("config.toml"));
            paths.push(
                base_dirs
                    .home_dir()
                    .join(".config")
                    .join("aiveno")
                    .join("config.toml"),
            );
        }
        paths
    }

    /// Converts a `ConfigFile` to `AivenoConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(data_dir) = file.data_dir {
            config.data_dir = Some(expand_path(&data_dir));
        }
        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                config.llm.provider = LlmProvider::parse(&provider);
            }
            config.llm.model = llm.model;
            config.llm.api_key = llm
                .api_key
                .map(|key| expand_env_vars(&key))
                .filter(|key| !key.trim().is_empty());
            config.llm.base_url = llm.base_url;
            config.llm.timeout_ms = llm.timeout_ms;
            config.llm.connect_timeout_ms = llm.connect_timeout_ms;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Applies `AIVENO_*` environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = env_string("AIVENO_DATA_DIR") {
            self.data_dir = Some(expand_path(&dir));
        }
        if let Some(provider) = env_string("AIVENO_LLM_PROVIDER") {
            self.llm.provider = LlmProvider::parse(&provider);
        }
        if let Some(model) = env_string("AIVENO_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Some(base_url) = env_string("AIVENO_LLM_BASE_URL") {
            self.llm.base_url = Some(base_url);
        }
        self
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Resolves the data directory, falling back to the platform default.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the platform data
    /// directory cannot be determined.
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => crate::storage::get_user_data_dir(),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Expands `${NAME}` references from the environment.
///
/// Unset variables expand to the empty string; an unterminated `${` is kept
/// literally.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        out.push_str(&std::env::var(&after[..end]).unwrap_or_default());
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Expands environment references and a leading `~` in a path.
fn expand_path(value: &str) -> PathBuf {
    let expanded = expand_env_vars(value);
    if let Some(stripped) = expanded.strip_prefix("~/") {
        if let Some(base_dirs) = directories::BaseDirs::new() {
            return base_dirs.home_dir().join(stripped);
        }
    }
    PathBuf::from(expanded)
}
