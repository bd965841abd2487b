//! Configuration loading, validation, and management for DAVE.
//!
//! Loads configuration from `~/.dave/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use dave_conversation::StoreLimits;
use dave_conversation::limits::{DEFAULT_MAX_CONVERSATIONS, DEFAULT_MAX_FEEDBACK, DEFAULT_MAX_PATTERNS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Storage backends understood by `dave-storage`.
pub const STORAGE_BACKENDS: [&str; 3] = ["file", "memory", "none"];

/// Number of builtin starter questions; suggestion counts cannot exceed it.
const MAX_SUGGESTIONS: usize = 8;

/// The root configuration structure.
///
/// Maps directly to `~/.dave/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where conversations, feedback and patterns are kept
    #[serde(default)]
    pub storage: StorageConfig,

    /// Retention caps
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Reply pacing and suggestions
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Knowledge table source
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// HTTP API settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// "file", "memory" or "none"
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Directory for the file backend (defaults to `~/.dave/storage`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_storage_backend() -> String {
    "file".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            dir: None,
        }
    }
}

impl StorageConfig {
    /// The configured directory, or `~/.dave/storage`.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("storage"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_conversations")]
    pub max_conversations: usize,

    #[serde(default = "default_max_feedback")]
    pub max_feedback: usize,

    #[serde(default = "default_max_patterns")]
    pub max_patterns: usize,
}

fn default_max_conversations() -> usize {
    DEFAULT_MAX_CONVERSATIONS
}
fn default_max_feedback() -> usize {
    DEFAULT_MAX_FEEDBACK
}
fn default_max_patterns() -> usize {
    DEFAULT_MAX_PATTERNS
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_conversations: default_max_conversations(),
            max_feedback: default_max_feedback(),
            max_patterns: default_max_patterns(),
        }
    }
}

impl LimitsConfig {
    pub fn to_store_limits(&self) -> StoreLimits {
        StoreLimits {
            max_conversations: self.max_conversations,
            max_feedback: self.max_feedback,
            max_patterns: self.max_patterns,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Fixed part of the pause before a reply
    #[serde(default = "default_ponder_base_ms")]
    pub ponder_base_ms: u64,

    /// Upper bound of the random extra pause
    #[serde(default = "default_ponder_jitter_ms")]
    pub ponder_jitter_ms: u64,

    /// Starter questions shown under the input
    #[serde(default = "default_suggestion_count")]
    pub suggestion_count: usize,
}

fn default_ponder_base_ms() -> u64 {
    800
}
fn default_ponder_jitter_ms() -> u64 {
    400
}
fn default_suggestion_count() -> usize {
    3
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            ponder_base_ms: default_ponder_base_ms(),
            ponder_jitter_ms: default_ponder_jitter_ms(),
            suggestion_count: default_suggestion_count(),
        }
    }
}

impl AssistantConfig {
    pub fn ponder_base(&self) -> Duration {
        Duration::from_millis(self.ponder_base_ms)
    }

    pub fn ponder_jitter(&self) -> Duration {
        Duration::from_millis(self.ponder_jitter_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// JSON file replacing the builtin table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_port() -> u16 {
    8787
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".into()]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (`~/.dave/config.toml`)
    /// and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// `DAVE_STORAGE_BACKEND`, `DAVE_STORAGE_DIR` and `DAVE_PORT` win over the file.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(backend) = std::env::var("DAVE_STORAGE_BACKEND") {
            self.storage.backend = backend;
        }

        if let Ok(dir) = std::env::var("DAVE_STORAGE_DIR") {
            self.storage.dir = Some(PathBuf::from(dir));
        }

        if let Ok(port) = std::env::var("DAVE_PORT") {
            self.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("DAVE_PORT is not a valid port: {port}"))
            })?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".dave")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !STORAGE_BACKENDS.contains(&self.storage.backend.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "storage.backend must be one of {}, got '{}'",
                STORAGE_BACKENDS.join(", "),
                self.storage.backend
            )));
        }

        if self.limits.max_conversations == 0
            || self.limits.max_feedback == 0
            || self.limits.max_patterns == 0
        {
            return Err(ConfigError::ValidationError(
                "limits must all be greater than 0".into(),
            ));
        }

        if self.assistant.suggestion_count > MAX_SUGGESTIONS {
            return Err(ConfigError::ValidationError(format!(
                "assistant.suggestion_count must be at most {MAX_SUGGESTIONS}"
            )));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
