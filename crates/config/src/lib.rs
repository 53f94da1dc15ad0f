//! Configuration loading, validation, and management for Concierge.
//!
//! Loads configuration from `~/.concierge/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Names reserved by the built-in assistants.
pub const BUILTIN_ASSISTANT_NAMES: &[&str] = &["default", "csv", "sql"];

/// The root configuration structure.
///
/// Maps directly to `~/.concierge/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model for answering requests
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Settings for the assistant-choice call
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Extra assistants registered after the built-in ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assistants: Vec<AssistantConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("selection", &self.selection)
            .field("providers", &self.providers)
            .field("assistants", &self.assistants)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

/// The assistant-choice call runs on its own model, usually a stronger
/// one than the model that ends up answering the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_selection_model")]
    pub model: String,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_selection_max_tokens")]
    pub max_tokens: u32,
}

fn default_selection_model() -> String {
    "gpt-4o".into()
}
fn default_selection_max_tokens() -> u32 {
    64
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            model: default_selection_model(),
            temperature: 0.0,
            max_tokens: default_selection_max_tokens(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

/// A caller-defined assistant.
///
/// ```toml
/// [[assistants]]
/// name = "reports"
/// display_name = "Report Writer"
/// description = "Writes summaries of spreadsheet and PDF data"
/// data_source_types = ["csv", "pdf"]
/// instructions = "Answer with a short executive summary."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Data-source types this assistant accepts. Empty accepts any type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_source_types: Vec<String>,

    /// Models this assistant works with. Empty accepts any model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,

    /// System instructions prepended to the conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.concierge/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `CONCIERGE_API_KEY` (highest priority)
    /// - `OPENAI_API_KEY`
    /// - `OPENROUTER_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
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

    /// Apply environment overrides, reading variables through `lookup`.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("CONCIERGE_API_KEY")
                .or_else(|| lookup("OPENAI_API_KEY"))
                .or_else(|| lookup("OPENROUTER_API_KEY"));
        }

        if let Some(provider) = lookup("CONCIERGE_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = lookup("CONCIERGE_MODEL") {
            self.default_model = model;
        }

        if let Some(model) = lookup("CONCIERGE_SELECTION_MODEL") {
            self.selection.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".concierge")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if !(0.0..=2.0).contains(&self.selection.temperature) {
            return Err(ConfigError::ValidationError(
                "selection.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        let mut seen = HashSet::new();
        for assistant in &self.assistants {
            let name = assistant.name.trim();
            if name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "assistant name must not be empty".into(),
                ));
            }
            if BUILTIN_ASSISTANT_NAMES.contains(&name) {
                return Err(ConfigError::ValidationError(format!(
                    "assistant name '{name}' is reserved by a built-in assistant"
                )));
            }
            if !seen.insert(name) {
                return Err(ConfigError::ValidationError(format!(
                    "assistant name '{name}' is defined more than once"
                )));
            }
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            selection: SelectionConfig::default(),
            providers: HashMap::new(),
            assistants: vec![],
        }
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
