//! Persisted user settings.
//! Stored in the platform-specific config directory via `directories::ProjectDirs`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Persona;
use crate::model::{
    ModelConfig, RetryPolicy, DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_BASE_URL,
    DEFAULT_INITIAL_DELAY_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Cannot determine config directory")]
    NoConfigDir,
    #[error("Failed to write settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Application settings that can be saved and loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Gemini API key
    pub api_key: String,
    /// API root URL
    pub base_url: String,
    /// Model name
    pub model_name: String,
    /// Last selected persona key
    pub persona: String,
    /// Total attempts per request
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds
    pub initial_delay_ms: u64,
    /// Backoff growth factor
    pub backoff_multiplier: u32,
    /// Chat sampling temperature
    pub temperature: f32,
    /// Chat output token ceiling
    pub max_output_tokens: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            persona: Persona::General.key().to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

impl AppSettings {
    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "persona-chat", "persona-chat")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path.
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.json"))
    }

    /// Load settings from the config file, falling back to defaults.
    pub fn load() -> Self {
        Self::settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from an explicit path. Missing or unreadable files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        let loaded: Self = fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        loaded.backfilled()
    }

    /// Save settings to the config file.
    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Selected persona; unknown keys fall back to General.
    pub fn persona(&self) -> Persona {
        self.persona.parse().unwrap_or_default()
    }

    pub fn set_persona(&mut self, persona: Persona) {
        self.persona = persona.key().to_string();
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_attempts(self.max_attempts)
            .with_initial_delay(Duration::from_millis(self.initial_delay_ms))
            .with_multiplier(self.backoff_multiplier)
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig::default()
            .with_base_url(&self.base_url)
            .with_model_name(&self.model_name)
            .with_temperature(self.temperature)
            .with_max_output_tokens(self.max_output_tokens)
            .with_retry_policy(self.retry_policy())
    }

    // Backfill fields that older or hand-edited files leave empty.
    fn backfilled(mut self) -> Self {
        let defaults = Self::default();

        if self.base_url.trim().is_empty() {
            self.base_url = defaults.base_url;
        }
        if self.model_name.trim().is_empty() {
            self.model_name = defaults.model_name;
        }
        if self.persona.parse::<Persona>().is_err() {
            self.persona = defaults.persona;
        }
        if self.max_attempts == 0 {
            self.max_attempts = defaults.max_attempts;
        }
        if self.backoff_multiplier == 0 {
            self.backoff_multiplier = defaults.backoff_multiplier;
        }
        if self.max_output_tokens == 0 {
            self.max_output_tokens = defaults.max_output_tokens;
        }

        self
    }
}
