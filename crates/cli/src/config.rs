//! Configuration management for the Travel Buddy CLI
//!
//! Handles loading and saving configuration from ~/.travel-buddy/config.toml

use std::path::{Path, PathBuf};

use anyhow::Result;
use booking_client::DEFAULT_API_BASE;
use booking_wizard::{Locale, VoiceAnswerPolicy, WizardConfig};
use serde::{Deserialize, Serialize};

/// Configuration for the Travel Buddy CLI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub wizard: WizardConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,

    #[serde(default)]
    pub token: Option<String>,
}

fn default_server_url() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("{} expects true or false, got '{}'", key, value))
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".travel-buddy")
            .join("config.toml")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a configuration value by key path (e.g., "server.url")
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "url"] => Some(self.server.url.clone()),
            ["server", "token"] => self.server.token.clone(),
            ["wizard", "locale"] => Some(self.wizard.locale.to_string()),
            ["wizard", "muted"] => Some(self.wizard.muted.to_string()),
            ["wizard", "settle_delay_ms"] => Some(self.wizard.settle_delay_ms.to_string()),
            ["wizard", "voice_answers"] => Some(
                match self.wizard.voice_answers {
                    VoiceAnswerPolicy::Validate => "validate",
                    VoiceAnswerPolicy::Trust => "trust",
                }
                .to_string(),
            ),
            ["display", "color"] => Some(self.display.color.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key path without saving
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "url"] => self.server.url = value.to_string(),
            ["server", "token"] => {
                self.server.token = Some(value.to_string()).filter(|t| !t.is_empty())
            }
            ["wizard", "locale"] => {
                self.wizard.locale = value.parse::<Locale>().map_err(anyhow::Error::msg)?
            }
            ["wizard", "muted"] => self.wizard.muted = parse_bool(key, value)?,
            ["wizard", "settle_delay_ms"] => {
                self.wizard.settle_delay_ms = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("{} expects milliseconds, got '{}'", key, value))?
            }
            ["wizard", "voice_answers"] => {
                self.wizard.voice_answers = match value {
                    "validate" => VoiceAnswerPolicy::Validate,
                    "trust" => VoiceAnswerPolicy::Trust,
                    other => anyhow::bail!("{} expects validate or trust, got '{}'", key, other),
                }
            }
            ["display", "color"] => self.display.color = parse_bool(key, value)?,
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }

        Ok(())
    }

    /// Set a configuration value by key path and save
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()?;
        Ok(())
    }

    /// Remember the display language for the next run. Only the stored
    /// file is touched, so command-line overrides are not persisted.
    pub fn remember_locale(locale: Locale) -> Result<()> {
        let mut stored = Self::load()?;
        stored.wizard.locale = locale;
        stored.save()
    }
}
