//! Configuration management for the explainer

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::document::{DEFAULT_DOCUMENT, DocumentSource};
use crate::explain::{ClaudeClient, ClaudeModel, DEFAULT_API_KEY_VAR};
use crate::theme::Theme;

const APP_NAME: &str = "blueprint-explainer";

/// Name of the log file written in TUI mode
pub const LOG_FILE_NAME: &str = "blueprint-explainer.log";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Selected theme name
    pub theme: String,

    /// Custom theme overrides (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_theme: Option<Theme>,

    /// Blueprint location, a file path or an http(s) URL
    pub document: String,

    /// Model that writes the explanations
    pub model: ClaudeModel,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Messages endpoint
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "Tokyo Night".to_string(),
            custom_theme: None,
            document: DEFAULT_DOCUMENT.to_string(),
            model: ClaudeModel::default(),
            api_key_env: DEFAULT_API_KEY_VAR.to_string(),
            api_url: ClaudeClient::API_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            Self::from_json(&contents)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Parse configuration text, filling missing fields with defaults
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).with_context(|| "Failed to parse config.json")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", APP_NAME).context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", APP_NAME).context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Get the log file path
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(LOG_FILE_NAME))
    }

    /// Where the blueprint comes from
    pub fn document_source(&self) -> DocumentSource {
        DocumentSource::parse(&self.document)
    }

    /// Get the active theme
    pub fn active_theme(&self) -> Theme {
        self.custom_theme.clone().unwrap_or_else(Theme::tokyo_night)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_tokyo_night_theme() {
        let config = Config::default();
        assert_eq!(config.theme, "Tokyo Night");
        assert_eq!(config.active_theme().name, "Tokyo Night");
    }

    #[test]
    fn default_config_reads_local_blueprint() {
        let config = Config::default();
        assert_eq!(config.document, "Blueprint.md");
        assert_eq!(config.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.model, ClaudeModel::Haiku45);
        assert!(matches!(config.document_source(), DocumentSource::File(_)));
    }

    #[test]
    fn config_serializes_to_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("Tokyo Night"));
        assert!(json.contains("Blueprint.md"));
        assert!(!json.contains("custom_theme"));
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let json = r#"{"document":"https://example.com/Blueprint.md","model":"Sonnet45"}"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.model, ClaudeModel::Sonnet45);
        assert_eq!(config.theme, "Tokyo Night");
        assert_eq!(config.api_url, ClaudeClient::API_URL);
        assert!(matches!(config.document_source(), DocumentSource::Url(_)));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let config = Config::from_json(r#"{"vim_mode":false}"#).unwrap();
        assert_eq!(config.document, "Blueprint.md");
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(Config::from_json("{not json").is_err());
    }

    #[test]
    fn custom_theme_overrides_default() {
        let mut theme = Theme::tokyo_night();
        theme.name = "Mine".into();
        let config = Config { custom_theme: Some(theme), ..Default::default() };
        assert_eq!(config.active_theme().name, "Mine");
    }
}
