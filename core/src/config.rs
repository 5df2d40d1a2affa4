use crate::errors::TutorResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default text/vision model, also used for structured generation
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default image synthesis model
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Configuration struct for the tutor toolkit
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TutorConfig {
    pub api_key: Option<String>,
    pub system_prompt: Option<String>,
    pub text_model: Option<String>,
    pub image_model: Option<String>,
    pub log_level: Option<String>,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            system_prompt: None,
            text_model: Some(DEFAULT_TEXT_MODEL.to_string()),
            image_model: Some(DEFAULT_IMAGE_MODEL.to_string()),
            log_level: None,
        }
    }
}

impl TutorConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> TutorResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                crate::errors::TutorError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                crate::errors::TutorError::ConfigError(format!("Failed to parse config file: {}", e))
            })?;

            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> TutorResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            crate::errors::TutorError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        // Ensure the directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                crate::errors::TutorError::ConfigError(format!(
                    "Failed to create config directory: {}",
                    e
                ))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            crate::errors::TutorError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            system_prompt: other
                .system_prompt
                .clone()
                .or_else(|| self.system_prompt.clone()),
            text_model: other.text_model.clone().or_else(|| self.text_model.clone()),
            image_model: other
                .image_model
                .clone()
                .or_else(|| self.image_model.clone()),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }

    /// Loads the default config file and applies the `GEMINI_API_KEY` environment
    /// override, so the key never needs to live on disk
    pub fn load() -> TutorResult<Self> {
        let mut config = Self::load_from_file(&get_default_config_file("tutor-cli")?)?;
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        Ok(config)
    }

    /// Resolved text model name
    pub fn text_model(&self) -> &str {
        self.text_model.as_deref().unwrap_or(DEFAULT_TEXT_MODEL)
    }

    /// Resolved image model name
    pub fn image_model(&self) -> &str {
        self.image_model.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL)
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> TutorResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        crate::errors::TutorError::ConfigError("Could not determine home directory".to_string())
    })?;

    let config_dir = home_dir.join(".config").join(app_name);

    Ok(config_dir)
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> TutorResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_models() {
        let config = TutorConfig::default();
        assert_eq!(config.text_model(), DEFAULT_TEXT_MODEL);
        assert_eq!(config.image_model(), DEFAULT_IMAGE_MODEL);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = TutorConfig {
            api_key: Some("base-key".to_string()),
            system_prompt: Some("base prompt".to_string()),
            ..Default::default()
        };
        let other = TutorConfig {
            api_key: Some("other-key".to_string()),
            system_prompt: None,
            text_model: None,
            image_model: None,
            log_level: Some("debug".to_string()),
        };

        let merged = base.merge(&other);
        assert_eq!(merged.api_key.as_deref(), Some("other-key"));
        assert_eq!(merged.system_prompt.as_deref(), Some("base prompt"));
        assert_eq!(merged.text_model.as_deref(), Some(DEFAULT_TEXT_MODEL));
        assert_eq!(merged.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_missing_file_yields_default() {
        let config =
            TutorConfig::load_from_file(Path::new("/nonexistent/tutor/config.toml")).unwrap();
        assert_eq!(config.text_model(), DEFAULT_TEXT_MODEL);
    }
}
