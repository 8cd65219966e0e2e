//! UI tuning knobs loaded from TOML.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Defaults applied to elements when they are registered with a
/// [`UIManager`](crate::ui::UIManager).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Opacity step taken on every `update` call, not scaled by `dt`.
    #[serde(default = "default_fade_speed")]
    pub fade_speed: u8,
    /// Seconds between cursor visibility toggles in input boxes.
    #[serde(default = "default_cursor_blink_interval")]
    pub cursor_blink_interval: f32,
    /// Opacity used for button labels while the button is disabled.
    #[serde(default = "default_disabled_label_opacity")]
    pub disabled_label_opacity: u8,
    #[serde(default = "default_input_max_length")]
    pub input_max_length: usize,
}

fn default_fade_speed() -> u8 {
    5
}

fn default_cursor_blink_interval() -> f32 {
    0.5
}

fn default_disabled_label_opacity() -> u8 {
    128
}

fn default_input_max_length() -> usize {
    20
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            fade_speed: default_fade_speed(),
            cursor_blink_interval: default_cursor_blink_interval(),
            disabled_label_opacity: default_disabled_label_opacity(),
            input_max_length: default_input_max_length(),
        }
    }
}

impl UiConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: UiConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("No UI config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!("UI config loaded from {:?}", path);
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fade_speed == 0 {
            return Err(ConfigError::Invalid {
                field: "fade_speed",
                reason: format!("must be at least 1, got {}", self.fade_speed),
            });
        }
        if !(self.cursor_blink_interval > 0.0) {
            return Err(ConfigError::Invalid {
                field: "cursor_blink_interval",
                reason: format!("must be positive, got {}", self.cursor_blink_interval),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = UiConfig::from_toml_str("fade_speed = 15").unwrap();
        assert_eq!(config.fade_speed, 15);
        assert_eq!(config.cursor_blink_interval, 0.5);
        assert_eq!(config.disabled_label_opacity, 128);
        assert_eq!(config.input_max_length, 20);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(UiConfig::from_toml_str("").unwrap(), UiConfig::default());
    }

    #[test]
    fn test_rejects_non_positive_blink() {
        let err = UiConfig::from_toml_str("cursor_blink_interval = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "cursor_blink_interval", .. }));
    }

    #[test]
    fn test_rejects_zero_fade_speed() {
        let err = UiConfig::from_toml_str("fade_speed = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "fade_speed", .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = UiConfig::from_toml_str("fade_speed = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = UiConfig::load("/definitely/not/here/ui.toml").unwrap();
        assert_eq!(config, UiConfig::default());
    }
}
