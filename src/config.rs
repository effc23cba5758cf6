//! Page-supplied configuration
//!
//! The host page may embed a JSON block (`<script id="game-config"
//! type="application/json">`) overriding tuning and settings. Missing keys
//! fall back to defaults. The result is validated before any session starts.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// DOM id of the optional config block
pub const CONFIG_ELEMENT_ID: &str = "game-config";

/// Everything a session needs before its first tick
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tuning: Tuning,
    pub settings: Settings,
}

impl GameConfig {
    /// Parse and validate a config document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.tuning.validate()?;
        Ok(Self {
            settings: config.settings.sanitized(),
            ..config
        })
    }

    /// Read the config block from the page, or defaults if there is none
    #[cfg(target_arch = "wasm32")]
    pub fn load(document: &web_sys::Document) -> Result<Self, ConfigError> {
        let text = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
            .filter(|text| !text.trim().is_empty());

        match text {
            Some(json) => {
                let config = Self::from_json(&json)?;
                log::info!("Loaded game config from #{}", CONFIG_ELEMENT_ID);
                Ok(config)
            }
            None => {
                log::info!("Using default game config");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TuningError;
    use crate::settings::QualityPreset;

    #[test]
    fn test_empty_object_is_defaults() {
        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = GameConfig::from_json(
            r#"{
                "tuning": { "obstacles": { "spawn_every_ticks": 30, "despawn_depth": null } },
                "settings": { "quality": "High", "master_volume": 7.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.tuning.obstacles.spawn_every_ticks, 30);
        assert_eq!(config.tuning.obstacles.despawn_depth, None);
        assert_eq!(config.tuning.obstacles.step, 10.0);
        assert_eq!(config.tuning.stripes, Tuning::default().stripes);
        assert_eq!(config.settings.quality, QualityPreset::High);
        assert_eq!(config.settings.master_volume, 1.0);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let err = GameConfig::from_json(r#"{ "tuning": { "collision": { "depth_threshold": -1.0 } } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Tuning(TuningError::NotPositive { .. })
        ));
    }

    #[test]
    fn test_negative_interval_rejected_at_parse() {
        let err = GameConfig::from_json(
            r#"{ "tuning": { "buildings": {
                "counter_start": 0, "counter_increment": 15, "spawn_interval": -50,
                "counter_ceiling": 500, "step": 15.0, "despawn_depth": 1000.0
            } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_incomplete_stream_block_rejected() {
        let err = GameConfig::from_json(r#"{ "tuning": { "stripes": { "step": 30.0 } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            GameConfig::from_json("{"),
            Err(ConfigError::Json(_))
        ));
    }
}
