//! Engine configuration loaded from JSON and validated before use.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_STORAGE_KEY;
use crate::weather::{WeatherConfig, WeatherPattern};

/// How often the engine rolls fresh weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeatherPolicy {
    /// One roll when the engine is constructed; callers re-roll explicitly.
    #[default]
    PerSession,
    /// Roll before every `ticks`-th activity tick.
    EveryTicks { ticks: u32 },
}

impl WeatherPolicy {
    /// Whether a roll is due before the tick with the given zero-based index.
    #[must_use]
    pub fn rolls_before_tick(self, tick_index: u64) -> bool {
        match self {
            Self::PerSession => false,
            Self::EveryTicks { ticks } => {
                // Tick 0 already has the construction-time roll.
                ticks > 0 && tick_index > 0 && tick_index % u64::from(ticks) == 0
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub storage_key: String,
    pub weather: WeatherConfig,
    pub weather_policy: WeatherPolicy,
    pub apply_altitude_modifier: bool,
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            weather: WeatherConfig::default_config(),
            weather_policy: WeatherPolicy::PerSession,
            apply_altitude_modifier: false,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate an engine configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON is malformed or a field fails validation.
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error for an empty storage key, a zero-tick weather policy,
    /// or an unusable weather distribution.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if let WeatherPolicy::EveryTicks { ticks: 0 } = self.weather_policy {
            return Err(ConfigError::ZeroTickPolicy);
        }
        self.weather.validate()
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    #[must_use]
    pub const fn with_weather_policy(mut self, policy: WeatherPolicy) -> Self {
        self.weather_policy = policy;
        self
    }

    #[must_use]
    pub const fn with_altitude_modifier(mut self, apply: bool) -> Self {
        self.apply_altitude_modifier = apply;
        self
    }

    #[must_use]
    pub fn with_weather(mut self, weather: WeatherConfig) -> Self {
        self.weather = weather;
        self
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("weather weight for {pattern} must be finite and non-negative (got {weight})")]
    InvalidWeight { pattern: WeatherPattern, weight: f64 },
    #[error("weather distribution has no positive weight")]
    EmptyDistribution,
    #[error("storage key must not be empty")]
    EmptyStorageKey,
    #[error("weather policy must roll at least every 1 tick")]
    ZeroTickPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_preserve_unapplied_altitude_modifier() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.storage_key, "realistic_climbing_data");
        assert!(!cfg.apply_altitude_modifier);
        assert_eq!(cfg.weather_policy, WeatherPolicy::PerSession);
        assert!(cfg.seed.is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = EngineConfig::from_json(
            r#"{"seed": 42, "weather_policy": {"kind": "every_ticks", "ticks": 24}}"#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.weather_policy, WeatherPolicy::EveryTicks { ticks: 24 });
        assert_eq!(cfg.storage_key, "realistic_climbing_data");
    }

    #[test]
    fn rejects_degenerate_settings() {
        assert!(matches!(
            EngineConfig::from_json(r#"{"storage_key": "  "}"#),
            Err(ConfigError::EmptyStorageKey)
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"weather_policy": {"kind": "every_ticks", "ticks": 0}}"#),
            Err(ConfigError::ZeroTickPolicy)
        ));
    }

    #[test]
    fn every_ticks_policy_rolls_on_boundaries() {
        let policy = WeatherPolicy::EveryTicks { ticks: 3 };
        let due: Vec<u64> = (0..10).filter(|i| policy.rolls_before_tick(*i)).collect();
        assert_eq!(due, vec![3, 6, 9]);
        assert!(!WeatherPolicy::PerSession.rolls_before_tick(5));
    }
}
