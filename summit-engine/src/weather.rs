//! Weather patterns and the daily weather draw
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::config::ConfigError;

const DEFAULT_WEATHER_DATA: &str = include_str!("../data/weather.json");

/// Weather conditions that scale movement and drive safety warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeatherPattern {
    #[default]
    Clear,
    Cloudy,
    Windy,
    Storm,
    Blizzard,
}

/// Safety tier attached to a weather pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyRisk {
    Low,
    Moderate,
    High,
    Extreme,
}

/// Fixed sampling order; the cumulative draw walks patterns in this sequence.
pub const WEATHER_ORDER: [WeatherPattern; 5] = [
    WeatherPattern::Clear,
    WeatherPattern::Cloudy,
    WeatherPattern::Windy,
    WeatherPattern::Storm,
    WeatherPattern::Blizzard,
];

impl WeatherPattern {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Cloudy => "Cloudy",
            Self::Windy => "Windy",
            Self::Storm => "Storm",
            Self::Blizzard => "Blizzard",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Clear => "Perfect climbing conditions",
            Self::Cloudy => "Reduced visibility but safe",
            Self::Windy => "Strong winds, increased difficulty",
            Self::Storm => "Dangerous conditions, rest required",
            Self::Blizzard => "Extreme conditions, no progress possible",
        }
    }

    /// Multiplier applied to reported steps and elevation.
    #[must_use]
    pub const fn progress_modifier(self) -> f64 {
        match self {
            Self::Clear => 1.0,
            Self::Cloudy => 0.9,
            Self::Windy => 0.7,
            Self::Storm => 0.3,
            Self::Blizzard => 0.0,
        }
    }

    #[must_use]
    pub const fn safety_risk(self) -> SafetyRisk {
        match self {
            Self::Clear | Self::Cloudy => SafetyRisk::Low,
            Self::Windy => SafetyRisk::Moderate,
            Self::Storm => SafetyRisk::High,
            Self::Blizzard => SafetyRisk::Extreme,
        }
    }

    /// Whether the pattern should surface a weather risk factor.
    #[must_use]
    pub const fn is_dangerous(self) -> bool {
        matches!(self.safety_risk(), SafetyRisk::High | SafetyRisk::Extreme)
    }

    /// Sun and wind exposure that drains hydration during a tick.
    #[must_use]
    pub const fn drains_hydration(self) -> bool {
        matches!(self, Self::Clear | Self::Windy)
    }

    /// Whether the pattern warrants the storm-shelter tip.
    #[must_use]
    pub const fn is_storm_like(self) -> bool {
        matches!(self, Self::Storm | Self::Blizzard)
    }
}

impl fmt::Display for WeatherPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weighted distribution the daily weather is drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub weights: HashMap<WeatherPattern, f64>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl WeatherConfig {
    /// Load weather configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON string cannot be parsed or if validation fails.
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate that every weight is usable and the distribution is not empty.
    ///
    /// # Errors
    ///
    /// Returns an error for negative or non-finite weights, or when no pattern has positive weight.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (pattern, weight) in &self.weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    pattern: *pattern,
                    weight: *weight,
                });
            }
        }
        if self.total_weight() <= 0.0 {
            return Err(ConfigError::EmptyDistribution);
        }
        Ok(())
    }

    /// Get the embedded default distribution.
    #[must_use]
    pub fn default_config() -> Self {
        Self::from_json(DEFAULT_WEATHER_DATA).unwrap_or_else(|_| Self::builtin())
    }

    fn builtin() -> Self {
        Self {
            weights: HashMap::from([
                (WeatherPattern::Clear, 0.4),
                (WeatherPattern::Cloudy, 0.3),
                (WeatherPattern::Windy, 0.2),
                (WeatherPattern::Storm, 0.1),
                (WeatherPattern::Blizzard, 0.0),
            ]),
        }
    }

    #[must_use]
    pub fn weight(&self, pattern: WeatherPattern) -> f64 {
        self.weights.get(&pattern).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn total_weight(&self) -> f64 {
        WEATHER_ORDER
            .iter()
            .map(|pattern| self.weight(*pattern))
            .filter(|weight| weight.is_finite() && *weight > 0.0)
            .sum()
    }

    /// Normalized probability of a pattern under this distribution.
    #[must_use]
    pub fn probability(&self, pattern: WeatherPattern) -> f64 {
        let total = self.total_weight();
        if total <= 0.0 {
            return 0.0;
        }
        self.weight(pattern).max(0.0) / total
    }
}

/// Draw one weather pattern by cumulative-sum sampling of a single uniform roll.
pub fn select_weather<R>(cfg: &WeatherConfig, rng: &mut R) -> WeatherPattern
where
    R: Rng + ?Sized,
{
    let total = cfg.total_weight();
    if total <= 0.0 {
        return WeatherPattern::Clear;
    }

    let roll = rng.r#gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut candidate = WeatherPattern::Clear;

    for pattern in WEATHER_ORDER {
        let weight = cfg.weight(pattern);
        if !weight.is_finite() || weight <= 0.0 {
            continue;
        }
        candidate = pattern;
        cumulative += weight;
        if roll < cumulative {
            return pattern;
        }
    }

    // Rounding can leave the roll a hair above the final cumulative bound.
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn default_config_matches_published_weights() {
        let cfg = WeatherConfig::default_config();
        assert!((cfg.weight(WeatherPattern::Clear) - 0.4).abs() < 1e-12);
        assert!((cfg.weight(WeatherPattern::Cloudy) - 0.3).abs() < 1e-12);
        assert!((cfg.weight(WeatherPattern::Windy) - 0.2).abs() < 1e-12);
        assert!((cfg.weight(WeatherPattern::Storm) - 0.1).abs() < 1e-12);
        assert!(cfg.weight(WeatherPattern::Blizzard).abs() < 1e-12);
        assert!((cfg.total_weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn patterns_expose_modifiers_and_tiers() {
        assert!((WeatherPattern::Windy.progress_modifier() - 0.7).abs() < f64::EPSILON);
        assert_eq!(WeatherPattern::Storm.safety_risk(), SafetyRisk::High);
        assert_eq!(WeatherPattern::Blizzard.safety_risk(), SafetyRisk::Extreme);
        assert!(WeatherPattern::Storm.is_dangerous());
        assert!(!WeatherPattern::Windy.is_dangerous());
        assert!(WeatherPattern::Clear.drains_hydration());
        assert!(!WeatherPattern::Cloudy.drains_hydration());
    }

    #[test]
    fn validation_rejects_bad_weights() {
        let negative = r#"{"weights": {"Clear": -1.0, "Storm": 1.0}}"#;
        assert!(matches!(
            WeatherConfig::from_json(negative),
            Err(ConfigError::InvalidWeight { .. })
        ));
        let empty = r#"{"weights": {"Clear": 0.0}}"#;
        assert!(matches!(
            WeatherConfig::from_json(empty),
            Err(ConfigError::EmptyDistribution)
        ));
        assert!(matches!(
            WeatherConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn single_weight_always_selected() {
        let cfg = WeatherConfig {
            weights: HashMap::from([(WeatherPattern::Blizzard, 2.5)]),
        };
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..64 {
            assert_eq!(select_weather(&cfg, &mut rng), WeatherPattern::Blizzard);
        }
    }

    #[test]
    fn empty_distribution_falls_back_to_clear() {
        let cfg = WeatherConfig {
            weights: HashMap::new(),
        };
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(select_weather(&cfg, &mut rng), WeatherPattern::Clear);
    }

    #[test]
    fn default_distribution_never_yields_blizzard() {
        let cfg = WeatherConfig::default_config();
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..5_000 {
            assert_ne!(select_weather(&cfg, &mut rng), WeatherPattern::Blizzard);
        }
    }
}
