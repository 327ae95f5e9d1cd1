//! Dashboard readings derived from altitude, weather and health.
use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_VISIBILITY_KM, BASE_WIND_KMH, CRITICAL_SICKNESS_SEVERITY, FATIGUE_SEVERE_THRESHOLD,
    LAPSE_RATE_C_PER_M, MODERATE_RISK_MAX_FACTORS, SEA_LEVEL_TEMP_C, STORM_TEMP_DROP_C,
    STORM_WIND_BONUS_KMH, VISIBILITY_FLOOR_KM, WIND_KMH_PER_M, WINDY_WIND_BONUS_KMH,
};
use crate::state::{ClimbingState, HealthStatus};
use crate::weather::WeatherPattern;
use crate::zones::EnvironmentalZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCondition {
    Healthy,
    Fatigued,
    AltitudeSick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertTier {
    Ok,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    #[must_use]
    pub const fn from_factor_count(count: usize) -> Self {
        if count == 0 {
            Self::Low
        } else if count <= MODERATE_RISK_MAX_FACTORS {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

/// Snapshot of the readings a survival dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionsReport {
    pub altitude: f64,
    pub zone: EnvironmentalZone,
    pub weather: WeatherPattern,
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub visibility_km: f64,
    pub health: HealthCondition,
    pub alert: AlertTier,
    pub risk_level: RiskLevel,
}

impl ConditionsReport {
    #[must_use]
    pub fn from_state(state: &ClimbingState) -> Self {
        let altitude = state.current_altitude;
        let weather = state.current_weather;
        Self {
            altitude,
            zone: EnvironmentalZone::for_altitude(altitude),
            weather,
            temperature_c: temperature_c(altitude, weather),
            wind_speed_kmh: wind_speed_kmh(altitude, weather),
            visibility_km: visibility_km(weather),
            health: health_condition(&state.health_status),
            alert: alert_tier(&state.health_status),
            risk_level: RiskLevel::from_factor_count(state.risk_factors.len()),
        }
    }
}

#[must_use]
pub fn temperature_c(altitude: f64, weather: WeatherPattern) -> f64 {
    let storm_drop = if weather == WeatherPattern::Storm {
        STORM_TEMP_DROP_C
    } else {
        0.0
    };
    SEA_LEVEL_TEMP_C - altitude * LAPSE_RATE_C_PER_M - storm_drop
}

#[must_use]
pub fn wind_speed_kmh(altitude: f64, weather: WeatherPattern) -> f64 {
    let gusts = match weather {
        WeatherPattern::Windy => WINDY_WIND_BONUS_KMH,
        WeatherPattern::Storm => STORM_WIND_BONUS_KMH,
        _ => 0.0,
    };
    BASE_WIND_KMH + altitude * WIND_KMH_PER_M + gusts
}

#[must_use]
pub fn visibility_km(weather: WeatherPattern) -> f64 {
    let reduction = match weather {
        WeatherPattern::Clear => 0.0,
        WeatherPattern::Cloudy => -2.0,
        WeatherPattern::Storm => -8.0,
        _ => -5.0,
    };
    (BASE_VISIBILITY_KM + reduction).max(VISIBILITY_FLOOR_KM)
}

#[must_use]
pub fn health_condition(health: &HealthStatus) -> HealthCondition {
    if health.altitude_sickness_severity > 0 {
        HealthCondition::AltitudeSick
    } else if health.fatigue_level > FATIGUE_SEVERE_THRESHOLD {
        HealthCondition::Fatigued
    } else {
        HealthCondition::Healthy
    }
}

#[must_use]
pub fn alert_tier(health: &HealthStatus) -> AlertTier {
    if health.altitude_sickness_severity > CRITICAL_SICKNESS_SEVERITY {
        AlertTier::Critical
    } else if health.altitude_sickness_severity > 0
        || health.fatigue_level > FATIGUE_SEVERE_THRESHOLD
    {
        AlertTier::Warning
    } else {
        AlertTier::Ok
    }
}
