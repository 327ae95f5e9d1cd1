//! Pure factor calculators that scale a tick's raw activity.
use serde::{Deserialize, Serialize};

use crate::constants::{
    ACCLIMATIZATION_FRESH_DAYS, ACCLIMATIZATION_FRESH_FACTOR, ACCLIMATIZATION_PARTIAL_DAYS,
    ACCLIMATIZATION_PARTIAL_FACTOR, ALTITUDE_BAND_HIGH, ALTITUDE_BAND_LOW, ALTITUDE_BAND_MODERATE,
    ALTITUDE_MOD_DEATH_ZONE, ALTITUDE_MOD_HIGH, ALTITUDE_MOD_MODERATE, DEHYDRATION_FACTOR,
    DEHYDRATION_THRESHOLD, EQUIPMENT_DAMAGED_FACTOR, FATIGUE_MODERATE_FACTOR,
    FATIGUE_MODERATE_THRESHOLD, FATIGUE_SEVERE_FACTOR, FATIGUE_SEVERE_THRESHOLD,
    SICKNESS_PENALTY_PER_LEVEL,
};
use crate::state::{AcclimatizationStatus, ClimbingState, EquipmentStatus, HealthStatus};

/// Fraction of the mountain already climbed, 0 when the height is unusable.
#[must_use]
pub fn altitude_fraction(current_altitude: f64, height: f64) -> f64 {
    if !height.is_finite() || height <= 0.0 {
        return 0.0;
    }
    (current_altitude / height).max(0.0)
}

/// Step function of how far up the mountain the climber is.
#[must_use]
pub fn altitude_modifier(current_altitude: f64, height: f64) -> f64 {
    let fraction = altitude_fraction(current_altitude, height);
    if fraction < ALTITUDE_BAND_LOW {
        1.0
    } else if fraction < ALTITUDE_BAND_MODERATE {
        ALTITUDE_MOD_MODERATE
    } else if fraction < ALTITUDE_BAND_HIGH {
        ALTITUDE_MOD_HIGH
    } else {
        ALTITUDE_MOD_DEATH_ZONE
    }
}

#[must_use]
pub fn health_modifier(health: &HealthStatus) -> f64 {
    let mut modifier = 1.0;

    if health.altitude_sickness_severity > 0 {
        let penalty = f64::from(health.altitude_sickness_severity) * SICKNESS_PENALTY_PER_LEVEL;
        modifier *= 1.0 - penalty;
    }

    if health.fatigue_level > FATIGUE_SEVERE_THRESHOLD {
        modifier *= FATIGUE_SEVERE_FACTOR;
    } else if health.fatigue_level > FATIGUE_MODERATE_THRESHOLD {
        modifier *= FATIGUE_MODERATE_FACTOR;
    }

    if health.hydration_level < DEHYDRATION_THRESHOLD {
        modifier *= DEHYDRATION_FACTOR;
    }

    modifier
}

/// Compounding 5% penalty per damaged item.
#[must_use]
pub fn equipment_modifier(equipment: &EquipmentStatus) -> f64 {
    equipment
        .damaged()
        .fold(1.0, |modifier, _| modifier * EQUIPMENT_DAMAGED_FACTOR)
}

#[must_use]
pub const fn acclimatization_modifier(status: &AcclimatizationStatus) -> f64 {
    if status.days_at_current_altitude < ACCLIMATIZATION_FRESH_DAYS {
        ACCLIMATIZATION_FRESH_FACTOR
    } else if status.days_at_current_altitude < ACCLIMATIZATION_PARTIAL_DAYS {
        ACCLIMATIZATION_PARTIAL_FACTOR
    } else {
        1.0
    }
}

/// The five factors evaluated against one pre-tick state snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressModifiers {
    pub weather: f64,
    pub altitude: f64,
    pub health: f64,
    pub equipment: f64,
    pub acclimatization: f64,
}

impl ProgressModifiers {
    #[must_use]
    pub fn evaluate(state: &ClimbingState, height: f64) -> Self {
        Self {
            weather: state.current_weather.progress_modifier(),
            altitude: altitude_modifier(state.current_altitude, height),
            health: health_modifier(&state.health_status),
            equipment: equipment_modifier(&state.equipment_status),
            acclimatization: acclimatization_modifier(&state.acclimatization_status),
        }
    }

    /// Product of the applied factors; altitude joins only when requested.
    #[must_use]
    pub fn combined(&self, include_altitude: bool) -> f64 {
        let base = self.weather * self.health * self.equipment * self.acclimatization;
        if include_altitude {
            base * self.altitude
        } else {
            base
        }
    }
}
