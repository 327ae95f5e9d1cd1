//! Climber state owned by the engine and the clamped updates applied to it.
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HYDRATION, DEFAULT_NUTRITION, DEFAULT_SLEEP_QUALITY, DESCENT_METERS,
    DESCENT_RISK_RELIEF, EQUIPMENT_DAMAGED_THRESHOLD, EQUIPMENT_DURABILITY_MAX,
    EQUIPMENT_WORN_THRESHOLD, EXPOSURE_HYDRATION_LOSS, GRADUAL_ASCENT_RELIEF,
    HEAVY_EXERTION_FATIGUE, HEAVY_EXERTION_GAIN, HYDRATE_AMOUNT, LIGHT_EXERTION_FATIGUE,
    LIGHT_EXERTION_GAIN, MODERATE_ASCENT_GAIN, MODERATE_ASCENT_RISK, RAPID_ASCENT_GAIN,
    RAPID_ASCENT_RISK, REST_FATIGUE_RELIEF, REST_RISK_RELIEF, SICKNESS_ONSET_RISK,
    SICKNESS_RELIEF_RISK, SICKNESS_SEVERITY_MAX, STARTER_EQUIPMENT,
};
use crate::numbers::clamp_unit;
use crate::risk::RiskFactors;
use crate::tips::ClimbingTip;
use crate::weather::WeatherPattern;

/// How well the climber has adapted to the altitude they are sleeping at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcclimatizationStatus {
    pub days_at_current_altitude: u32,
    pub altitude_sickness_risk: f64,
    pub max_altitude_reached: f64,
    /// Altitude gained during the most recent tick, in meters.
    pub last_ascent_rate: f64,
}

impl Default for AcclimatizationStatus {
    fn default() -> Self {
        Self {
            days_at_current_altitude: 0,
            altitude_sickness_risk: 0.0,
            max_altitude_reached: 0.0,
            last_ascent_rate: 0.0,
        }
    }
}

impl AcclimatizationStatus {
    /// Fold one tick's altitude gain into the acclimatization record.
    ///
    /// Rapid gains reset the adaptation clock and raise sickness risk; slow
    /// progress counts as a day spent adapting and lets the risk settle.
    pub fn record_ascent(&mut self, altitude_gain: f64, current_altitude: f64) {
        if altitude_gain > RAPID_ASCENT_GAIN {
            self.days_at_current_altitude = 0;
            self.raise_risk(RAPID_ASCENT_RISK);
        } else if altitude_gain > MODERATE_ASCENT_GAIN {
            self.days_at_current_altitude = 0;
            self.raise_risk(MODERATE_ASCENT_RISK);
        } else {
            self.days_at_current_altitude = self.days_at_current_altitude.saturating_add(1);
            self.lower_risk(GRADUAL_ASCENT_RELIEF);
        }
        self.last_ascent_rate = altitude_gain.max(0.0);
        self.max_altitude_reached = self.max_altitude_reached.max(current_altitude);
    }

    pub fn raise_risk(&mut self, amount: f64) {
        self.altitude_sickness_risk = clamp_unit(self.altitude_sickness_risk + amount);
    }

    pub fn lower_risk(&mut self, amount: f64) {
        self.altitude_sickness_risk = clamp_unit(self.altitude_sickness_risk - amount);
    }

    fn sanitize(&mut self) {
        self.altitude_sickness_risk = clamp_unit(self.altitude_sickness_risk);
        self.max_altitude_reached = finite_non_negative(self.max_altitude_reached);
        self.last_ascent_rate = finite_non_negative(self.last_ascent_rate);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub altitude_sickness_severity: u8,
    pub fatigue_level: f64,
    pub hydration_level: f64,
    pub nutrition_level: f64,
    pub sleep_quality: f64,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            altitude_sickness_severity: 0,
            fatigue_level: 0.0,
            hydration_level: DEFAULT_HYDRATION,
            nutrition_level: DEFAULT_NUTRITION,
            sleep_quality: DEFAULT_SLEEP_QUALITY,
        }
    }
}

impl HealthStatus {
    /// Apply exertion, exposure and sickness progression for one tick.
    pub fn record_exertion(
        &mut self,
        altitude_gain: f64,
        weather: WeatherPattern,
        sickness_risk: f64,
    ) {
        if altitude_gain > HEAVY_EXERTION_GAIN {
            self.add_fatigue(HEAVY_EXERTION_FATIGUE);
        } else if altitude_gain > LIGHT_EXERTION_GAIN {
            self.add_fatigue(LIGHT_EXERTION_FATIGUE);
        }

        if weather.drains_hydration() {
            self.hydration_level = clamp_unit(self.hydration_level - EXPOSURE_HYDRATION_LOSS);
        }

        if sickness_risk > SICKNESS_ONSET_RISK {
            self.worsen_sickness();
        } else if sickness_risk < SICKNESS_RELIEF_RISK {
            self.ease_sickness();
        }
    }

    pub fn add_fatigue(&mut self, amount: f64) {
        self.fatigue_level = clamp_unit(self.fatigue_level + amount);
    }

    pub fn worsen_sickness(&mut self) {
        self.altitude_sickness_severity = self
            .altitude_sickness_severity
            .saturating_add(1)
            .min(SICKNESS_SEVERITY_MAX);
    }

    pub const fn ease_sickness(&mut self) {
        self.altitude_sickness_severity = self.altitude_sickness_severity.saturating_sub(1);
    }

    fn sanitize(&mut self) {
        self.altitude_sickness_severity = self.altitude_sickness_severity.min(SICKNESS_SEVERITY_MAX);
        self.fatigue_level = clamp_unit(self.fatigue_level);
        self.hydration_level = clamp_unit(self.hydration_level);
        self.nutrition_level = clamp_unit(self.nutrition_level);
        self.sleep_quality = clamp_unit(self.sleep_quality);
    }
}

/// A single piece of climbing gear and its remaining durability (0 to 100).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub name: String,
    pub durability: u8,
}

impl EquipmentItem {
    #[must_use]
    pub fn new(name: impl Into<String>, durability: u8) -> Self {
        Self {
            name: name.into(),
            durability: durability.min(EQUIPMENT_DURABILITY_MAX),
        }
    }

    /// Gear below half durability compromises safety.
    #[must_use]
    pub const fn is_damaged(&self) -> bool {
        self.durability < EQUIPMENT_DAMAGED_THRESHOLD
    }

    /// Gear that should be inspected soon.
    #[must_use]
    pub const fn is_worn(&self) -> bool {
        self.durability < EQUIPMENT_WORN_THRESHOLD
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentStatus {
    pub equipment: Vec<EquipmentItem>,
}

impl Default for EquipmentStatus {
    fn default() -> Self {
        Self {
            equipment: STARTER_EQUIPMENT
                .iter()
                .map(|name| EquipmentItem::new(*name, EQUIPMENT_DURABILITY_MAX))
                .collect(),
        }
    }
}

impl EquipmentStatus {
    pub fn damaged(&self) -> impl Iterator<Item = &EquipmentItem> {
        self.equipment.iter().filter(|item| item.is_damaged())
    }

    #[must_use]
    pub fn any_damaged(&self) -> bool {
        self.damaged().next().is_some()
    }

    #[must_use]
    pub fn any_worn(&self) -> bool {
        self.equipment.iter().any(EquipmentItem::is_worn)
    }

    /// Set durability for a named item, returning false if the item is unknown.
    pub fn set_durability(&mut self, name: &str, durability: u8) -> bool {
        match self.equipment.iter_mut().find(|item| item.name == name) {
            Some(item) => {
                item.durability = durability.min(EQUIPMENT_DURABILITY_MAX);
                true
            }
            None => false,
        }
    }

    fn sanitize(&mut self) {
        for item in &mut self.equipment {
            item.durability = item.durability.min(EQUIPMENT_DURABILITY_MAX);
        }
    }
}

/// Full mutable state of one climbing session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClimbingState {
    pub current_altitude: f64,
    pub acclimatization_status: AcclimatizationStatus,
    pub health_status: HealthStatus,
    pub equipment_status: EquipmentStatus,
    pub current_weather: WeatherPattern,
    pub risk_factors: RiskFactors,
    pub climbing_tips: Vec<ClimbingTip>,
}

impl ClimbingState {
    /// Sleep off fatigue and spend a day adapting at the current altitude.
    pub fn rest(&mut self) {
        self.health_status.fatigue_level =
            clamp_unit(self.health_status.fatigue_level - REST_FATIGUE_RELIEF);
        let accl = &mut self.acclimatization_status;
        accl.days_at_current_altitude = accl.days_at_current_altitude.saturating_add(1);
        accl.lower_risk(REST_RISK_RELIEF);
    }

    pub fn hydrate(&mut self) {
        self.health_status.hydration_level =
            clamp_unit(self.health_status.hydration_level + HYDRATE_AMOUNT);
    }

    /// Drop back down the mountain; never below the trailhead.
    pub fn descend(&mut self) {
        self.current_altitude = (self.current_altitude - DESCENT_METERS).max(0.0);
        self.health_status.ease_sickness();
        self.acclimatization_status.lower_risk(DESCENT_RISK_RELIEF);
    }

    /// Force every bounded field back into range, e.g. after loading external data.
    pub fn sanitize(&mut self) {
        self.current_altitude = finite_non_negative(self.current_altitude);
        self.acclimatization_status.sanitize();
        self.health_status.sanitize();
        self.equipment_status.sanitize();
    }
}

fn finite_non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
