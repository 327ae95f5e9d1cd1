//! Risk factors derived from the climber's current state.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::constants::{RISK_FATIGUE_THRESHOLD, RISK_SICKNESS_THRESHOLD};
use crate::state::ClimbingState;
use crate::weather::SafetyRisk;

/// At most one factor per kind is active at a time.
pub type RiskFactors = SmallVec<[RiskFactor; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    AltitudeSickness,
    Weather,
    Equipment,
    Fatigue,
    Dehydration,
    Hypothermia,
}

impl RiskKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AltitudeSickness => "Altitude Sickness",
            Self::Weather => "Weather",
            Self::Equipment => "Equipment",
            Self::Fatigue => "Fatigue",
            Self::Dehydration => "Dehydration",
            Self::Hypothermia => "Hypothermia",
        }
    }
}

impl fmt::Display for RiskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    Low,
    Moderate,
    High,
    Extreme,
}

impl From<SafetyRisk> for RiskSeverity {
    fn from(value: SafetyRisk) -> Self {
        match value {
            SafetyRisk::Low => Self::Low,
            SafetyRisk::Moderate => Self::Moderate,
            SafetyRisk::High => Self::High,
            SafetyRisk::Extreme => Self::Extreme,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub kind: RiskKind,
    pub severity: RiskSeverity,
    pub description: String,
    pub mitigation: String,
}

impl RiskFactor {
    fn new(kind: RiskKind, severity: RiskSeverity, description: &str, mitigation: &str) -> Self {
        Self {
            kind,
            severity,
            description: description.to_string(),
            mitigation: mitigation.to_string(),
        }
    }
}

/// Rebuild the active risk list from scratch.
///
/// Order is fixed: altitude sickness, weather, equipment, fatigue.
#[must_use]
pub fn assess_risks(state: &ClimbingState) -> RiskFactors {
    let mut risks = RiskFactors::new();

    if state.acclimatization_status.altitude_sickness_risk > RISK_SICKNESS_THRESHOLD {
        risks.push(RiskFactor::new(
            RiskKind::AltitudeSickness,
            RiskSeverity::High,
            "Altitude sickness risk is high. Rest or descend before pushing on.",
            "Hold at the current altitude, drink plenty and be ready to go down",
        ));
    }

    let tier = state.current_weather.safety_risk();
    if matches!(tier, SafetyRisk::High | SafetyRisk::Extreme) {
        risks.push(RiskFactor::new(
            RiskKind::Weather,
            tier.into(),
            "Weather on the mountain is dangerous. Do not climb.",
            "Shelter in place until the weather clears",
        ));
    }

    if state.equipment_status.any_damaged() {
        risks.push(RiskFactor::new(
            RiskKind::Equipment,
            RiskSeverity::Moderate,
            "Damaged equipment is compromising safety.",
            "Repair or swap out damaged gear before moving on",
        ));
    }

    if state.health_status.fatigue_level > RISK_FATIGUE_THRESHOLD {
        risks.push(RiskFactor::new(
            RiskKind::Fatigue,
            RiskSeverity::High,
            "Exhaustion is setting in and judgement suffers.",
            "Rest and recover before continuing",
        ));
    }

    risks
}
