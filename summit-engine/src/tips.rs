//! Contextual advice generated from zone, weather, gear and hydration.
use serde::{Deserialize, Serialize};

use crate::constants::{HIGH_ALTITUDE_TIP_METERS, HYDRATION_TIP_THRESHOLD};
use crate::state::ClimbingState;
use crate::zones::EnvironmentalZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    Altitude,
    Weather,
    Equipment,
    Health,
    Technique,
    Safety,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimbingTip {
    pub title: String,
    pub description: String,
    pub category: TipCategory,
}

impl ClimbingTip {
    fn new(title: &str, description: &str, category: TipCategory) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            category,
        }
    }
}

fn zone_tips(zone: EnvironmentalZone) -> [ClimbingTip; 2] {
    match zone {
        EnvironmentalZone::Rainforest => [
            ClimbingTip::new(
                "Rainforest Navigation",
                "Keep to the marked trail. Roots and mud make the footing slick.",
                TipCategory::Technique,
            ),
            ClimbingTip::new(
                "High Humidity",
                "You sweat more in humid air than you notice. Drink before you are thirsty.",
                TipCategory::Health,
            ),
        ],
        EnvironmentalZone::Moorland => [
            ClimbingTip::new(
                "Moorland Weather",
                "Conditions turn quickly up here. Carry layers you can add or shed fast.",
                TipCategory::Weather,
            ),
            ClimbingTip::new(
                "Wind Exposure",
                "There is little cover on open ground. Shield yourself from the wind.",
                TipCategory::Safety,
            ),
        ],
        EnvironmentalZone::AlpineDesert => [
            ClimbingTip::new(
                "Alpine Desert Conditions",
                "Days scorch and nights freeze. Cover up against sun and cold alike.",
                TipCategory::Safety,
            ),
            ClimbingTip::new(
                "Altitude Management",
                "Thin air slows everything. Move steadily and watch for altitude symptoms.",
                TipCategory::Altitude,
            ),
        ],
        EnvironmentalZone::Summit => [
            ClimbingTip::new(
                "Death Zone",
                "Your body cannot recover at this height. Keep your time here short.",
                TipCategory::Safety,
            ),
            ClimbingTip::new(
                "Extreme Cold",
                "Frostbite sets in fast. Protect hands, feet and face at all times.",
                TipCategory::Equipment,
            ),
        ],
    }
}

/// Build the tip list for the current state, zone pair first.
#[must_use]
pub fn generate_tips(state: &ClimbingState) -> Vec<ClimbingTip> {
    let zone = EnvironmentalZone::for_altitude(state.current_altitude);
    let mut tips: Vec<ClimbingTip> = zone_tips(zone).into_iter().collect();

    if state.current_altitude > HIGH_ALTITUDE_TIP_METERS {
        tips.push(ClimbingTip::new(
            "High Altitude Climbing",
            "Climb high and sleep low. Take a rest day every three to four days.",
            TipCategory::Altitude,
        ));
    }

    if state.current_weather.is_storm_like() {
        tips.push(ClimbingTip::new(
            "Storm Safety",
            "Do not move during a storm. Stay sheltered until it passes.",
            TipCategory::Weather,
        ));
    }

    if state.equipment_status.any_worn() {
        tips.push(ClimbingTip::new(
            "Equipment Maintenance",
            "Inspect your gear often and fix wear before it becomes a failure.",
            TipCategory::Equipment,
        ));
    }

    if state.health_status.hydration_level < HYDRATION_TIP_THRESHOLD {
        tips.push(ClimbingTip::new(
            "Stay Hydrated",
            "Aim for three to four liters of water a day at altitude.",
            TipCategory::Health,
        ));
    }

    tips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherPattern;

    fn titles(tips: &[ClimbingTip]) -> Vec<&str> {
        tips.iter().map(|tip| tip.title.as_str()).collect()
    }

    #[test]
    fn fresh_state_gets_rainforest_pair_only() {
        let tips = generate_tips(&ClimbingState::default());
        assert_eq!(titles(&tips), vec!["Rainforest Navigation", "High Humidity"]);
    }

    #[test]
    fn every_condition_appends_in_order() {
        let mut state = ClimbingState::default();
        state.current_altitude = 5200.0;
        state.current_weather = WeatherPattern::Blizzard;
        state.equipment_status.set_durability("Crampons", 60);
        state.health_status.hydration_level = 0.5;

        let tips = generate_tips(&state);
        assert_eq!(
            titles(&tips),
            vec![
                "Death Zone",
                "Extreme Cold",
                "High Altitude Climbing",
                "Storm Safety",
                "Equipment Maintenance",
                "Stay Hydrated"
            ]
        );
    }

    #[test]
    fn altitude_tip_needs_strictly_more_than_threshold() {
        let mut state = ClimbingState::default();
        state.current_altitude = 3000.0;
        let tips = generate_tips(&state);
        assert_eq!(tips[0].title, "Alpine Desert Conditions");
        assert!(!titles(&tips).contains(&"High Altitude Climbing"));
    }
}
