//! Environmental zones along the mountain and transitions between them.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    ZONE_ALPINE_DESERT_CEILING, ZONE_MOORLAND_CEILING, ZONE_RAINFOREST_CEILING, ZONE_SUMMIT_CEILING,
};
use crate::weather::SafetyRisk;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentalZone {
    Rainforest,
    Moorland,
    AlpineDesert,
    Summit,
}

impl EnvironmentalZone {
    pub const ALL: [Self; 4] = [
        Self::Rainforest,
        Self::Moorland,
        Self::AlpineDesert,
        Self::Summit,
    ];

    /// Classify an altitude in meters. Anything at or above 5000 m is the summit zone.
    #[must_use]
    pub fn for_altitude(altitude: f64) -> Self {
        if altitude < ZONE_RAINFOREST_CEILING {
            Self::Rainforest
        } else if altitude < ZONE_MOORLAND_CEILING {
            Self::Moorland
        } else if altitude < ZONE_ALPINE_DESERT_CEILING {
            Self::AlpineDesert
        } else {
            Self::Summit
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Rainforest => "Rainforest",
            Self::Moorland => "Moorland",
            Self::AlpineDesert => "Alpine Desert",
            Self::Summit => "Summit",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Rainforest => "Dense green forest, humid air and mild temperatures",
            Self::Moorland => "Open grassland with cooler air and changeable weather",
            Self::AlpineDesert => "Barren rock, harsh temperature swings and thin air",
            Self::Summit => "The death zone: brutal cold and the final push",
        }
    }

    /// Nominal altitude band in meters as (floor, ceiling).
    #[must_use]
    pub const fn altitude_range(self) -> (f64, f64) {
        match self {
            Self::Rainforest => (0.0, ZONE_RAINFOREST_CEILING),
            Self::Moorland => (ZONE_RAINFOREST_CEILING, ZONE_MOORLAND_CEILING),
            Self::AlpineDesert => (ZONE_MOORLAND_CEILING, ZONE_ALPINE_DESERT_CEILING),
            Self::Summit => (ZONE_ALPINE_DESERT_CEILING, ZONE_SUMMIT_CEILING),
        }
    }

    #[must_use]
    pub const fn challenges(self) -> &'static [&'static str] {
        match self {
            Self::Rainforest => &["High humidity", "Dense vegetation", "Wildlife encounters"],
            Self::Moorland => &["Temperature changes", "Wind exposure", "Limited shelter"],
            Self::AlpineDesert => &["Extreme temperatures", "High altitude", "Rocky terrain"],
            Self::Summit => &["Death zone", "Extreme cold", "Oxygen deprivation"],
        }
    }

    #[must_use]
    pub const fn short_tips(self) -> &'static [&'static str] {
        match self {
            Self::Rainforest => &["Stay hydrated", "Watch for wildlife", "Use insect repellent"],
            Self::Moorland => &["Layer clothing", "Watch weather changes", "Find shelter"],
            Self::AlpineDesert => &["Protect from sun", "Manage altitude", "Use proper gear"],
            Self::Summit => &["Use oxygen", "Limit time", "Descend quickly"],
        }
    }
}

impl fmt::Display for EnvironmentalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A change of zone observed after an altitude change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneTransition {
    pub from: EnvironmentalZone,
    pub to: EnvironmentalZone,
    pub altitude: f64,
    /// Ticks completed before the altitude change that caused the crossing.
    pub tick: u64,
}

impl ZoneTransition {
    #[must_use]
    pub const fn is_ascent(&self) -> bool {
        (self.to as u8) > (self.from as u8)
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        match (self.from, self.to) {
            (EnvironmentalZone::Rainforest, EnvironmentalZone::Moorland) => {
                "The rainforest falls away behind you. You have entered the moorland."
            }
            (EnvironmentalZone::Moorland, EnvironmentalZone::AlpineDesert) => {
                "You are crossing into the alpine desert. Conditions turn harsh from here."
            }
            (EnvironmentalZone::AlpineDesert, EnvironmentalZone::Summit) => {
                "You have entered the death zone. Make every step count."
            }
            _ => "You have moved into a new environmental zone.",
        }
    }

    #[must_use]
    pub const fn warning_level(&self) -> SafetyRisk {
        match (self.from, self.to) {
            (EnvironmentalZone::AlpineDesert, EnvironmentalZone::Summit) => SafetyRisk::Extreme,
            (EnvironmentalZone::Moorland, EnvironmentalZone::AlpineDesert) => SafetyRisk::High,
            (EnvironmentalZone::Rainforest, EnvironmentalZone::Moorland) => SafetyRisk::Moderate,
            _ => SafetyRisk::Low,
        }
    }
}

/// Remembers the zone before the latest altitude change.
#[derive(Debug, Clone, Default)]
pub struct ZoneTracker {
    previous: Option<EnvironmentalZone>,
    changed_at: u64,
    last_transition: Option<ZoneTransition>,
}

impl ZoneTracker {
    /// Tracker seeded with the zone the climber starts in.
    #[must_use]
    pub fn starting_at(altitude: f64, tick: u64) -> Self {
        let mut tracker = Self::default();
        tracker.before_change(altitude, tick);
        tracker
    }

    /// Record the zone about to be left and the tick count at the change.
    pub fn before_change(&mut self, altitude: f64, tick: u64) {
        self.previous = Some(EnvironmentalZone::for_altitude(altitude));
        self.changed_at = tick;
    }

    /// Compare the new altitude against the recorded zone; a crossing is kept as the latest transition.
    pub fn after_change(&mut self, altitude: f64) -> Option<ZoneTransition> {
        let transition = self.check(altitude)?;
        self.last_transition = Some(transition.clone());
        Some(transition)
    }

    /// Transition between the recorded zone and the zone at `altitude`, if they differ.
    #[must_use]
    pub fn check(&self, altitude: f64) -> Option<ZoneTransition> {
        let from = self.previous?;
        let to = EnvironmentalZone::for_altitude(altitude);
        (from != to).then_some(ZoneTransition {
            from,
            to,
            altitude,
            tick: self.changed_at,
        })
    }

    #[must_use]
    pub const fn last_transition(&self) -> Option<&ZoneTransition> {
        self.last_transition.as_ref()
    }
}
