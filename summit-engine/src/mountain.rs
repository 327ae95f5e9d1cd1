//! Predefined mountains and camp progression.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::weather::WeatherPattern;

const MOUNTAIN_DATA: &str = include_str!("../data/mountains.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MountainDifficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl MountainDifficulty {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

impl fmt::Display for MountainDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camp {
    pub name: String,
    pub altitude: f64,
    pub steps_required: u64,
    pub elevation_required: f64,
    #[serde(default)]
    pub is_base_camp: bool,
    #[serde(default)]
    pub is_summit: bool,
}

impl Camp {
    /// Whether cumulative activity satisfies both of this camp's requirements.
    #[must_use]
    pub fn is_reached(&self, total_steps: u64, total_elevation: f64) -> bool {
        total_steps >= self.steps_required && total_elevation >= self.elevation_required
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mountain {
    pub id: String,
    pub name: String,
    pub height: f64,
    pub location: String,
    pub difficulty: MountainDifficulty,
    pub difficulty_multiplier: f64,
    pub estimated_days: u32,
    #[serde(default)]
    pub weather_patterns: Vec<WeatherPattern>,
    pub camps: Vec<Camp>,
}

impl Mountain {
    #[must_use]
    pub fn summit(&self) -> Option<&Camp> {
        self.camps.iter().find(|camp| camp.is_summit)
    }

    #[must_use]
    pub fn base_camp(&self) -> Option<&Camp> {
        self.camps.iter().find(|camp| camp.is_base_camp)
    }

    /// Furthest camp whose step and elevation requirements are both met.
    #[must_use]
    pub fn camp_reached(&self, total_steps: u64, total_elevation: f64) -> Option<&Camp> {
        self.camps
            .iter()
            .rev()
            .find(|camp| camp.is_reached(total_steps, total_elevation))
    }

    /// Camp following `current`, or the first camp when none is given.
    #[must_use]
    pub fn next_camp(&self, current: Option<&Camp>) -> Option<&Camp> {
        let Some(current) = current else {
            return self.camps.first();
        };
        let index = self.camps.iter().position(|camp| camp.name == current.name)?;
        self.camps.get(index + 1)
    }

    /// Validate a mountain definition.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive height, negative multiplier, missing or
    /// misplaced summit, or camps out of step order.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(CatalogError::InvalidHeight {
                mountain: self.id.clone(),
                height: self.height,
            });
        }
        if !self.difficulty_multiplier.is_finite() || self.difficulty_multiplier < 0.0 {
            return Err(CatalogError::InvalidMultiplier {
                mountain: self.id.clone(),
                multiplier: self.difficulty_multiplier,
            });
        }
        let Some(last) = self.camps.last() else {
            return Err(CatalogError::NoCamps {
                mountain: self.id.clone(),
            });
        };
        let summits = self.camps.iter().filter(|camp| camp.is_summit).count();
        if summits != 1 || !last.is_summit {
            return Err(CatalogError::SummitPlacement {
                mountain: self.id.clone(),
            });
        }
        if let Some(pair) = self
            .camps
            .windows(2)
            .find(|pair| pair[1].steps_required < pair[0].steps_required)
        {
            return Err(CatalogError::CampOrder {
                mountain: self.id.clone(),
                camp: pair[1].name.clone(),
            });
        }
        Ok(())
    }
}

/// All mountains known to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountainCatalog {
    pub mountains: Vec<Mountain>,
}

impl MountainCatalog {
    /// Parse and validate a catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, any mountain fails validation,
    /// or two mountains share an id.
    pub fn from_json(json_str: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json_str)?;
        for (index, mountain) in catalog.mountains.iter().enumerate() {
            mountain.validate()?;
            if catalog.mountains[..index]
                .iter()
                .any(|other| other.id == mountain.id)
            {
                return Err(CatalogError::DuplicateId {
                    mountain: mountain.id.clone(),
                });
            }
        }
        Ok(catalog)
    }

    /// Load the embedded catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded table fails validation.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(MOUNTAIN_DATA)
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Mountain> {
        self.mountains.iter().find(|mountain| mountain.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.mountains.iter().map(|mountain| mountain.id.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid mountain catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("mountain {mountain} has invalid height {height}")]
    InvalidHeight { mountain: String, height: f64 },
    #[error("mountain {mountain} has invalid difficulty multiplier {multiplier}")]
    InvalidMultiplier { mountain: String, multiplier: f64 },
    #[error("mountain {mountain} has no camps")]
    NoCamps { mountain: String },
    #[error("mountain {mountain} must end with exactly one summit camp")]
    SummitPlacement { mountain: String },
    #[error("camp {camp} on {mountain} requires fewer steps than the camp before it")]
    CampOrder { mountain: String, camp: String },
    #[error("mountain id {mountain} appears more than once")]
    DuplicateId { mountain: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kilimanjaro() -> Mountain {
        MountainCatalog::load_from_static()
            .unwrap()
            .find("kilimanjaro")
            .cloned()
            .unwrap()
    }

    #[test]
    fn embedded_catalog_loads() {
        let catalog = MountainCatalog::load_from_static().unwrap();
        assert_eq!(catalog.mountains.len(), 6);
        let everest = catalog.find("everest").unwrap();
        assert!((everest.height - 8848.0).abs() < f64::EPSILON);
        assert_eq!(everest.difficulty, MountainDifficulty::Expert);
        assert!(catalog.find("k2").is_none());
    }

    #[test]
    fn camp_progression_needs_both_requirements() {
        let mountain = kilimanjaro();
        assert_eq!(mountain.camp_reached(0, 0.0).unwrap().name, "Base Camp");
        assert_eq!(
            mountain.camp_reached(80_000, 1_300.0).unwrap().name,
            "Camp 2 - Horombo"
        );
        // Plenty of steps but not enough climbing.
        assert_eq!(
            mountain.camp_reached(300_000, 600.0).unwrap().name,
            "Camp 1 - Mandara"
        );
        assert!(mountain.camp_reached(300_000, 5_000.0).unwrap().is_summit);
    }

    #[test]
    fn next_camp_walks_forward() {
        let mountain = kilimanjaro();
        let base = mountain.base_camp().unwrap();
        assert_eq!(mountain.next_camp(None).unwrap().name, "Base Camp");
        assert_eq!(mountain.next_camp(Some(base)).unwrap().name, "Camp 1 - Mandara");
        assert!(mountain.next_camp(mountain.summit()).is_none());
    }

    #[test]
    fn validation_catches_bad_tables() {
        let mut mountain = kilimanjaro();
        mountain.camps.swap(1, 2);
        assert!(matches!(
            mountain.validate(),
            Err(CatalogError::CampOrder { .. })
        ));

        let mut mountain = kilimanjaro();
        mountain.camps.pop();
        assert!(matches!(
            mountain.validate(),
            Err(CatalogError::SummitPlacement { .. })
        ));

        let mut mountain = kilimanjaro();
        mountain.height = 0.0;
        assert!(matches!(
            mountain.validate(),
            Err(CatalogError::InvalidHeight { .. })
        ));
    }
}
