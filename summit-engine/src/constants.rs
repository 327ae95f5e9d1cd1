//! Centralized balance and tuning constants for the climbing engine.
//!
//! These values define the deterministic math for the progress simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Persistence --------------------------------------------------------------
pub(crate) const DEFAULT_STORAGE_KEY: &str = "realistic_climbing_data";
pub(crate) const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

// Starting state -----------------------------------------------------------
pub(crate) const DEFAULT_HYDRATION: f64 = 0.8;
pub(crate) const DEFAULT_NUTRITION: f64 = 0.8;
pub(crate) const DEFAULT_SLEEP_QUALITY: f64 = 0.8;
pub(crate) const EQUIPMENT_DURABILITY_MAX: u8 = 100;
pub(crate) const STARTER_EQUIPMENT: [&str; 4] = ["Ice Axe", "Crampons", "Helmet", "Rope"];
pub(crate) const SICKNESS_SEVERITY_MAX: u8 = 3;

// Altitude modifier --------------------------------------------------------
pub(crate) const ALTITUDE_BAND_LOW: f64 = 0.3;
pub(crate) const ALTITUDE_BAND_MODERATE: f64 = 0.6;
pub(crate) const ALTITUDE_BAND_HIGH: f64 = 0.8;
pub(crate) const ALTITUDE_MOD_MODERATE: f64 = 0.9;
pub(crate) const ALTITUDE_MOD_HIGH: f64 = 0.8;
pub(crate) const ALTITUDE_MOD_DEATH_ZONE: f64 = 0.6;

// Health modifier ----------------------------------------------------------
pub(crate) const SICKNESS_PENALTY_PER_LEVEL: f64 = 0.3;
pub(crate) const FATIGUE_SEVERE_THRESHOLD: f64 = 0.7;
pub(crate) const FATIGUE_MODERATE_THRESHOLD: f64 = 0.5;
pub(crate) const FATIGUE_SEVERE_FACTOR: f64 = 0.8;
pub(crate) const FATIGUE_MODERATE_FACTOR: f64 = 0.9;
pub(crate) const DEHYDRATION_THRESHOLD: f64 = 0.6;
pub(crate) const DEHYDRATION_FACTOR: f64 = 0.9;

// Equipment ----------------------------------------------------------------
pub(crate) const EQUIPMENT_DAMAGED_THRESHOLD: u8 = 50;
pub(crate) const EQUIPMENT_WORN_THRESHOLD: u8 = 70;
pub(crate) const EQUIPMENT_DAMAGED_FACTOR: f64 = 0.95;

// Acclimatization ----------------------------------------------------------
pub(crate) const ACCLIMATIZATION_FRESH_DAYS: u32 = 2;
pub(crate) const ACCLIMATIZATION_PARTIAL_DAYS: u32 = 4;
pub(crate) const ACCLIMATIZATION_FRESH_FACTOR: f64 = 0.7;
pub(crate) const ACCLIMATIZATION_PARTIAL_FACTOR: f64 = 0.85;
pub(crate) const RAPID_ASCENT_GAIN: f64 = 300.0;
pub(crate) const MODERATE_ASCENT_GAIN: f64 = 100.0;
pub(crate) const RAPID_ASCENT_RISK: f64 = 0.3;
pub(crate) const MODERATE_ASCENT_RISK: f64 = 0.1;
pub(crate) const GRADUAL_ASCENT_RELIEF: f64 = 0.05;

// Health updates -----------------------------------------------------------
pub(crate) const HEAVY_EXERTION_GAIN: f64 = 200.0;
pub(crate) const LIGHT_EXERTION_GAIN: f64 = 100.0;
pub(crate) const HEAVY_EXERTION_FATIGUE: f64 = 0.2;
pub(crate) const LIGHT_EXERTION_FATIGUE: f64 = 0.1;
pub(crate) const EXPOSURE_HYDRATION_LOSS: f64 = 0.1;
pub(crate) const SICKNESS_ONSET_RISK: f64 = 0.7;
pub(crate) const SICKNESS_RELIEF_RISK: f64 = 0.3;

// Altitude gain ------------------------------------------------------------
pub(crate) const ELEVATION_TO_ALTITUDE: f64 = 0.1;
pub(crate) const DIFFICULTY_SCALE: f64 = 10.0;
pub(crate) const SUMMIT_APPROACH_PENALTY: f64 = 0.8;
pub(crate) const ALTITUDE_PENALTY_FLOOR: f64 = 0.1;

// Risk assessment ----------------------------------------------------------
pub(crate) const RISK_SICKNESS_THRESHOLD: f64 = 0.6;
pub(crate) const RISK_FATIGUE_THRESHOLD: f64 = 0.8;

// Tips ---------------------------------------------------------------------
pub(crate) const HIGH_ALTITUDE_TIP_METERS: f64 = 3000.0;
pub(crate) const HYDRATION_TIP_THRESHOLD: f64 = 0.7;

// Environmental zones ------------------------------------------------------
pub(crate) const ZONE_RAINFOREST_CEILING: f64 = 2000.0;
pub(crate) const ZONE_MOORLAND_CEILING: f64 = 3000.0;
pub(crate) const ZONE_ALPINE_DESERT_CEILING: f64 = 5000.0;
pub(crate) const ZONE_SUMMIT_CEILING: f64 = 8848.0;

// Recovery -----------------------------------------------------------------
pub(crate) const REST_FATIGUE_RELIEF: f64 = 0.3;
pub(crate) const REST_RISK_RELIEF: f64 = 0.1;
pub(crate) const HYDRATE_AMOUNT: f64 = 0.3;
pub(crate) const DESCENT_METERS: f64 = 500.0;
pub(crate) const DESCENT_RISK_RELIEF: f64 = 0.2;

// Conditions dashboard -----------------------------------------------------
pub(crate) const SEA_LEVEL_TEMP_C: f64 = 20.0;
pub(crate) const LAPSE_RATE_C_PER_M: f64 = 0.0065;
pub(crate) const STORM_TEMP_DROP_C: f64 = 10.0;
pub(crate) const BASE_WIND_KMH: f64 = 5.0;
pub(crate) const WIND_KMH_PER_M: f64 = 0.01;
pub(crate) const WINDY_WIND_BONUS_KMH: f64 = 20.0;
pub(crate) const STORM_WIND_BONUS_KMH: f64 = 40.0;
pub(crate) const BASE_VISIBILITY_KM: f64 = 10.0;
pub(crate) const VISIBILITY_FLOOR_KM: f64 = 0.1;
pub(crate) const CRITICAL_SICKNESS_SEVERITY: u8 = 2;
pub(crate) const MODERATE_RISK_MAX_FACTORS: usize = 2;
