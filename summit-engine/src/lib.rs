//! Summit Climbing Engine
//!
//! Platform-agnostic core of the realistic climbing simulation. Converts
//! real-world steps and elevation into progress on a virtual mountain,
//! modulated by weather, altitude, acclimatization, health and equipment.
//! This crate carries no UI or platform-specific dependencies.

pub mod altitude;
pub mod conditions;
pub mod config;
pub(crate) mod constants;
pub mod engine;
pub mod modifiers;
pub mod mountain;
pub mod numbers;
pub mod persistence;
pub mod risk;
pub mod rng;
pub mod state;
pub mod tips;
pub mod weather;
pub mod zones;

// Re-export commonly used types
pub use altitude::{approach_penalty, estimate_altitude_gain};
pub use conditions::{AlertTier, ConditionsReport, HealthCondition, RiskLevel};
pub use config::{ConfigError, EngineConfig, WeatherPolicy};
pub use engine::{ClimbingEngine, EngineError, RealisticProgress};
pub use modifiers::{
    ProgressModifiers, acclimatization_modifier, altitude_modifier, equipment_modifier,
    health_modifier,
};
pub use mountain::{Camp, CatalogError, Mountain, MountainCatalog, MountainDifficulty};
pub use persistence::{
    ClimbingSnapshot, FileStorage, MemoryStorage, PersistError, load_snapshot, save_snapshot,
};
pub use risk::{RiskFactor, RiskFactors, RiskKind, RiskSeverity, assess_risks};
pub use rng::{CountingRng, WeatherRng, derive_stream_seed};
pub use state::{
    AcclimatizationStatus, ClimbingState, EquipmentItem, EquipmentStatus, HealthStatus,
};
pub use tips::{ClimbingTip, TipCategory, generate_tips};
pub use weather::{SafetyRisk, WEATHER_ORDER, WeatherConfig, WeatherPattern, select_weather};
pub use zones::{EnvironmentalZone, ZoneTracker, ZoneTransition};

/// Trait for abstracting where snapshots are kept
/// Platform-specific implementations should provide this
pub trait ClimbingStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the blob stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store a blob under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    fn write(&self, key: &str, blob: &str) -> Result<(), Self::Error>;

    /// Delete the blob stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the blob exists but cannot be removed.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}
