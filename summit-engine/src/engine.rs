//! The climbing session: per-tick progress, recovery actions and persistence.
use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::ClimbingStorage;
use crate::altitude::estimate_altitude_gain;
use crate::conditions::ConditionsReport;
use crate::config::{ConfigError, EngineConfig};
use crate::modifiers::ProgressModifiers;
use crate::mountain::{Camp, Mountain};
use crate::numbers::{trunc_f64_to_u32, u32_to_f64};
use crate::persistence::{PersistError, load_snapshot, save_snapshot};
use crate::risk::{RiskFactor, RiskFactors, assess_risks};
use crate::rng::WeatherRng;
use crate::state::{AcclimatizationStatus, ClimbingState, EquipmentStatus, HealthStatus};
use crate::tips::{ClimbingTip, generate_tips};
use crate::weather::{WeatherPattern, select_weather};
use crate::zones::{EnvironmentalZone, ZoneTracker, ZoneTransition};

/// Result of one activity tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealisticProgress {
    pub steps: u32,
    pub elevation: f64,
    pub altitude_gain: f64,
    pub weather: WeatherPattern,
    pub weather_impact: f64,
    pub health_impact: f64,
    pub equipment_impact: f64,
    pub acclimatization_impact: f64,
    /// Reported every tick; only part of the product when the config opts in.
    pub altitude_impact: f64,
    pub current_altitude: f64,
    pub risk_factors: RiskFactors,
    pub zone_transition: Option<ZoneTransition>,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid tick input: {field} = {value}")]
    InvalidInput { field: &'static str, value: f64 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One climber's session. Owns the state and writes a snapshot after every change.
pub struct ClimbingEngine<S>
where
    S: ClimbingStorage,
{
    storage: S,
    config: EngineConfig,
    state: ClimbingState,
    rng: WeatherRng,
    zones: ZoneTracker,
    ticks: u64,
}

impl<S> ClimbingEngine<S>
where
    S: ClimbingStorage,
{
    /// Open a session with the default configuration.
    pub fn new(storage: S) -> Self {
        Self::open(storage, EngineConfig::default())
    }

    /// Open a session with a caller-supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn with_config(storage: S, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::open(storage, config))
    }

    fn open(storage: S, config: EngineConfig) -> Self {
        let state = match load_snapshot(&storage, &config.storage_key) {
            Ok(Some(snapshot)) => snapshot.into_state(),
            Ok(None) => ClimbingState::default(),
            Err(err) => {
                warn!(
                    "discarding saved climbing state under {}: {err}",
                    config.storage_key
                );
                ClimbingState::default()
            }
        };
        let seed = config.seed.unwrap_or_else(rand::random::<u64>);
        let zones = ZoneTracker::starting_at(state.current_altitude, 0);

        let mut engine = Self {
            storage,
            config,
            state,
            rng: WeatherRng::weather_stream(seed),
            zones,
            ticks: 0,
        };
        engine.generate_daily_weather();
        engine
    }

    /// Convert one batch of real-world activity into mountain progress.
    ///
    /// All modifiers are evaluated against the state as it was before the tick.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] without touching state when the
    /// elevation, mountain height or difficulty multiplier is unusable.
    pub fn calculate_realistic_progress(
        &mut self,
        steps: u32,
        elevation: f64,
        mountain: &Mountain,
        current_camp: Option<&Camp>,
    ) -> Result<RealisticProgress, EngineError> {
        validate_tick(elevation, mountain)?;

        if self.config.weather_policy.rolls_before_tick(self.ticks) {
            self.generate_daily_weather();
        }

        let modifiers = ProgressModifiers::evaluate(&self.state, mountain.height);
        let altitude_gain = estimate_altitude_gain(
            elevation,
            mountain.difficulty_multiplier,
            self.state.current_altitude,
            mountain.height,
        );
        let factor = modifiers.combined(self.config.apply_altitude_modifier);
        let final_steps = trunc_f64_to_u32(u32_to_f64(steps) * factor);
        let final_elevation = elevation * factor;

        self.zones.before_change(self.state.current_altitude, self.ticks);
        self.state.current_altitude =
            (self.state.current_altitude + altitude_gain).min(mountain.height);

        let weather = self.state.current_weather;
        let altitude = self.state.current_altitude;
        self.state
            .acclimatization_status
            .record_ascent(altitude_gain, altitude);
        let sickness_risk = self.state.acclimatization_status.altitude_sickness_risk;
        self.state
            .health_status
            .record_exertion(altitude_gain, weather, sickness_risk);

        self.refresh_derived();
        let zone_transition = self.observe_zone_change();
        self.ticks = self.ticks.saturating_add(1);
        self.persist();

        debug!(
            "tick {} on {} at {}: steps {steps}->{final_steps}, gain {altitude_gain:.2} m, altitude {altitude:.1} m, weather {weather}, factor {factor:.3}",
            self.ticks,
            mountain.id,
            current_camp.map_or("open ground", |camp| camp.name.as_str()),
        );

        Ok(RealisticProgress {
            steps: final_steps,
            elevation: final_elevation,
            altitude_gain,
            weather,
            weather_impact: modifiers.weather,
            health_impact: modifiers.health,
            equipment_impact: modifiers.equipment,
            acclimatization_impact: modifiers.acclimatization,
            altitude_impact: modifiers.altitude,
            current_altitude: altitude,
            risk_factors: self.state.risk_factors.clone(),
            zone_transition,
        })
    }

    /// Take a rest day at the current altitude.
    pub fn rest(&mut self) {
        self.state.rest();
        self.after_recovery("rest");
    }

    pub fn hydrate(&mut self) {
        self.state.hydrate();
        self.after_recovery("hydrate");
    }

    /// Descend 500 m to ease altitude sickness.
    pub fn descend(&mut self) {
        self.zones.before_change(self.state.current_altitude, self.ticks);
        self.state.descend();
        self.observe_zone_change();
        self.after_recovery("descend");
    }

    /// Roll the day's weather from the configured distribution.
    pub fn generate_daily_weather(&mut self) -> WeatherPattern {
        let pattern = select_weather(&self.config.weather, &mut self.rng);
        info!("weather rolled: {pattern} ({})", pattern.description());
        self.apply_weather(pattern);
        pattern
    }

    /// Override the current weather, e.g. from a live forecast.
    pub fn set_weather(&mut self, pattern: WeatherPattern) {
        info!("weather set: {pattern}");
        self.apply_weather(pattern);
    }

    /// Zone change caused by the most recent altitude change, if any.
    #[must_use]
    pub fn check_for_zone_transition(&self) -> Option<ZoneTransition> {
        self.zones.check(self.state.current_altitude)
    }

    #[must_use]
    pub const fn last_zone_transition(&self) -> Option<&ZoneTransition> {
        self.zones.last_transition()
    }

    #[must_use]
    pub fn current_zone(&self) -> EnvironmentalZone {
        EnvironmentalZone::for_altitude(self.state.current_altitude)
    }

    #[must_use]
    pub fn conditions(&self) -> ConditionsReport {
        ConditionsReport::from_state(&self.state)
    }

    /// Write the current state to storage.
    ///
    /// # Errors
    ///
    /// Returns an error when encoding or the storage write fails.
    pub fn save(&self) -> Result<(), PersistError> {
        save_snapshot(&self.storage, &self.config.storage_key, &self.state)
    }

    /// Start the climber over from defaults and drop the stored snapshot.
    ///
    /// The current weather survives the reset.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage backend cannot remove the snapshot;
    /// in-memory state is reset regardless.
    pub fn reset(&mut self) -> Result<(), PersistError> {
        let weather = self.state.current_weather;
        self.state = ClimbingState::default();
        self.state.current_weather = weather;
        self.zones = ZoneTracker::starting_at(0.0, self.ticks);
        self.refresh_derived();
        info!("climbing state reset under {}", self.config.storage_key);
        self.storage
            .remove(&self.config.storage_key)
            .map_err(PersistError::storage)
    }

    /// Mutate state directly, then re-derive risks and tips and persist.
    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut ClimbingState) -> R) -> R {
        self.zones.before_change(self.state.current_altitude, self.ticks);
        let result = f(&mut self.state);
        self.state.sanitize();
        self.observe_zone_change();
        self.refresh_derived();
        self.persist();
        result
    }

    #[must_use]
    pub const fn state(&self) -> &ClimbingState {
        &self.state
    }

    #[must_use]
    pub const fn current_altitude(&self) -> f64 {
        self.state.current_altitude
    }

    #[must_use]
    pub const fn current_weather(&self) -> WeatherPattern {
        self.state.current_weather
    }

    #[must_use]
    pub const fn acclimatization_status(&self) -> &AcclimatizationStatus {
        &self.state.acclimatization_status
    }

    #[must_use]
    pub const fn health_status(&self) -> &HealthStatus {
        &self.state.health_status
    }

    #[must_use]
    pub const fn equipment_status(&self) -> &EquipmentStatus {
        &self.state.equipment_status
    }

    #[must_use]
    pub fn risk_factors(&self) -> &[RiskFactor] {
        &self.state.risk_factors
    }

    #[must_use]
    pub fn climbing_tips(&self) -> &[ClimbingTip] {
        &self.state.climbing_tips
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Number of activity ticks processed this session.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Raw RNG draws consumed by weather rolls.
    #[must_use]
    pub const fn weather_draws(&self) -> u64 {
        self.rng.draws()
    }

    fn apply_weather(&mut self, pattern: WeatherPattern) {
        self.state.current_weather = pattern;
        self.refresh_derived();
    }

    fn refresh_derived(&mut self) {
        self.state.risk_factors = assess_risks(&self.state);
        self.state.climbing_tips = generate_tips(&self.state);
    }

    fn observe_zone_change(&mut self) -> Option<ZoneTransition> {
        let transition = self.zones.after_change(self.state.current_altitude)?;
        info!(
            "zone transition {} -> {} at {:.0} m: {}",
            transition.from,
            transition.to,
            transition.altitude,
            transition.message()
        );
        Some(transition)
    }

    fn after_recovery(&mut self, action: &str) {
        self.refresh_derived();
        self.persist();
        let health = &self.state.health_status;
        debug!(
            "{action}: altitude {:.1} m, fatigue {:.2}, hydration {:.2}, sickness {}, risk {:.2}",
            self.state.current_altitude,
            health.fatigue_level,
            health.hydration_level,
            health.altitude_sickness_severity,
            self.state.acclimatization_status.altitude_sickness_risk,
        );
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            warn!(
                "failed to save climbing state under {}: {err}",
                self.config.storage_key
            );
        }
    }
}

fn validate_tick(elevation: f64, mountain: &Mountain) -> Result<(), EngineError> {
    if !elevation.is_finite() || elevation < 0.0 {
        return Err(EngineError::InvalidInput {
            field: "elevation",
            value: elevation,
        });
    }
    if !mountain.height.is_finite() || mountain.height <= 0.0 {
        return Err(EngineError::InvalidInput {
            field: "mountain.height",
            value: mountain.height,
        });
    }
    if !mountain.difficulty_multiplier.is_finite() || mountain.difficulty_multiplier < 0.0 {
        return Err(EngineError::InvalidInput {
            field: "mountain.difficulty_multiplier",
            value: mountain.difficulty_multiplier,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mountain::MountainDifficulty;
    use crate::persistence::MemoryStorage;
    use crate::risk::RiskKind;

    fn test_mountain(height: f64, multiplier: f64) -> Mountain {
        Mountain {
            id: "test-peak".to_string(),
            name: "Test Peak".to_string(),
            height,
            location: "Nowhere".to_string(),
            difficulty: MountainDifficulty::Intermediate,
            difficulty_multiplier: multiplier,
            estimated_days: 5,
            weather_patterns: vec![WeatherPattern::Clear],
            camps: vec![Camp {
                name: "Top".to_string(),
                altitude: height,
                steps_required: 0,
                elevation_required: 0.0,
                is_base_camp: false,
                is_summit: true,
            }],
        }
    }

    fn clear_engine() -> ClimbingEngine<MemoryStorage> {
        let config = EngineConfig::default().with_seed(7);
        let mut engine = ClimbingEngine::with_config(MemoryStorage::new(), config).unwrap();
        engine.set_weather(WeatherPattern::Clear);
        engine
    }

    #[test]
    fn invalid_input_leaves_state_untouched() {
        let mut engine = clear_engine();
        let before = engine.state().clone();
        let mountain = test_mountain(5895.0, 5.0);
        let err = engine
            .calculate_realistic_progress(100, -1.0, &mountain, None)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidInput {
                field: "elevation",
                ..
            }
        ));
        assert!(
            engine
                .calculate_realistic_progress(100, f64::NAN, &mountain, None)
                .is_err()
        );
        assert!(
            engine
                .calculate_realistic_progress(100, 10.0, &test_mountain(0.0, 5.0), None)
                .is_err()
        );
        assert!(
            engine
                .calculate_realistic_progress(100, 10.0, &test_mountain(5895.0, -2.0), None)
                .is_err()
        );
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.ticks(), 0);
    }

    #[test]
    fn altitude_caps_at_mountain_height() {
        let mut engine = clear_engine();
        let mountain = test_mountain(100.0, 10.0);
        for _ in 0..50 {
            engine
                .calculate_realistic_progress(1000, 5000.0, &mountain, None)
                .unwrap();
        }
        assert!((engine.current_altitude() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn opt_in_applies_altitude_modifier() {
        let config = EngineConfig::default()
            .with_seed(1)
            .with_altitude_modifier(true);
        let mut engine = ClimbingEngine::with_config(MemoryStorage::new(), config).unwrap();
        engine.set_weather(WeatherPattern::Clear);
        engine.with_state_mut(|state| {
            state.current_altitude = 4000.0;
            state.acclimatization_status.days_at_current_altitude = 10;
            state.health_status.hydration_level = 1.0;
        });
        let progress = engine
            .calculate_realistic_progress(1000, 100.0, &test_mountain(5000.0, 5.0), None)
            .unwrap();
        assert!((progress.altitude_impact - 0.6).abs() < 1e-9);
        assert_eq!(progress.steps, 600);
    }

    #[test]
    fn recovery_refreshes_risks_and_tips() {
        let mut engine = clear_engine();
        engine.with_state_mut(|state| state.health_status.fatigue_level = 0.95);
        assert_eq!(engine.risk_factors().len(), 1);
        assert_eq!(engine.risk_factors()[0].kind, RiskKind::Fatigue);

        engine.rest();
        assert!(engine.risk_factors().is_empty());

        engine.with_state_mut(|state| state.health_status.hydration_level = 0.5);
        assert!(engine.climbing_tips().iter().any(|tip| tip.title == "Stay Hydrated"));
        engine.hydrate();
        assert!(!engine.climbing_tips().iter().any(|tip| tip.title == "Stay Hydrated"));
    }

    #[test]
    fn reset_drops_snapshot_but_keeps_weather() {
        let mut engine = clear_engine();
        engine.set_weather(WeatherPattern::Windy);
        engine.with_state_mut(|state| state.current_altitude = 2500.0);
        assert!(engine.storage().contains("realistic_climbing_data"));

        engine.reset().unwrap();
        assert!(!engine.storage().contains("realistic_climbing_data"));
        assert!(engine.current_altitude().abs() < f64::EPSILON);
        assert_eq!(engine.current_weather(), WeatherPattern::Windy);
        assert!(engine.check_for_zone_transition().is_none());
    }

    #[test]
    fn state_edit_across_a_boundary_is_a_transition() {
        let mut engine = clear_engine();
        engine.with_state_mut(|state| state.current_altitude = 3100.0);
        engine.rest();
        engine.hydrate();

        let transition = engine.check_for_zone_transition().unwrap();
        assert_eq!(transition.from, EnvironmentalZone::Rainforest);
        assert_eq!(transition.to, EnvironmentalZone::AlpineDesert);
        assert_eq!(transition.tick, 0);
        assert_eq!(engine.last_zone_transition(), Some(&transition));

        engine.with_state_mut(|state| state.health_status.fatigue_level = 0.2);
        assert!(engine.check_for_zone_transition().is_none());
        assert_eq!(engine.last_zone_transition(), Some(&transition));
    }

    #[test]
    fn descent_across_a_boundary_is_a_transition() {
        let mut engine = clear_engine();
        engine.with_state_mut(|state| state.current_altitude = 2200.0);
        engine.descend();
        let transition = engine.check_for_zone_transition().unwrap();
        assert_eq!(transition.from, EnvironmentalZone::Moorland);
        assert_eq!(transition.to, EnvironmentalZone::Rainforest);
        assert!(!transition.is_ascent());
        assert_eq!(engine.last_zone_transition(), Some(&transition));
    }

    #[test]
    fn weather_policy_rerolls_on_schedule() {
        let config = EngineConfig::default()
            .with_seed(99)
            .with_weather_policy(crate::config::WeatherPolicy::EveryTicks { ticks: 2 });
        let mut engine = ClimbingEngine::with_config(MemoryStorage::new(), config).unwrap();
        let mountain = test_mountain(5895.0, 5.0);
        let draws_at_start = engine.weather_draws();
        for _ in 0..6 {
            engine
                .calculate_realistic_progress(10, 1.0, &mountain, None)
                .unwrap();
        }
        // Rolls before ticks 2 and 4, one draw each.
        assert_eq!(engine.weather_draws(), draws_at_start + 2);
    }

    #[test]
    fn every_mutation_persists() {
        let storage = MemoryStorage::new();
        let config = EngineConfig::default().with_seed(3);
        let mut engine = ClimbingEngine::with_config(storage.clone(), config).unwrap();
        assert!(!storage.contains("realistic_climbing_data"));
        engine.hydrate();
        assert!(storage.contains("realistic_climbing_data"));
    }
}
