use anyhow::{Context, Result, anyhow};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use summit_engine::{
    ClimbingEngine, ClimbingState, EngineConfig, MemoryStorage, Mountain, MountainCatalog,
    RealisticProgress, WeatherConfig, WeatherPolicy, ZoneTransition,
};

use crate::logic::policy::{ClimbAction, ClimbStrategy};

pub const DEFAULT_MAX_TICKS: u32 = 120;

/// Everything a scenario needs to drive one expedition.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub mountain_id: String,
    pub strategy: ClimbStrategy,
    pub max_ticks: Option<u32>,
    pub weather_policy: WeatherPolicy,
    pub weather: Option<WeatherConfig>,
    pub apply_altitude_modifier: bool,
    pub setup: Option<fn(&mut ClimbingState)>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(mountain_id: impl Into<String>, strategy: ClimbStrategy) -> Self {
        Self {
            mountain_id: mountain_id.into(),
            strategy,
            max_ticks: None,
            weather_policy: WeatherPolicy::EveryTicks { ticks: 4 },
            weather: None,
            apply_altitude_modifier: false,
            setup: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_ticks(mut self, max_ticks: u32) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    #[must_use]
    pub const fn with_weather_policy(mut self, policy: WeatherPolicy) -> Self {
        self.weather_policy = policy;
        self
    }

    #[must_use]
    pub fn with_weather(mut self, weather: WeatherConfig) -> Self {
        self.weather = Some(weather);
        self
    }

    #[must_use]
    pub const fn with_altitude_modifier(mut self) -> Self {
        self.apply_altitude_modifier = true;
        self
    }

    #[must_use]
    pub fn with_setup(mut self, setup: fn(&mut ClimbingState)) -> Self {
        self.setup = Some(setup);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }

    fn engine_config(&self, seed: u64) -> EngineConfig {
        let mut config = EngineConfig::default()
            .with_seed(seed)
            .with_weather_policy(self.weather_policy)
            .with_altitude_modifier(self.apply_altitude_modifier);
        if let Some(weather) = &self.weather {
            config = config.with_weather(weather.clone());
        }
        config
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// One tick of the expedition log.
#[derive(Debug, Clone)]
pub struct TickRecord {
    pub tick: u64,
    pub action: ClimbAction,
    pub altitude: f64,
    pub progress: Option<RealisticProgress>,
}

/// Complete record of a simulated expedition.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub mountain_id: String,
    pub mountain_height: f64,
    pub strategy: ClimbStrategy,
    pub ticks: Vec<TickRecord>,
    pub final_state: ClimbingState,
    pub camp_reached: Option<String>,
    pub summit_reached: bool,
    pub total_steps: u64,
    pub total_elevation: f64,
    pub zone_transitions: Vec<ZoneTransition>,
    pub weather_days: BTreeMap<String, u32>,
    pub violations: Vec<String>,
}

impl SimulationSummary {
    #[must_use]
    pub fn count_actions(&self, label: &str) -> usize {
        self.ticks
            .iter()
            .filter(|record| record.action.label() == label)
            .count()
    }

    pub fn progress(&self) -> impl Iterator<Item = &RealisticProgress> {
        self.ticks.iter().filter_map(|record| record.progress.as_ref())
    }
}

/// Headless runner that drives the engine and checks invariants every tick.
pub struct ExpeditionSimulator {
    catalog: MountainCatalog,
    verbose: bool,
}

impl ExpeditionSimulator {
    pub fn new(verbose: bool) -> Result<Self> {
        let catalog =
            MountainCatalog::load_from_static().context("loading embedded mountain catalog")?;
        Ok(Self { catalog, verbose })
    }

    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let mountain = self
            .catalog
            .find(&plan.mountain_id)
            .ok_or_else(|| anyhow!("unknown mountain '{}'", plan.mountain_id))?;
        let mut engine =
            ClimbingEngine::with_config(MemoryStorage::new(), plan.engine_config(seed))?;
        if let Some(setup) = plan.setup {
            engine.with_state_mut(setup);
        }

        let mut policy = plan.strategy.create_policy(seed);
        let max_ticks = plan.max_ticks.unwrap_or(DEFAULT_MAX_TICKS);
        let mut checker = InvariantChecker::new(mountain, plan.apply_altitude_modifier);
        let mut ticks = Vec::new();
        let mut total_steps = 0_u64;
        let mut total_elevation = 0.0_f64;
        let mut weather_days: BTreeMap<String, u32> = BTreeMap::new();
        let mut zone_transitions = Vec::new();

        for tick in 0..u64::from(max_ticks) {
            let action = policy.decide(engine.state(), tick);
            let progress = match action {
                ClimbAction::Climb { steps, elevation } => {
                    let camp = mountain.camp_reached(total_steps, total_elevation);
                    let progress = engine
                        .calculate_realistic_progress(steps, elevation, mountain, camp)
                        .with_context(|| format!("tick {tick} rejected"))?;
                    checker.check_progress(tick, steps, elevation, &progress);
                    total_steps = total_steps.saturating_add(u64::from(progress.steps));
                    total_elevation += progress.elevation;
                    *weather_days.entry(progress.weather.to_string()).or_default() += 1;
                    if let Some(transition) = &progress.zone_transition {
                        zone_transitions.push(transition.clone());
                    }
                    Some(progress)
                }
                ClimbAction::Rest => {
                    engine.rest();
                    None
                }
                ClimbAction::Hydrate => {
                    engine.hydrate();
                    None
                }
                ClimbAction::Descend => {
                    engine.descend();
                    if let Some(transition) = engine.check_for_zone_transition() {
                        zone_transitions.push(transition);
                    }
                    None
                }
            };
            checker.check_state(tick, engine.state());

            if self.verbose {
                log::debug!(
                    "{} [{}] seed {seed} tick {tick}: {} -> {:.1} m",
                    mountain.id,
                    policy.name(),
                    action.label(),
                    engine.current_altitude()
                );
            }

            ticks.push(TickRecord {
                tick,
                action,
                altitude: engine.current_altitude(),
                progress,
            });

            let reached = mountain.camp_reached(total_steps, total_elevation);
            if reached.is_some_and(|camp| camp.is_summit) {
                break;
            }
        }

        let camp = mountain.camp_reached(total_steps, total_elevation);
        Ok(SimulationSummary {
            seed,
            mountain_id: mountain.id.clone(),
            mountain_height: mountain.height,
            strategy: plan.strategy,
            ticks,
            final_state: engine.state().clone(),
            camp_reached: camp.map(|camp| camp.name.clone()),
            summit_reached: camp.is_some_and(|camp| camp.is_summit),
            total_steps,
            total_elevation,
            zone_transitions,
            weather_days,
            violations: checker.into_violations(),
        })
    }
}

/// Per-tick checks of the engine's documented guarantees.
struct InvariantChecker {
    height: f64,
    multiplier: f64,
    altitude_applied: bool,
    max_altitude_seen: f64,
    violations: Vec<String>,
}

impl InvariantChecker {
    fn new(mountain: &Mountain, altitude_applied: bool) -> Self {
        Self {
            height: mountain.height,
            multiplier: mountain.difficulty_multiplier,
            altitude_applied,
            max_altitude_seen: 0.0,
            violations: Vec::new(),
        }
    }

    fn fail(&mut self, tick: u64, message: String) {
        self.violations.push(format!("tick {tick}: {message}"));
    }

    fn check_progress(
        &mut self,
        tick: u64,
        steps: u32,
        elevation: f64,
        progress: &RealisticProgress,
    ) {
        if progress.steps > steps {
            self.fail(tick, format!("steps grew from {steps} to {}", progress.steps));
        }
        if progress.altitude_gain < 0.0 {
            self.fail(tick, format!("negative gain {}", progress.altitude_gain));
        }
        if elevation > 0.0 && self.multiplier > 0.0 && progress.altitude_gain <= 0.0 {
            self.fail(tick, "no gain from positive elevation".to_string());
        }

        let mut factor = progress.weather_impact
            * progress.health_impact
            * progress.equipment_impact
            * progress.acclimatization_impact;
        if self.altitude_applied {
            factor *= progress.altitude_impact;
        }
        if (progress.elevation - elevation * factor).abs() > 1e-6 {
            self.fail(
                tick,
                format!(
                    "elevation {} does not match factor {factor:.4}",
                    progress.elevation
                ),
            );
        }

        let mut kinds = HashSet::new();
        for risk in &progress.risk_factors {
            if !kinds.insert(risk.kind) {
                self.fail(tick, format!("duplicate {} risk", risk.kind));
            }
        }
    }

    fn check_state(&mut self, tick: u64, state: &ClimbingState) {
        let health = &state.health_status;
        let accl = &state.acclimatization_status;

        if !(0.0..=self.height).contains(&state.current_altitude) {
            self.fail(tick, format!("altitude {} out of range", state.current_altitude));
        }
        if health.altitude_sickness_severity > 3 {
            self.fail(
                tick,
                format!("severity {}", health.altitude_sickness_severity),
            );
        }
        for (name, value) in [
            ("fatigue", health.fatigue_level),
            ("hydration", health.hydration_level),
            ("nutrition", health.nutrition_level),
            ("sleep", health.sleep_quality),
            ("sickness risk", accl.altitude_sickness_risk),
        ] {
            if !(0.0..=1.0).contains(&value) {
                self.fail(tick, format!("{name} {value} outside [0,1]"));
            }
        }
        if accl.max_altitude_reached < self.max_altitude_seen {
            self.fail(
                tick,
                format!(
                    "max altitude fell from {} to {}",
                    self.max_altitude_seen, accl.max_altitude_reached
                ),
            );
        }
        self.max_altitude_seen = self.max_altitude_seen.max(accl.max_altitude_reached);
    }

    fn into_violations(self) -> Vec<String> {
        self.violations
    }
}
