use anyhow::{Result, bail, ensure};
use std::collections::HashMap;

use summit_engine::{ClimbingState, RiskKind, WeatherConfig, WeatherPattern, WeatherPolicy};

use crate::logic::policy::ClimbStrategy;
use crate::logic::simulation::{SimulationPlan, SimulationSummary};

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

struct CatalogEntry {
    key: &'static str,
    description: &'static str,
    build: fn() -> TestScenario,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        key: "smoke",
        description: "Steady climber on Kilimanjaro, invariants only",
        build: smoke,
    },
    CatalogEntry {
        key: "fuji-cautious",
        description: "Cautious climber reaches the Fuji summit",
        build: fuji_cautious,
    },
    CatalogEntry {
        key: "everest-aggressive",
        description: "Aggressive push on Everest triggers altitude risk",
        build: everest_aggressive,
    },
    CatalogEntry {
        key: "storm-front",
        description: "Storm-only weather slows every tick and always warns",
        build: storm_front,
    },
    CatalogEntry {
        key: "recovery",
        description: "Exhausted, sick climber recovers before climbing on",
        build: recovery,
    },
    CatalogEntry {
        key: "altitude-opt-in",
        description: "Altitude modifier applied to progress high on Mont Blanc",
        build: altitude_opt_in,
    },
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG
        .iter()
        .map(|entry| (entry.key, entry.description))
        .collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<TestScenario> {
    let normalized = key.trim().to_ascii_lowercase();
    CATALOG
        .iter()
        .find(|entry| entry.key == normalized)
        .map(|entry| (entry.build)())
}

#[must_use]
pub fn scenario_keys() -> Vec<&'static str> {
    CATALOG.iter().map(|entry| entry.key).collect()
}

fn expect_clean(summary: &SimulationSummary) -> Result<()> {
    if let Some(first) = summary.violations.first() {
        bail!(
            "{} invariant violations, first: {first}",
            summary.violations.len()
        );
    }
    Ok(())
}

fn smoke() -> TestScenario {
    TestScenario::simulation(
        "Kilimanjaro Smoke",
        SimulationPlan::new("kilimanjaro", ClimbStrategy::Steady)
            .with_max_ticks(60)
            .with_expectation(expect_clean)
            .with_expectation(|summary: &SimulationSummary| {
                ensure!(
                    summary.count_actions("climb") > 0,
                    "steady climber never climbed"
                );
                ensure!(
                    summary.final_state.acclimatization_status.max_altitude_reached > 0.0,
                    "no altitude gained"
                );
                Ok(())
            }),
    )
}

fn fuji_cautious() -> TestScenario {
    TestScenario::simulation(
        "Fuji Cautious Summit",
        SimulationPlan::new("fuji", ClimbStrategy::Cautious)
            .with_max_ticks(240)
            .with_expectation(expect_clean)
            .with_expectation(|summary: &SimulationSummary| {
                ensure!(
                    summary.summit_reached,
                    "summit not reached; stopped at {:?} after {} ticks",
                    summary.camp_reached,
                    summary.ticks.len()
                );
                ensure!(summary.count_actions("rest") > 0, "cautious climber never rested");
                Ok(())
            }),
    )
}

fn everest_aggressive() -> TestScenario {
    TestScenario::simulation(
        "Everest Aggressive Push",
        SimulationPlan::new("everest", ClimbStrategy::Aggressive)
            .with_max_ticks(80)
            .with_expectation(expect_clean)
            .with_expectation(|summary: &SimulationSummary| {
                let sickness_seen = summary.progress().any(|progress| {
                    progress
                        .risk_factors
                        .iter()
                        .any(|risk| risk.kind == RiskKind::AltitudeSickness)
                });
                ensure!(sickness_seen, "rapid ascent never raised altitude sickness risk");
                ensure!(
                    summary.count_actions("descend") > 0,
                    "severe sickness never forced a descent"
                );
                Ok(())
            }),
    )
}

fn storm_only_weather() -> WeatherConfig {
    WeatherConfig {
        weights: HashMap::from([(WeatherPattern::Storm, 1.0)]),
    }
}

fn storm_front() -> TestScenario {
    TestScenario::simulation(
        "Storm Front",
        SimulationPlan::new("rainier", ClimbStrategy::Steady)
            .with_max_ticks(30)
            .with_weather(storm_only_weather())
            .with_weather_policy(WeatherPolicy::EveryTicks { ticks: 1 })
            .with_expectation(expect_clean)
            .with_expectation(|summary: &SimulationSummary| {
                for progress in summary.progress() {
                    ensure!(
                        progress.weather == WeatherPattern::Storm,
                        "weather escaped the storm table: {}",
                        progress.weather
                    );
                    ensure!(
                        (progress.weather_impact - 0.3).abs() < 1e-9,
                        "storm impact {}",
                        progress.weather_impact
                    );
                    ensure!(
                        progress
                            .risk_factors
                            .iter()
                            .any(|risk| risk.kind == RiskKind::Weather),
                        "storm tick without a weather warning"
                    );
                }
                Ok(())
            }),
    )
}

fn exhausted_and_sick(state: &mut ClimbingState) {
    state.current_altitude = 1200.0;
    state.health_status.fatigue_level = 1.0;
    state.health_status.altitude_sickness_severity = 3;
    state.health_status.hydration_level = 0.2;
}

fn recovery() -> TestScenario {
    TestScenario::simulation(
        "Recovery Loop",
        SimulationPlan::new("kilimanjaro", ClimbStrategy::Steady)
            .with_max_ticks(40)
            .with_setup(exhausted_and_sick)
            .with_expectation(expect_clean)
            .with_expectation(|summary: &SimulationSummary| {
                ensure!(summary.count_actions("descend") > 0, "sick climber never descended");
                ensure!(summary.count_actions("rest") > 0, "exhausted climber never rested");
                ensure!(
                    summary.final_state.health_status.altitude_sickness_severity < 3,
                    "sickness never eased"
                );
                Ok(())
            }),
    )
}

fn high_on_the_mountain(state: &mut ClimbingState) {
    state.current_altitude = 3000.0;
    state.acclimatization_status.max_altitude_reached = 3000.0;
}

fn altitude_opt_in() -> TestScenario {
    TestScenario::simulation(
        "Altitude Modifier Opt-In",
        SimulationPlan::new("mont-blanc", ClimbStrategy::Steady)
            .with_max_ticks(60)
            .with_altitude_modifier()
            .with_setup(high_on_the_mountain)
            .with_expectation(expect_clean)
            .with_expectation(|summary: &SimulationSummary| {
                ensure!(summary.progress().next().is_some(), "no climbing ticks");
                for progress in summary.progress() {
                    ensure!(
                        progress.altitude_impact < 1.0,
                        "altitude modifier {} above 3000 m",
                        progress.altitude_impact
                    );
                }
                Ok(())
            }),
    )
}
