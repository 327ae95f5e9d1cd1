use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::logic::scenarios::TestScenario;
use crate::logic::simulation::{ExpeditionSimulator, SimulationPlan, SimulationSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    simulator: ExpeditionSimulator,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(simulator: ExpeditionSimulator, verbose: bool) -> Self {
        Self { simulator, verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (mountain: {} strategy: {} seed: {})",
                        scenario.name.bright_white(),
                        scenario.plan.mountain_id,
                        scenario.plan.strategy.label(),
                        seed
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let (successes, failures, performance_data) =
            self.run_simulation_iterations(&scenario.plan, seed, iterations);

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }

    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> (usize, Vec<String>, Vec<Duration>) {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let outcome = self
                .simulator
                .run_plan(plan, iteration_seed)
                .map_err(|err| format!("{err:#}"))
                .and_then(|summary| match evaluate_expectations(plan, &summary) {
                    Some(err) => Err(format!("{err} | {}", describe_run(&summary))),
                    None => Ok(summary),
                });

            match outcome {
                Ok(summary) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) ticks:{} camp:{}",
                            i + 1,
                            iterations,
                            summary.ticks.len(),
                            summary.camp_reached.as_deref().unwrap_or("-")
                        );
                    }
                }
                Err(err) => {
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            err.clone().red()
                        );
                    }
                    failures.push(format!(
                        "Iteration {} (seed {iteration_seed}): {err}",
                        i + 1
                    ));
                }
            }
        }

        (successes, failures, performance_data)
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    plan.expectations
        .iter()
        .find_map(|expectation| expectation.evaluate(summary).err())
        .map(|err| err.to_string())
}

fn describe_run(summary: &SimulationSummary) -> String {
    let health = &summary.final_state.health_status;
    let last_tick = summary
        .ticks
        .last()
        .map_or_else(
            || "none".to_string(),
            |record| format!("{} at {:.0} m", record.tick, record.altitude),
        );
    let weather = summary
        .weather_days
        .iter()
        .map(|(pattern, days)| format!("{pattern} {days}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} on {} (seed {}), last tick {last_tick}, {} steps, weather [{weather}], altitude {:.0}/{:.0} m, camp {}, fatigue {:.2} hydration {:.2} severity {}",
        summary.strategy.label(),
        summary.mountain_id,
        summary.seed,
        summary.total_steps,
        summary.final_state.current_altitude,
        summary.mountain_height,
        summary.camp_reached.as_deref().unwrap_or("-"),
        health.fatigue_level,
        health.hydration_level,
        health.altitude_sickness_severity
    )
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::policy::ClimbStrategy;
    use anyhow::bail;

    fn tester() -> LogicTester {
        LogicTester::new(ExpeditionSimulator::new(false).unwrap(), false)
    }

    #[test]
    fn passing_scenario_counts_every_iteration() {
        let scenario = TestScenario::simulation(
            "Pass",
            SimulationPlan::new("kilimanjaro", ClimbStrategy::Steady).with_max_ticks(10),
        );
        let results = tester().run_scenario(&scenario, &[1, 2], 3);
        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(result.passed);
            assert_eq!(result.successful_iterations, 3);
            assert_eq!(result.performance_data.len(), 3);
        }
        assert_eq!(results[1].seed, 2);
    }

    #[test]
    fn failing_expectation_is_reported_per_iteration() {
        let scenario = TestScenario::simulation(
            "Fail",
            SimulationPlan::new("fuji", ClimbStrategy::Steady)
                .with_max_ticks(5)
                .with_expectation(|_: &SimulationSummary| -> anyhow::Result<()> {
                    bail!("always wrong")
                }),
        );
        let results = tester().run_scenario(&scenario, &[7], 2);
        let result = &results[0];
        assert!(!result.passed);
        assert_eq!(result.successful_iterations, 0);
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures[0].contains("always wrong"));
        assert!(result.failures[1].contains("seed 8"));
    }

    #[test]
    fn unknown_mountain_fails_without_panicking() {
        let scenario = TestScenario::simulation(
            "Missing",
            SimulationPlan::new("atlantis", ClimbStrategy::Steady),
        );
        let results = tester().run_scenario(&scenario, &[1], 1);
        assert!(!results[0].passed);
        assert!(results[0].failures[0].contains("atlantis"));
    }

    #[test]
    fn durations_serialize_as_millis() {
        let result = ScenarioResult {
            scenario_name: "x".to_string(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            performance_data: vec![Duration::from_millis(12)],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
        assert_eq!(json["performance_data"][0], 12);
        let back: ScenarioResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.average_duration, Duration::from_millis(12));
    }
}
