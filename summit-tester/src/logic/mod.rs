pub mod policy;
pub mod reports;
pub mod scenarios;
pub mod simulation;
pub mod tester;

pub use scenarios::{get_scenario, list_scenarios, scenario_keys};
pub use simulation::ExpeditionSimulator;
pub use tester::*;
