use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use summit_engine::{ClimbingState, derive_stream_seed};

const ACTIVITY_STREAM_TAG: &[u8] = b"activity";

/// What the simulated climber does with one activity tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClimbAction {
    Climb { steps: u32, elevation: f64 },
    Rest,
    Hydrate,
    Descend,
}

impl ClimbAction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Climb { .. } => "climb",
            Self::Rest => "rest",
            Self::Hydrate => "hydrate",
            Self::Descend => "descend",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimbStrategy {
    /// Moderate daily activity, recovers when tired or thirsty.
    Steady,
    /// Huge elevation days, only stops when forced.
    Aggressive,
    /// Short days with frequent rest and early descent.
    Cautious,
}

impl ClimbStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Steady => "Steady",
            Self::Aggressive => "Aggressive",
            Self::Cautious => "Cautious",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn ClimberPolicy> {
        let rng = ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, ACTIVITY_STREAM_TAG));
        match self {
            Self::Steady => Box::new(SteadyPolicy { rng }),
            Self::Aggressive => Box::new(AggressivePolicy { rng }),
            Self::Cautious => Box::new(CautiousPolicy { rng }),
        }
    }
}

pub trait ClimberPolicy {
    fn name(&self) -> &'static str;
    fn decide(&mut self, state: &ClimbingState, tick: u64) -> ClimbAction;
}

struct SteadyPolicy {
    rng: ChaCha20Rng,
}

impl ClimberPolicy for SteadyPolicy {
    fn name(&self) -> &'static str {
        "steady"
    }

    fn decide(&mut self, state: &ClimbingState, _tick: u64) -> ClimbAction {
        let health = &state.health_status;
        if health.altitude_sickness_severity >= 2 {
            ClimbAction::Descend
        } else if health.fatigue_level > 0.7 {
            ClimbAction::Rest
        } else if health.hydration_level < 0.6 {
            ClimbAction::Hydrate
        } else {
            ClimbAction::Climb {
                steps: self.rng.gen_range(8_000..=12_000),
                elevation: self.rng.gen_range(100.0..=400.0),
            }
        }
    }
}

struct AggressivePolicy {
    rng: ChaCha20Rng,
}

impl ClimberPolicy for AggressivePolicy {
    fn name(&self) -> &'static str {
        "aggressive"
    }

    fn decide(&mut self, state: &ClimbingState, _tick: u64) -> ClimbAction {
        let health = &state.health_status;
        if health.altitude_sickness_severity >= 3 {
            ClimbAction::Descend
        } else if health.fatigue_level >= 1.0 {
            ClimbAction::Rest
        } else {
            ClimbAction::Climb {
                steps: self.rng.gen_range(15_000..=30_000),
                elevation: self.rng.gen_range(800.0..=3_000.0),
            }
        }
    }
}

struct CautiousPolicy {
    rng: ChaCha20Rng,
}

impl ClimberPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "cautious"
    }

    fn decide(&mut self, state: &ClimbingState, tick: u64) -> ClimbAction {
        let health = &state.health_status;
        if state.acclimatization_status.altitude_sickness_risk > 0.6 {
            ClimbAction::Descend
        } else if health.fatigue_level > 0.5 || (tick > 0 && tick % 4 == 0) {
            ClimbAction::Rest
        } else if health.hydration_level < 0.7 {
            ClimbAction::Hydrate
        } else {
            ClimbAction::Climb {
                steps: self.rng.gen_range(5_000..=9_000),
                elevation: self.rng.gen_range(50.0..=200.0),
            }
        }
    }
}
