//! Converts real-world elevation into simulated altitude on the mountain.
use crate::constants::{
    ALTITUDE_PENALTY_FLOOR, DIFFICULTY_SCALE, ELEVATION_TO_ALTITUDE, SUMMIT_APPROACH_PENALTY,
};
use crate::modifiers::altitude_fraction;

/// Thinning penalty as the climber nears the top; never below the floor.
#[must_use]
pub fn approach_penalty(current_altitude: f64, height: f64) -> f64 {
    let fraction = altitude_fraction(current_altitude, height);
    (1.0 - fraction * SUMMIT_APPROACH_PENALTY).max(ALTITUDE_PENALTY_FLOOR)
}

/// Simulated meters gained for `elevation` meters climbed in the real world.
#[must_use]
pub fn estimate_altitude_gain(
    elevation: f64,
    difficulty_multiplier: f64,
    current_altitude: f64,
    height: f64,
) -> f64 {
    let base_gain = elevation * ELEVATION_TO_ALTITUDE;
    let difficulty = difficulty_multiplier / DIFFICULTY_SCALE;
    base_gain * difficulty * approach_penalty(current_altitude, height)
}
