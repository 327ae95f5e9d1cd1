use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use summit_engine::{
    ClimbingEngine, ClimbingState, EngineConfig, MemoryStorage, MountainCatalog, WeatherConfig,
    WeatherPolicy,
};

const SEEDS: [u64; 4] = [1, 42, 0xBEEF, 0x00C0_FFEE];
const ACTIONS_PER_SEED: usize = 2_000;

fn assert_bounded(state: &ClimbingState, height: f64, context: &str) {
    let unit = 0.0..=1.0;
    let health = &state.health_status;
    let accl = &state.acclimatization_status;
    assert!(
        (0.0..=height).contains(&state.current_altitude),
        "{context}: altitude {} outside 0..={height}",
        state.current_altitude
    );
    assert!(health.altitude_sickness_severity <= 3, "{context}: severity");
    for (name, value) in [
        ("fatigue", health.fatigue_level),
        ("hydration", health.hydration_level),
        ("nutrition", health.nutrition_level),
        ("sleep", health.sleep_quality),
        ("sickness risk", accl.altitude_sickness_risk),
    ] {
        assert!(unit.contains(&value), "{context}: {name} = {value}");
    }
    assert!(
        state
            .equipment_status
            .equipment
            .iter()
            .all(|item| item.durability <= 100),
        "{context}: durability"
    );
}

#[test]
fn random_sessions_stay_in_bounds() {
    let catalog = MountainCatalog::load_from_static().expect("embedded catalog");
    // Storm-heavy weather so the dangerous branches get exercised too.
    let weather = WeatherConfig::from_json(
        r#"{"weights": {"Clear": 1.0, "Cloudy": 1.0, "Windy": 1.0, "Storm": 1.0, "Blizzard": 1.0}}"#,
    )
    .expect("valid weights");

    for seed in SEEDS {
        for mountain in &catalog.mountains {
            let config = EngineConfig::default()
                .with_seed(seed)
                .with_weather(weather.clone())
                .with_weather_policy(WeatherPolicy::EveryTicks { ticks: 5 });
            let mut engine =
                ClimbingEngine::with_config(MemoryStorage::new(), config).expect("valid config");
            let mut driver = SmallRng::seed_from_u64(seed ^ 0xA5A5);
            let mut max_seen = 0.0_f64;

            for action in 0..ACTIONS_PER_SEED {
                match driver.gen_range(0..10) {
                    0 => engine.rest(),
                    1 => engine.hydrate(),
                    2 => engine.descend(),
                    _ => {
                        let steps = driver.gen_range(0..40_000);
                        let elevation = driver.gen_range(0.0..6_000.0);
                        engine
                            .calculate_realistic_progress(steps, elevation, mountain, None)
                            .expect("valid tick");
                    }
                }

                let context = format!("seed {seed} {} action {action}", mountain.id);
                assert_bounded(engine.state(), mountain.height, &context);
                let max_reached = engine.acclimatization_status().max_altitude_reached;
                assert!(max_reached >= max_seen, "{context}: max altitude decreased");
                max_seen = max_reached;
            }
        }
    }
}

#[test]
fn descending_from_low_altitude_lands_on_zero() {
    let mut engine = ClimbingEngine::with_config(
        MemoryStorage::new(),
        EngineConfig::default().with_seed(8),
    )
    .expect("valid config");
    engine.with_state_mut(|state| state.current_altitude = 320.0);
    engine.descend();
    assert!(engine.current_altitude().abs() < f64::EPSILON);
    engine.descend();
    assert!(engine.current_altitude().abs() < f64::EPSILON);
}

#[test]
fn hydrating_near_full_caps_at_one() {
    let mut engine = ClimbingEngine::with_config(
        MemoryStorage::new(),
        EngineConfig::default().with_seed(9),
    )
    .expect("valid config");
    engine.with_state_mut(|state| state.health_status.hydration_level = 0.85);
    engine.hydrate();
    assert!((engine.health_status().hydration_level - 1.0).abs() < f64::EPSILON);
}
