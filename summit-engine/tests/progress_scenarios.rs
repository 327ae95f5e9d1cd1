use summit_engine::{
    Camp, ClimbingEngine, EngineConfig, MemoryStorage, Mountain, MountainCatalog,
    MountainDifficulty, RiskKind, RiskSeverity, WeatherPattern, equipment_modifier,
};

fn mountain(height: f64, multiplier: f64) -> Mountain {
    Mountain {
        id: "scenario".to_string(),
        name: "Scenario Peak".to_string(),
        height,
        location: "Test Range".to_string(),
        difficulty: MountainDifficulty::Intermediate,
        difficulty_multiplier: multiplier,
        estimated_days: 7,
        weather_patterns: vec![WeatherPattern::Clear, WeatherPattern::Cloudy],
        camps: vec![Camp {
            name: "Summit".to_string(),
            altitude: height,
            steps_required: 0,
            elevation_required: 0.0,
            is_base_camp: false,
            is_summit: true,
        }],
    }
}

fn clear_engine() -> ClimbingEngine<MemoryStorage> {
    let config = EngineConfig::default().with_seed(0xC11B);
    let mut engine =
        ClimbingEngine::with_config(MemoryStorage::new(), config).expect("default config");
    engine.set_weather(WeatherPattern::Clear);
    engine
}

#[test]
fn fresh_climber_first_tick() {
    let mut engine = clear_engine();
    assert_eq!(engine.acclimatization_status().days_at_current_altitude, 0);

    let progress = engine
        .calculate_realistic_progress(5000, 300.0, &mountain(5895.0, 5.0), None)
        .expect("valid tick");

    assert!((progress.altitude_gain - 15.0).abs() < 1e-9);
    assert!((engine.current_altitude() - 15.0).abs() < 1e-9);
    assert!((progress.current_altitude - 15.0).abs() < 1e-9);
    assert_eq!(engine.acclimatization_status().days_at_current_altitude, 1);
    assert!(progress.risk_factors.is_empty());
    assert!(engine.risk_factors().is_empty());

    // Fresh acclimatization scales steps by 0.7; weather, health and gear are neutral.
    assert!((progress.acclimatization_impact - 0.7).abs() < 1e-9);
    assert_eq!(progress.steps, 3500);
    assert!((progress.elevation - 210.0).abs() < 1e-9);
    assert!((engine.acclimatization_status().last_ascent_rate - 15.0).abs() < 1e-9);
}

#[test]
fn altitude_modifier_reported_but_not_applied() {
    let mut engine = clear_engine();
    engine.with_state_mut(|state| {
        state.current_altitude = 4000.0;
        state.acclimatization_status.days_at_current_altitude = 6;
    });

    let progress = engine
        .calculate_realistic_progress(1000, 1000.0, &mountain(5895.0, 5.0), None)
        .expect("valid tick");

    assert!((progress.altitude_impact - 0.8).abs() < 1e-9);
    assert!((progress.altitude_gain - 22.86).abs() < 0.01);
    // Steps only see the applied factors, all neutral here.
    assert_eq!(progress.steps, 1000);
}

#[test]
fn altitude_sickness_factor_threshold() {
    let mut engine = clear_engine();
    let peak = mountain(5895.0, 5.0);

    // A gradual tick lowers risk by 0.05 before assessment, so start just above.
    engine.with_state_mut(|state| state.acclimatization_status.altitude_sickness_risk = 0.8);
    let progress = engine
        .calculate_realistic_progress(100, 10.0, &peak, None)
        .expect("valid tick");
    let sickness: Vec<_> = progress
        .risk_factors
        .iter()
        .filter(|risk| risk.kind == RiskKind::AltitudeSickness)
        .collect();
    assert_eq!(sickness.len(), 1);
    assert_eq!(sickness[0].severity, RiskSeverity::High);

    engine.with_state_mut(|state| state.acclimatization_status.altitude_sickness_risk = 0.75);
    assert!(
        engine
            .risk_factors()
            .iter()
            .any(|risk| risk.kind == RiskKind::AltitudeSickness)
    );

    engine.with_state_mut(|state| state.acclimatization_status.altitude_sickness_risk = 0.5);
    assert!(
        !engine
            .risk_factors()
            .iter()
            .any(|risk| risk.kind == RiskKind::AltitudeSickness)
    );
}

#[test]
fn damaged_gear_compounds_but_reports_once() {
    let mut engine = clear_engine();
    engine.with_state_mut(|state| {
        state.equipment_status.set_durability("Ice Axe", 40);
        state.equipment_status.set_durability("Crampons", 45);
    });

    assert!((equipment_modifier(engine.equipment_status()) - 0.9025).abs() < 1e-9);

    let progress = engine
        .calculate_realistic_progress(1000, 50.0, &mountain(5895.0, 5.0), None)
        .expect("valid tick");
    assert!((progress.equipment_impact - 0.9025).abs() < 1e-9);
    let equipment_risks = progress
        .risk_factors
        .iter()
        .filter(|risk| risk.kind == RiskKind::Equipment)
        .count();
    assert_eq!(equipment_risks, 1);
}

#[test]
fn storm_tick_slows_progress_and_warns() {
    let mut engine = clear_engine();
    engine.set_weather(WeatherPattern::Storm);
    let progress = engine
        .calculate_realistic_progress(1000, 100.0, &mountain(5895.0, 5.0), None)
        .expect("valid tick");
    assert!((progress.weather_impact - 0.3).abs() < 1e-9);
    assert_eq!(progress.steps, 210);
    assert_eq!(progress.risk_factors[0].kind, RiskKind::Weather);
    assert!(
        engine
            .climbing_tips()
            .iter()
            .any(|tip| tip.title == "Storm Safety")
    );
}

#[test]
fn summit_push_crosses_zones_on_everest() {
    let catalog = MountainCatalog::load_from_static().expect("embedded catalog");
    let everest = catalog.find("everest").expect("everest listed");
    let mut engine = clear_engine();
    engine.with_state_mut(|state| state.current_altitude = 1990.0);

    let progress = engine
        .calculate_realistic_progress(20_000, 200.0, everest, everest.base_camp())
        .expect("valid tick");
    let transition = progress.zone_transition.expect("crossed into moorland");
    assert_eq!(transition.tick, 0);
    assert_eq!(engine.check_for_zone_transition(), Some(transition));

    engine
        .calculate_realistic_progress(100, 1.0, everest, everest.base_camp())
        .expect("valid tick");
    assert!(engine.check_for_zone_transition().is_none());
    assert_eq!(engine.last_zone_transition().map(|t| t.tick), Some(0));
}
