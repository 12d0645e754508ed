// Host-side tests for tuning defaults and validation.

use card_scanner::core::constants::*;
use card_scanner::core::*;

#[test]
fn defaults_validate() {
    assert_eq!(ScannerConfig::default().validate(), Ok(()));
}

#[test]
fn pattern_width_is_one_image_cycle() {
    let s = StreamTuning::default();
    assert_eq!(s.pattern_width(), (CARD_WIDTH + CARD_GAP) * 5.0);
    assert_eq!(s.pattern_width(), 2300.0);
    assert_eq!(s.card_count, 30);
    assert_eq!(s.wheel_resume_after_sec, None);
}

#[test]
fn stream_defaults_match_constants() {
    let s = StreamTuning::default();
    assert_eq!(s.cruise_velocity, 120.0);
    assert_eq!(s.min_release_velocity, 30.0);
    assert_eq!(s.scan_band_width, 8.0);
    assert_eq!(s.wheel_scale, -0.5);
    assert_eq!(s.regen_interval_ms, 200);
    assert_eq!(s.regen_probability, 0.15);
}

#[test]
fn beam_levels_are_ordered() {
    let idle = BeamLevels::IDLE;
    let scan = BeamLevels::SCANNING;
    assert!(scan.intensity > idle.intensity);
    assert!(scan.max_particles > idle.max_particles);
    assert!(scan.fade_zone < idle.fade_zone);
    assert!(scan.glow > idle.glow);
    let beam = BeamTuning::default();
    assert!(beam.capacity >= SCAN_MAX_PARTICLES as usize + BEAM_CULL_SLACK);
    assert_eq!(beam.transition_rate, 0.05);
}

#[test]
fn bad_card_geometry_is_rejected() {
    let mut cfg = ScannerConfig::default();
    cfg.stream.card_width = 0.0;
    assert!(matches!(cfg.validate(), Err(ScannerError::InvalidTuning(_))));
}

#[test]
fn empty_card_set_is_rejected() {
    let mut cfg = ScannerConfig::default();
    cfg.stream.distinct_cards = 0;
    assert!(matches!(cfg.validate(), Err(ScannerError::InvalidTuning(_))));
}

#[test]
fn budget_above_capacity_is_rejected() {
    let mut cfg = ScannerConfig::default();
    cfg.beam.capacity = 1000;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("capacity"));
}

#[test]
fn error_messages_read_well() {
    assert_eq!(
        ScannerError::EmptyContainer.to_string(),
        "container has no width; card stream left inert"
    );
    assert_eq!(
        ScannerError::ContextUnavailable("2d").to_string(),
        "2d context unavailable"
    );
}
