// Host-side tests for beam-band reveal boundaries.

use card_scanner::core::*;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn band() -> BeamBand {
    BeamBand::centered(1000.0, 8.0)
}

fn card(left: f32) -> CardBounds {
    CardBounds {
        left,
        right: left + 400.0,
    }
}

#[test]
fn band_is_centred_on_viewport() {
    let b = band();
    assert!(approx(b.left, 496.0, 1e-6));
    assert!(approx(b.right, 504.0, 1e-6));
}

#[test]
fn card_ahead_of_band_stays_plain() {
    let r = reveal_for(card(600.0), band(), false);
    assert_eq!(r.phase, CardPhase::Ahead);
    assert_eq!(r.plain_clip_right, 0.0);
    assert_eq!(r.decoded_clip_left, 0.0);
    assert!(!r.scanned);
    assert!(!r.scanned_changed);
}

#[test]
fn card_past_band_is_fully_decoded() {
    let r = reveal_for(card(0.0), band(), false);
    assert_eq!(r.phase, CardPhase::Passed);
    assert_eq!(r.plain_clip_right, 100.0);
    assert_eq!(r.decoded_clip_left, 100.0);
}

#[test]
fn touching_edge_does_not_count_as_overlap() {
    // right edge exactly on band.left
    let c = CardBounds {
        left: 96.0,
        right: 496.0,
    };
    assert!(!band().overlaps(&c));
    assert_eq!(reveal_for(c, band(), false).phase, CardPhase::Passed);
}

#[test]
fn straddling_card_splits_at_the_band() {
    let r = reveal_for(card(300.0), band(), false);
    assert_eq!(r.phase, CardPhase::Scanning);
    assert!(approx(r.plain_clip_right, 49.0, 1e-4));
    assert!(approx(r.decoded_clip_left, 51.0, 1e-4));
    assert!(approx(r.seam_percent(), 2.0, 1e-4));
    assert!(r.scanned);
    assert!(r.scanned_changed);
}

#[test]
fn leading_edge_entering_band_is_not_yet_scanned() {
    let r = reveal_for(card(500.0), band(), false);
    assert_eq!(r.phase, CardPhase::Scanning);
    assert_eq!(r.plain_clip_right, 0.0);
    assert!(approx(r.decoded_clip_left, 1.0, 1e-4));
    assert!(!r.scanned);
}

#[test]
fn trailing_edge_clamps_to_full_width() {
    let r = reveal_for(card(100.0), band(), false);
    assert_eq!(r.phase, CardPhase::Scanning);
    assert!(approx(r.plain_clip_right, 99.0, 1e-4));
    assert_eq!(r.decoded_clip_left, 100.0);
}

#[test]
fn zero_width_card_is_treated_as_ahead() {
    let c = CardBounds {
        left: 500.0,
        right: 500.0,
    };
    let r = reveal_for(c, band(), true);
    assert_eq!(r.phase, CardPhase::Ahead);
    assert_eq!(r.plain_clip_right, 0.0);
    assert_eq!(r.decoded_clip_left, 0.0);
    assert!(r.scanned_changed);
}

#[test]
fn boundaries_stay_ordered_across_a_sweep() {
    let b = band();
    let mut was = false;
    let mut left = 1500.0;
    while left > -500.0 {
        let r = reveal_for(card(left), b, was);
        assert!(r.plain_clip_right >= 0.0 && r.plain_clip_right <= 100.0);
        assert!(r.decoded_clip_left >= 0.0 && r.decoded_clip_left <= 100.0);
        assert!(r.plain_clip_right <= r.decoded_clip_left, "at left={}", left);
        was = r.scanned;
        left -= 7.0;
    }
}

#[test]
fn compute_reveals_carries_marker_between_frames() {
    let b = band();
    let mut scanned = Vec::new();
    let mut out = Vec::new();

    let any = compute_reveals(&[card(300.0), card(760.0)], b, &mut scanned, &mut out);
    assert!(any);
    assert_eq!(out.len(), 2);
    assert_eq!(scanned, vec![true, false]);
    assert!(out[0].scanned_changed);
    assert_eq!(out[1].phase, CardPhase::Ahead);

    // still under the band: marker held, no change to write
    let any = compute_reveals(&[card(200.0), card(660.0)], b, &mut scanned, &mut out);
    assert!(any);
    assert!(out[0].scanned);
    assert!(!out[0].scanned_changed);

    // fully past: marker drops
    let any = compute_reveals(&[card(-300.0), card(160.0)], b, &mut scanned, &mut out);
    assert!(any);
    assert_eq!(out[0].phase, CardPhase::Passed);
    assert!(!out[0].scanned);
    assert!(out[0].scanned_changed);
    assert_eq!(out[1].phase, CardPhase::Scanning);
}

#[test]
fn compute_reveals_reports_gap_under_band() {
    let mut scanned = Vec::new();
    let mut out = Vec::new();
    let any = compute_reveals(&[card(60.0), card(520.0)], band(), &mut scanned, &mut out);
    assert!(!any);
    assert_eq!(out[0].phase, CardPhase::Passed);
    assert_eq!(out[1].phase, CardPhase::Ahead);
}
