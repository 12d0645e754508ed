// Host-side tests for the ambient point field.

use card_scanner::core::*;
use glam::Vec4;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn field(width: f32) -> AmbientParticleField {
    AmbientParticleField::new(width, AmbientTuning::default(), 5)
}

#[test]
fn seeds_the_configured_count_inside_the_band() {
    let f = field(1200.0);
    assert_eq!(f.particles().len(), 400);
    assert!(approx(f.height(), 250.0, 1e-6));
    for p in f.particles() {
        assert!(p.pos.x >= -1200.0 && p.pos.x <= 1200.0);
        assert!(p.pos.y >= -125.0 && p.pos.y <= 125.0);
        assert!(p.velocity >= 30.0 && p.velocity < 90.0);
        assert!((0.0..=1.0).contains(&p.alpha));
        assert!(p.size > 0.0);
    }
}

#[test]
fn phases_are_spaced_by_index() {
    let f = field(800.0);
    let ps = f.particles();
    assert!(approx(ps[0].phase, 0.0, 1e-6));
    assert!(approx(ps[10].phase, 1.0, 1e-5));
}

#[test]
fn exit_and_entry_follow_width() {
    let mut f = field(1000.0);
    assert!(approx(f.exit_x(), 600.0, 1e-6));
    assert!(approx(f.entry_x(), -600.0, 1e-6));
    f.resize(400.0);
    assert!(approx(f.exit_x(), 300.0, 1e-6));
}

#[test]
fn particles_drift_right_and_wrap_to_the_left() {
    let mut f = field(200.0);
    let before: Vec<f32> = f.particles().iter().map(|p| p.pos.x).collect();
    f.step(0.0);
    let mut moved_right = 0;
    for (p, x0) in f.particles().iter().zip(&before) {
        if p.pos.x > *x0 {
            moved_right += 1;
        }
    }
    assert!(moved_right > 0);

    let mut wrapped = false;
    for frame in 0..2000 {
        f.step(frame as f32 * 0.016);
        for p in f.particles() {
            assert!(p.pos.x <= f.exit_x());
            if approx(p.pos.x, f.entry_x(), 1e-3) {
                wrapped = true;
            }
        }
    }
    assert!(wrapped);
}

#[test]
fn alpha_stays_in_unit_range() {
    let mut f = field(600.0);
    for frame in 0..500 {
        f.step(frame as f32 * 0.016);
        assert!(f.particles().iter().all(|p| (0.0..=1.0).contains(&p.alpha)));
    }
}

#[test]
fn projection_maps_field_edges_to_clip_edges() {
    let f = field(1000.0);
    let vp = f.view_projection();
    let right = vp * Vec4::new(500.0, 0.0, 0.0, 1.0);
    let top_left = vp * Vec4::new(-500.0, 125.0, 0.0, 1.0);
    assert!(approx(right.x / right.w, 1.0, 1e-5));
    assert!(approx(right.y / right.w, 0.0, 1e-5));
    assert!(approx(top_left.x / top_left.w, -1.0, 1e-5));
    assert!(approx(top_left.y / top_left.w, 1.0, 1e-5));
    let depth = right.z / right.w;
    assert!((0.0..=1.0).contains(&depth));
}

#[test]
fn frame_task_steps_the_field() {
    let mut f = field(800.0);
    let before = f.particles()[0].pos;
    f.frame(16.0);
    assert_ne!(f.particles()[0].pos, before);
}

#[test]
fn points_draw_at_one_fixed_size() {
    let f = field(1000.0);
    assert!(approx(f.point_size(), 15.0, 1e-6));
    let sizes: Vec<f32> = f.particles().iter().map(|p| p.size).collect();
    // per-particle sizes vary but are not what reaches the screen
    assert!(sizes.iter().any(|s| (s - sizes[0]).abs() > 1e-3));
}
