// Host-side tests for the card stream controller against an in-memory strip.

use card_scanner::core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

/// Cards laid out every 460 px starting at the strip offset.
struct FakeStrip {
    container: f32,
    viewport: f32,
    cards: usize,
    offset: f32,
    reveals: Vec<CardReveal>,
    texts: Vec<String>,
    dragging: bool,
    speed: Option<u32>,
    marker_writes: usize,
}

impl FakeStrip {
    fn new(container: f32, cards: usize) -> Self {
        Self {
            container,
            viewport: 1000.0,
            cards,
            offset: f32::NAN,
            reveals: Vec::new(),
            texts: vec![String::new(); cards],
            dragging: false,
            speed: None,
            marker_writes: 0,
        }
    }
}

impl StripSurface for FakeStrip {
    fn container_width(&self) -> f32 {
        self.container
    }

    fn viewport_width(&self) -> f32 {
        self.viewport
    }

    fn card_count(&self) -> usize {
        self.cards
    }

    fn set_offset(&mut self, offset_px: f32) {
        self.offset = offset_px;
    }

    fn read_card_bounds(&self, out: &mut Vec<CardBounds>) {
        for i in 0..self.cards {
            let left = self.offset + i as f32 * 460.0;
            out.push(CardBounds {
                left,
                right: left + 400.0,
            });
        }
    }

    fn write_reveals(&mut self, reveals: &[CardReveal]) {
        self.marker_writes += reveals.iter().filter(|r| r.scanned_changed).count();
        self.reveals = reveals.to_vec();
    }

    fn set_decoded_text(&mut self, index: usize, text: &str) {
        self.texts[index] = text.to_string();
    }

    fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    fn set_speed_readout(&mut self, velocity: u32) {
        self.speed = Some(velocity);
    }
}

fn beam() -> Rc<RefCell<BeamParticleField>> {
    Rc::new(RefCell::new(BeamParticleField::new(
        1000.0,
        BeamTuning::default(),
        3,
    )))
}

fn controller_with(
    strip: FakeStrip,
    tuning: StreamTuning,
) -> (CardStreamController<FakeStrip>, Rc<RefCell<BeamParticleField>>) {
    let b = beam();
    let ctl = CardStreamController::new(strip, b.clone(), tuning, 11).expect("valid strip");
    (ctl, b)
}

fn controller() -> (CardStreamController<FakeStrip>, Rc<RefCell<BeamParticleField>>) {
    controller_with(FakeStrip::new(1200.0, 30), StreamTuning::default())
}

#[test]
fn zero_width_container_is_rejected() {
    let r = CardStreamController::new(FakeStrip::new(0.0, 30), beam(), StreamTuning::default(), 1);
    assert!(matches!(r, Err(ScannerError::EmptyContainer)));
}

#[test]
fn empty_strip_is_rejected() {
    let r = CardStreamController::new(FakeStrip::new(1200.0, 0), beam(), StreamTuning::default(), 1);
    assert!(matches!(r, Err(ScannerError::EmptyContainer)));
}

#[test]
fn construction_runs_a_first_sync() {
    let (ctl, b) = controller();
    assert_eq!(ctl.surface().offset, 0.0);
    assert_eq!(ctl.surface().reveals.len(), 30);
    assert_eq!(ctl.reveals().len(), 30);
    // card 1 spans 460..860 and sits under the band at offset 0
    assert!(ctl.any_scanning());
    assert!(b.borrow().is_scanning());
    assert_eq!(ctl.surface().speed, Some(120));
}

#[test]
fn tick_drifts_and_rewrites_offset() {
    let (mut ctl, _) = controller();
    ctl.tick();
    assert!(approx(ctl.surface().offset, -1.92, 1e-4));
    assert!(approx(ctl.motion().position(), -1.92, 1e-4));
}

#[test]
fn beam_follows_whether_any_card_is_under_it() {
    let (mut ctl, b) = controller();
    // offset -400: card 1 ends at 460, card 2 starts at 520
    ctl.begin_drag(0.0, 0.0);
    ctl.drag_to(-400.0, 16.0);
    assert!(approx(ctl.surface().offset, -400.0, 1e-3));
    assert!(!ctl.any_scanning());
    assert!(!b.borrow().is_scanning());

    ctl.drag_to(-300.0, 32.0);
    assert!(ctl.any_scanning());
    assert!(b.borrow().is_scanning());
}

#[test]
fn scanned_marker_only_written_on_change() {
    let (mut ctl, _) = controller();
    let after_first = ctl.surface().marker_writes;
    ctl.begin_drag(0.0, 0.0);
    ctl.drag_to(-10.0, 500.0);
    ctl.drag_to(-20.0, 1000.0);
    // card 1 stays under the band the whole time
    assert_eq!(ctl.surface().marker_writes, after_first);
}

#[test]
fn drag_toggles_surface_dragging_state() {
    let (mut ctl, _) = controller();
    ctl.begin_drag(500.0, 0.0);
    assert!(ctl.surface().dragging);
    assert!(ctl.motion().is_dragging());
    let release = ctl.end_drag();
    assert!(matches!(release, Some(Release::Settle { .. })));
    assert!(!ctl.surface().dragging);
    assert_eq!(ctl.end_drag(), None);
}

#[test]
fn fling_updates_speed_readout() {
    let (mut ctl, _) = controller();
    ctl.begin_drag(500.0, 0.0);
    ctl.drag_to(400.0, 50.0);
    let release = ctl.end_drag();
    assert!(matches!(
        release,
        Some(Release::Fling {
            direction: Direction::Left,
            ..
        })
    ));
    ctl.tick();
    assert_eq!(ctl.surface().speed, Some(2000));
}

#[test]
fn wheel_parks_and_syncs_immediately() {
    let (mut ctl, _) = controller();
    ctl.wheel(0.0, 100.0);
    assert!(approx(ctl.surface().offset, -50.0, 1e-4));
    assert_eq!(ctl.surface().speed, Some(0));
    ctl.tick();
    assert!(approx(ctl.surface().offset, -50.0, 1e-4));
}

#[test]
fn pause_stops_drift() {
    let (mut ctl, _) = controller();
    assert!(!ctl.toggle_animation());
    for _ in 0..10 {
        ctl.tick();
    }
    assert_eq!(ctl.surface().offset, 0.0);
    assert!(ctl.toggle_animation());
    ctl.tick();
    assert!(ctl.surface().offset < 0.0);
}

#[test]
fn reset_position_uses_container_width() {
    let (mut ctl, _) = controller();
    ctl.change_direction();
    ctl.wheel(0.0, 40.0);
    ctl.reset_position();
    assert!(approx(ctl.surface().offset, -1100.0, 1e-3));
    assert_eq!(ctl.motion().direction(), Direction::Left);
    assert!(ctl.motion().is_animating());
    assert!(approx(ctl.motion().velocity(), 120.0, 1e-6));
}

#[test]
fn resize_feeds_the_next_reset() {
    let (mut ctl, _) = controller();
    ctl.resize(0.0);
    ctl.resize(800.0);
    ctl.reset_position();
    assert!(approx(ctl.surface().offset, -1500.0, 1e-3));
}

#[test]
fn change_direction_reverses_drift() {
    let (mut ctl, _) = controller();
    assert_eq!(ctl.change_direction(), Direction::Right);
    ctl.tick();
    assert!(approx(ctl.surface().offset, -2300.0 + 1.92, 1e-2));
    assert_eq!(ctl.change_direction(), Direction::Left);
}

#[test]
fn regeneration_respects_probability() {
    let never = StreamTuning {
        regen_probability: 0.0,
        ..StreamTuning::default()
    };
    let (mut ctl, _) = controller_with(FakeStrip::new(1200.0, 30), never);
    assert_eq!(ctl.regenerate_faces(), 0);
    assert!(ctl.surface().texts.iter().all(|t| t.is_empty()));

    let always = StreamTuning {
        regen_probability: 1.0,
        ..StreamTuning::default()
    };
    let (mut ctl, _) = controller_with(FakeStrip::new(1200.0, 30), always);
    assert_eq!(ctl.regenerate_faces(), 30);
    for text in &ctl.surface().texts {
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 19);
        assert!(lines.iter().all(|l| l.chars().count() == 66));
    }
}

#[test]
fn frame_loop_drives_the_controller() {
    let sched = Rc::new(ManualScheduler::new());
    let (ctl, _) = controller();
    let ctl = Rc::new(RefCell::new(ctl));
    let handle = start_loop(sched.clone(), ctl.clone());
    sched.run_frames(10, 16.0);
    assert_eq!(handle.frames(), 10);
    assert!(approx(ctl.borrow().surface().offset, -19.2, 1e-3));

    drop(handle);
    assert_eq!(sched.pending_frames(), 0);
    sched.run_frames(5, 16.0);
    assert!(approx(ctl.borrow().surface().offset, -19.2, 1e-3));
}

#[test]
fn regeneration_timer_fires_every_period() {
    let sched = Rc::new(ManualScheduler::new());
    let always = StreamTuning {
        regen_probability: 1.0,
        ..StreamTuning::default()
    };
    let (ctl, _) = controller_with(FakeStrip::new(1200.0, 4), always);
    let ctl = Rc::new(RefCell::new(ctl));
    let runs = Rc::new(Cell::new(0));
    let timer = {
        let (c, runs) = (ctl.clone(), runs.clone());
        start_interval(
            sched.clone(),
            200,
            Rc::new(move || {
                c.borrow_mut().regenerate_faces();
                runs.set(runs.get() + 1);
            }),
        )
    };
    sched.advance_clock(1000.0);
    assert_eq!(runs.get(), 5);
    assert!(ctl.borrow().surface().texts.iter().all(|t| !t.is_empty()));

    timer.cancel();
    assert!(!timer.is_running());
    sched.advance_clock(1000.0);
    assert_eq!(runs.get(), 5);
}
