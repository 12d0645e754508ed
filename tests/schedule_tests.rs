// Host-side tests for frame loops and timers on the manual scheduler.

use card_scanner::core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct Counter {
    frames: u32,
    last_ts: f64,
}

impl FrameTask for Counter {
    fn frame(&mut self, timestamp_ms: f64) {
        self.frames += 1;
        self.last_ts = timestamp_ms;
    }
}

fn setup() -> (Rc<ManualScheduler>, Rc<RefCell<Counter>>) {
    (
        Rc::new(ManualScheduler::new()),
        Rc::new(RefCell::new(Counter::default())),
    )
}

#[test]
fn loop_runs_once_per_frame() {
    let (sched, task) = setup();
    let handle = start_loop(sched.clone(), task.clone());
    assert_eq!(sched.pending_frames(), 1);
    assert_eq!(task.borrow().frames, 0);

    assert_eq!(sched.run_frame(16.0), 1);
    assert_eq!(task.borrow().frames, 1);
    assert_eq!(sched.pending_frames(), 1);

    sched.run_frames(9, 16.0);
    assert_eq!(task.borrow().frames, 10);
    assert_eq!(handle.frames(), 10);
    assert_eq!(task.borrow().last_ts, 160.0);
    assert!(handle.is_running());
}

#[test]
fn cancel_stops_the_loop() {
    let (sched, task) = setup();
    let handle = start_loop(sched.clone(), task.clone());
    sched.run_frames(3, 16.0);
    handle.cancel();
    assert!(!handle.is_running());
    assert_eq!(sched.pending_frames(), 0);
    sched.run_frames(3, 16.0);
    assert_eq!(task.borrow().frames, 3);
    // second cancel is harmless
    handle.cancel();
}

#[test]
fn dropping_the_handle_stops_the_loop() {
    let (sched, task) = setup();
    {
        let _handle = start_loop(sched.clone(), task.clone());
        sched.run_frames(2, 16.0);
    }
    sched.run_frames(2, 16.0);
    assert_eq!(task.borrow().frames, 2);
    assert_eq!(sched.pending_frames(), 0);
}

#[test]
fn loops_are_independent() {
    let (sched, a) = setup();
    let b = Rc::new(RefCell::new(Counter::default()));
    let ha = start_loop(sched.clone(), a.clone());
    let hb = start_loop(sched.clone(), b.clone());
    sched.run_frames(2, 16.0);
    ha.cancel();
    sched.run_frames(3, 16.0);
    assert_eq!(a.borrow().frames, 2);
    assert_eq!(b.borrow().frames, 5);
    assert!(hb.is_running());
}

#[test]
fn interval_fires_on_period_until_dropped() {
    let sched = Rc::new(ManualScheduler::new());
    let hits = Rc::new(Cell::new(0u32));
    let h = hits.clone();
    let timer = start_interval(sched.clone(), 200, Rc::new(move || h.set(h.get() + 1)));
    assert_eq!(sched.active_intervals(), 1);
    sched.advance_clock(199.0);
    assert_eq!(hits.get(), 0);
    sched.advance_clock(1.0);
    assert_eq!(hits.get(), 1);
    sched.run_frames(50, 16.0);
    assert_eq!(hits.get(), 5);
    assert!(timer.is_running());

    drop(timer);
    assert_eq!(sched.active_intervals(), 0);
    sched.advance_clock(1000.0);
    assert_eq!(hits.get(), 5);
}

/// Host that turns down every request.
struct Refusing;

impl Scheduler for Refusing {
    fn request_frame(&self, _callback: FrameCallback) -> Option<FrameRequest> {
        None
    }

    fn cancel_frame(&self, _request: FrameRequest) {}

    fn start_interval(&self, _period_ms: u32, _callback: IntervalCallback) -> Option<IntervalId> {
        None
    }

    fn stop_interval(&self, _id: IntervalId) {}
}

#[test]
fn refused_frame_request_reports_stopped() {
    let task = Rc::new(RefCell::new(Counter::default()));
    let handle = start_loop(Rc::new(Refusing), task.clone());
    assert!(!handle.is_running());
    assert_eq!(handle.frames(), 0);

    let timer = start_interval(Rc::new(Refusing), 200, Rc::new(|| {}));
    assert!(!timer.is_running());
}

#[test]
fn teardown_releases_the_task_and_scheduler() {
    let (sched, task) = setup();
    let handle = start_loop(sched.clone(), task.clone());
    sched.run_frames(3, 16.0);
    assert!(Rc::strong_count(&task) > 1);

    drop(handle);
    // the cancelled frame callback held the only other reference
    assert_eq!(Rc::strong_count(&task), 1);
    assert_eq!(Rc::strong_count(&sched), 1);
}

#[test]
fn task_may_stop_its_own_loop() {
    struct SelfStopping {
        handle: Option<LoopHandle>,
        frames: u32,
    }

    impl FrameTask for SelfStopping {
        fn frame(&mut self, _timestamp_ms: f64) {
            self.frames += 1;
            if self.frames == 2 {
                if let Some(h) = self.handle.as_ref() {
                    h.cancel();
                }
            }
        }
    }

    let sched = Rc::new(ManualScheduler::new());
    let task = Rc::new(RefCell::new(SelfStopping {
        handle: None,
        frames: 0,
    }));
    let handle = start_loop(sched.clone(), task.clone());
    task.borrow_mut().handle = Some(handle);
    sched.run_frames(5, 16.0);
    assert_eq!(task.borrow().frames, 2);
    assert_eq!(sched.pending_frames(), 0);
    // break the task -> handle -> task cycle
    task.borrow_mut().handle.take();
}
