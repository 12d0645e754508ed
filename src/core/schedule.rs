//! Frame loops and timers behind an injectable scheduler.
//!
//! Each component runs one self-rescheduling loop owned through a single
//! handle. Dropping or cancelling the handle stops the loop; nothing relies on
//! a global animation-frame registry. The browser scheduler lives in the web
//! glue; [`ManualScheduler`] drives loops headlessly.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Timestamp in milliseconds, as handed to animation-frame callbacks.
pub type FrameCallback = Rc<dyn Fn(f64)>;
pub type IntervalCallback = Rc<dyn Fn()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntervalId(pub i32);

pub trait Scheduler {
    /// Run `callback` once on the next frame. `None` if the host refused.
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameRequest>;
    fn cancel_frame(&self, request: FrameRequest);
    fn start_interval(&self, period_ms: u32, callback: IntervalCallback) -> Option<IntervalId>;
    fn stop_interval(&self, id: IntervalId);
}

/// Work done once per frame.
pub trait FrameTask {
    fn frame(&mut self, timestamp_ms: f64);
}

struct LoopState {
    scheduler: Rc<dyn Scheduler>,
    task: Rc<RefCell<dyn FrameTask>>,
    pending: Cell<Option<FrameRequest>>,
    cancelled: Cell<bool>,
    frames: Cell<u64>,
}

impl LoopState {
    fn schedule(self: &Rc<Self>) {
        let next = Rc::clone(self);
        let cb: FrameCallback = Rc::new(move |ts| next.run(ts));
        let req = self.scheduler.request_frame(cb);
        if req.is_none() {
            log::error!("[loop] frame request refused; loop stopped");
            self.cancelled.set(true);
        }
        self.pending.set(req);
    }

    fn run(self: &Rc<Self>, timestamp_ms: f64) {
        if self.cancelled.get() {
            return;
        }
        self.pending.set(None);
        self.task.borrow_mut().frame(timestamp_ms);
        self.frames.set(self.frames.get() + 1);
        // the task itself may have torn the loop down
        if !self.cancelled.get() {
            self.schedule();
        }
    }

    fn cancel(&self) {
        if self.cancelled.replace(true) {
            return;
        }
        if let Some(req) = self.pending.take() {
            self.scheduler.cancel_frame(req);
        }
    }
}

/// Owned handle to a running frame loop. Dropping it cancels the loop.
pub struct LoopHandle {
    state: Rc<LoopState>,
}

impl LoopHandle {
    pub fn cancel(&self) {
        self.state.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.state.cancelled.get()
    }

    /// Frames delivered so far.
    pub fn frames(&self) -> u64 {
        self.state.frames.get()
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        self.state.cancel();
    }
}

/// Schedule `task` every frame until the returned handle is cancelled.
pub fn start_loop(scheduler: Rc<dyn Scheduler>, task: Rc<RefCell<dyn FrameTask>>) -> LoopHandle {
    let state = Rc::new(LoopState {
        scheduler,
        task,
        pending: Cell::new(None),
        cancelled: Cell::new(false),
        frames: Cell::new(0),
    });
    state.schedule();
    LoopHandle { state }
}

/// Owned handle to a periodic timer. Dropping it stops the timer.
pub struct IntervalHandle {
    scheduler: Rc<dyn Scheduler>,
    id: Cell<Option<IntervalId>>,
}

impl IntervalHandle {
    pub fn cancel(&self) {
        if let Some(id) = self.id.take() {
            self.scheduler.stop_interval(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.id.get().is_some()
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub fn start_interval(
    scheduler: Rc<dyn Scheduler>,
    period_ms: u32,
    callback: IntervalCallback,
) -> IntervalHandle {
    let id = scheduler.start_interval(period_ms, callback);
    if id.is_none() {
        log::error!("[timer] interval refused by host");
    }
    IntervalHandle {
        scheduler,
        id: Cell::new(id),
    }
}

struct ManualInterval {
    id: IntervalId,
    period_ms: f64,
    next_due_ms: f64,
    callback: IntervalCallback,
}

/// Deterministic scheduler: frames run when asked, the clock moves only when
/// advanced. Used for headless runs and tests.
#[derive(Default)]
pub struct ManualScheduler {
    next_id: Cell<i32>,
    now_ms: Cell<f64>,
    frames: RefCell<Vec<(FrameRequest, FrameCallback)>>,
    intervals: RefCell<Vec<ManualInterval>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&self) -> i32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn active_intervals(&self) -> usize {
        self.intervals.borrow().len()
    }

    /// Advance the clock by `frame_ms`, fire due intervals, then deliver every
    /// frame callback queued before this call. Returns the frames delivered.
    pub fn run_frame(&self, frame_ms: f64) -> usize {
        self.advance_clock(frame_ms);
        let due: Vec<_> = self.frames.borrow_mut().drain(..).collect();
        let now = self.now_ms.get();
        for (_, cb) in &due {
            cb(now);
        }
        due.len()
    }

    pub fn run_frames(&self, count: usize, frame_ms: f64) {
        for _ in 0..count {
            self.run_frame(frame_ms);
        }
    }

    /// Move the clock forward, firing intervals as they come due.
    pub fn advance_clock(&self, ms: f64) {
        let target = self.now_ms.get() + ms.max(0.0);
        loop {
            let next = {
                let intervals = self.intervals.borrow();
                intervals
                    .iter()
                    .filter(|iv| iv.next_due_ms <= target)
                    .min_by(|a, b| a.next_due_ms.total_cmp(&b.next_due_ms))
                    .map(|iv| (iv.id, iv.next_due_ms, Rc::clone(&iv.callback)))
            };
            let Some((id, due_ms, cb)) = next else { break };
            self.now_ms.set(due_ms);
            if let Some(iv) = self.intervals.borrow_mut().iter_mut().find(|iv| iv.id == id) {
                iv.next_due_ms += iv.period_ms;
            }
            cb();
        }
        self.now_ms.set(target);
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameRequest> {
        let req = FrameRequest(self.fresh_id());
        self.frames.borrow_mut().push((req, callback));
        Some(req)
    }

    fn cancel_frame(&self, request: FrameRequest) {
        self.frames.borrow_mut().retain(|(r, _)| *r != request);
    }

    fn start_interval(&self, period_ms: u32, callback: IntervalCallback) -> Option<IntervalId> {
        let id = IntervalId(self.fresh_id());
        let period_ms = f64::from(period_ms.max(1));
        self.intervals.borrow_mut().push(ManualInterval {
            id,
            period_ms,
            next_due_ms: self.now_ms.get() + period_ms,
            callback,
        });
        Some(id)
    }

    fn stop_interval(&self, id: IntervalId) {
        self.intervals.borrow_mut().retain(|iv| iv.id != id);
    }
}
