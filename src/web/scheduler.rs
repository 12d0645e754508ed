use crate::core::{FrameCallback, FrameRequest, IntervalCallback, IntervalId, Scheduler};
use fnv::FnvHashMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `requestAnimationFrame` / `setInterval` backed scheduler.
///
/// Every closure handed to the browser is owned here, keyed by its request or
/// interval id. A cancelled frame drops its closure, and with it whatever the
/// callback captured. A fired frame records its id and is swept on the next
/// request, once it has returned.
#[derive(Default)]
pub struct WebScheduler {
    frames: RefCell<FnvHashMap<i32, Closure<dyn FnMut(f64)>>>,
    fired: Rc<RefCell<Vec<i32>>>,
    intervals: RefCell<FnvHashMap<i32, Closure<dyn FnMut()>>>,
}

impl WebScheduler {
    fn sweep_fired(&self) {
        let ids: Vec<i32> = self.fired.borrow_mut().drain(..).collect();
        let spent: Vec<_> = {
            let mut frames = self.frames.borrow_mut();
            ids.iter().filter_map(|id| frames.remove(id)).collect()
        };
        drop(spent);
    }
}

impl Scheduler for WebScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameRequest> {
        let window = web::window()?;
        self.sweep_fired();

        let id = Rc::new(Cell::new(0));
        let closure: Closure<dyn FnMut(f64)> = {
            let (id, fired) = (Rc::clone(&id), Rc::clone(&self.fired));
            Closure::once(move |ts: f64| {
                callback(ts);
                fired.borrow_mut().push(id.get());
            })
        };
        let req = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok()?;
        id.set(req);
        self.frames.borrow_mut().insert(req, closure);
        Some(FrameRequest(req))
    }

    fn cancel_frame(&self, request: FrameRequest) {
        if let Some(w) = web::window() {
            _ = w.cancel_animation_frame(request.0);
        }
        let closure = self.frames.borrow_mut().remove(&request.0);
        drop(closure);
    }

    fn start_interval(&self, period_ms: u32, callback: IntervalCallback) -> Option<IntervalId> {
        let window = web::window()?;
        let closure = Closure::wrap(Box::new(move || callback()) as Box<dyn FnMut()>);
        let id = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms.min(i32::MAX as u32) as i32,
            )
            .ok()?;
        self.intervals.borrow_mut().insert(id, closure);
        Some(IntervalId(id))
    }

    fn stop_interval(&self, id: IntervalId) {
        if let Some(w) = web::window() {
            w.clear_interval_with_handle(id.0);
        }
        let closure = self.intervals.borrow_mut().remove(&id.0);
        drop(closure);
    }
}
