//! Browser glue: mounts the three scanner components onto host elements and
//! owns every loop, timer and listener they register.

use crate::core::{
    start_interval, start_loop, AmbientParticleField, BeamParticleField, CardStreamController,
    IntervalHandle, LoopHandle, ScannerConfig, ScannerError, Scheduler,
};
use rand::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod cards;
mod dom;
mod events;
mod render;
mod scheduler;

use cards::DomStrip;
use dom::{viewport_width, window_document, EventListener};
use events::SharedStream;
use scheduler::WebScheduler;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Info);
    log::info!("card-scanner ready");
}

struct StreamMount {
    controller: SharedStream,
    frame_loop: LoopHandle,
    regen: IntervalHandle,
    listeners: Vec<EventListener>,
}

struct BeamMount {
    frame_loop: LoopHandle,
    listeners: Vec<EventListener>,
}

struct AmbientMount {
    frame_loop: LoopHandle,
    listeners: Vec<EventListener>,
}

struct HostElements {
    beam_canvas: web::HtmlCanvasElement,
    ambient_canvas: web::HtmlCanvasElement,
    container: web::HtmlElement,
    strip: web::HtmlElement,
    speed: Option<web::HtmlElement>,
}

struct Mounted {
    beam: Option<BeamMount>,
    stream: Option<StreamMount>,
    ambient: Rc<RefCell<Option<AmbientMount>>>,
    torn_down: Rc<Cell<bool>>,
}

impl Mounted {
    fn teardown(&mut self) {
        self.torn_down.set(true);
        // loops and timers first, then listeners, so nothing fires mid-teardown
        if let Some(stream) = self.stream.take() {
            stream.frame_loop.cancel();
            stream.regen.cancel();
            drop(stream.listeners);
        }
        if let Some(beam) = self.beam.take() {
            beam.frame_loop.cancel();
            drop(beam.listeners);
        }
        if let Some(ambient) = self.ambient.borrow_mut().take() {
            ambient.frame_loop.cancel();
            drop(ambient.listeners);
        }
        log::info!("[scanner] torn down");
    }
}

fn mount_beam(
    scheduler: &Rc<dyn Scheduler>,
    window: &web::Window,
    document: &web::Document,
    canvas: web::HtmlCanvasElement,
    field: Rc<RefCell<BeamParticleField>>,
) -> Result<BeamMount, ScannerError> {
    let renderer = Rc::new(RefCell::new(render::BeamCanvas::new(document, canvas, field)?));
    let mut listeners = Vec::with_capacity(1);
    let r = renderer.clone();
    match events::on_resize(window, move |w| r.borrow_mut().resize(w)) {
        Ok(l) => listeners.push(l),
        Err(e) => log::warn!("[beam] resize hook: {:?}", e),
    }
    let frame_loop = start_loop(scheduler.clone(), renderer);
    Ok(BeamMount {
        frame_loop,
        listeners,
    })
}

fn mount_stream(
    scheduler: &Rc<dyn Scheduler>,
    window: &web::Window,
    document: &web::Document,
    hosts: &HostElements,
    beam: Rc<RefCell<BeamParticleField>>,
    config: &ScannerConfig,
) -> anyhow::Result<StreamMount> {
    if hosts.container.offset_width() <= 0 {
        return Err(ScannerError::EmptyContainer.into());
    }
    let mut rng = StdRng::from_entropy();
    let surface = DomStrip::build(
        document,
        hosts.container.clone(),
        hosts.strip.clone(),
        hosts.speed.clone(),
        &config.stream,
        &mut rng,
    )?;
    let controller: SharedStream = Rc::new(RefCell::new(CardStreamController::new(
        surface,
        beam,
        config.stream.clone(),
        rng.gen(),
    )?));

    let mut listeners = events::wire_stream_input(&controller, &hosts.strip, document)?;
    {
        let c = controller.clone();
        let container = hosts.container.clone();
        listeners.push(events::on_resize(window, move |_| {
            c.borrow_mut().resize(container.offset_width() as f32);
        })?);
    }

    let frame_loop = start_loop(scheduler.clone(), controller.clone());
    let regen = {
        let c = controller.clone();
        start_interval(
            scheduler.clone(),
            config.stream.regen_interval_ms,
            Rc::new(move || {
                c.borrow_mut().regenerate_faces();
            }),
        )
    };
    Ok(StreamMount {
        controller,
        frame_loop,
        regen,
        listeners,
    })
}

/// GPU setup is async; the result lands in `slot` unless teardown won the race.
fn mount_ambient(
    scheduler: Rc<dyn Scheduler>,
    canvas: web::HtmlCanvasElement,
    config: &ScannerConfig,
    slot: Rc<RefCell<Option<AmbientMount>>>,
    torn_down: Rc<Cell<bool>>,
) {
    let field = AmbientParticleField::new(viewport_width(), config.ambient.clone(), random());
    canvas.set_width(field.width().max(1.0) as u32);
    canvas.set_height(field.height().max(1.0) as u32);
    let capacity = field.particles().len();
    spawn_local(async move {
        let gpu = match render::PointRenderer::new(canvas.clone(), capacity).await {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("[ambient] renderer unavailable: {:?}", e);
                return;
            }
        };
        if torn_down.get() {
            return;
        }
        let task = Rc::new(RefCell::new(render::AmbientTask::new(field, gpu, canvas)));
        let mut listeners = Vec::with_capacity(1);
        if let Some(window) = web::window() {
            let t = task.clone();
            match events::on_resize(&window, move |w| t.borrow_mut().resize(w)) {
                Ok(l) => listeners.push(l),
                Err(e) => log::warn!("[ambient] resize hook: {:?}", e),
            }
        }
        let frame_loop = start_loop(scheduler, task);
        *slot.borrow_mut() = Some(AmbientMount {
            frame_loop,
            listeners,
        });
    });
}

fn mount_all(hosts: HostElements) -> Mounted {
    let ambient = Rc::new(RefCell::new(None));
    let torn_down = Rc::new(Cell::new(false));
    let mut mounted = Mounted {
        beam: None,
        stream: None,
        ambient: ambient.clone(),
        torn_down: torn_down.clone(),
    };

    let config = ScannerConfig::default();
    if let Err(e) = config.validate() {
        log::error!("[scanner] {}", e);
        return mounted;
    }
    let (Some(window), Some(document)) = (web::window(), window_document()) else {
        log::error!("[scanner] no window/document");
        return mounted;
    };
    let scheduler: Rc<dyn Scheduler> = Rc::new(WebScheduler::default());

    let beam_field = Rc::new(RefCell::new(BeamParticleField::new(
        viewport_width(),
        config.beam.clone(),
        random(),
    )));
    match mount_beam(
        &scheduler,
        &window,
        &document,
        hosts.beam_canvas.clone(),
        beam_field.clone(),
    ) {
        Ok(beam) => mounted.beam = Some(beam),
        // the stream still runs; its scanning signal just has no visible effect
        Err(e) => log::error!("[beam] {}; beam stays dark", e),
    }

    match mount_stream(&scheduler, &window, &document, &hosts, beam_field, &config) {
        Ok(stream) => mounted.stream = Some(stream),
        Err(e) => log::warn!("[stream] not started: {}", e),
    }

    mount_ambient(
        scheduler,
        hosts.ambient_canvas.clone(),
        &config,
        ambient,
        torn_down,
    );
    mounted
}

fn by_id<T: JsCast>(document: &web::Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("#{} not found", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{} has the wrong element type", id)))
}

/// Host-facing handle for one mounted scanner section.
#[wasm_bindgen]
pub struct ScannerSection {
    inner: Option<Mounted>,
}

impl ScannerSection {
    fn stream(&self) -> Option<&SharedStream> {
        self.inner.as_ref()?.stream.as_ref().map(|s| &s.controller)
    }
}

#[wasm_bindgen]
impl ScannerSection {
    pub fn mount(
        beam_canvas: web::HtmlCanvasElement,
        ambient_canvas: web::HtmlCanvasElement,
        container: web::HtmlElement,
        strip: web::HtmlElement,
        speed_indicator: Option<web::HtmlElement>,
    ) -> ScannerSection {
        let mounted = mount_all(HostElements {
            beam_canvas,
            ambient_canvas,
            container,
            strip,
            speed: speed_indicator,
        });
        ScannerSection {
            inner: Some(mounted),
        }
    }

    /// Mount onto the conventional element ids.
    #[wasm_bindgen(js_name = mountByIds)]
    pub fn mount_by_ids() -> Result<ScannerSection, JsValue> {
        let document = window_document().ok_or_else(|| JsValue::from_str("no document"))?;
        let speed = by_id::<web::HtmlElement>(&document, "speedIndicator").ok();
        Ok(Self::mount(
            by_id(&document, "scannerCanvas")?,
            by_id(&document, "particleCanvas")?,
            by_id(&document, "cardStream")?,
            by_id(&document, "cardLine")?,
            speed,
        ))
    }

    /// Returns whether auto drift is now running.
    #[wasm_bindgen(js_name = toggleAnimation)]
    pub fn toggle_animation(&self) -> bool {
        self.stream()
            .map(|c| c.borrow_mut().toggle_animation())
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = resetPosition)]
    pub fn reset_position(&self) {
        if let Some(c) = self.stream() {
            c.borrow_mut().reset_position();
        }
    }

    #[wasm_bindgen(js_name = changeDirection)]
    pub fn change_direction(&self) {
        if let Some(c) = self.stream() {
            let dir = c.borrow_mut().change_direction();
            log::debug!("[stream] direction now {:?}", dir);
        }
    }

    /// Stop everything and release every listener. Safe to call twice.
    pub fn destroy(&mut self) {
        if let Some(mut mounted) = self.inner.take() {
            mounted.teardown();
        }
    }
}

impl Drop for ScannerSection {
    fn drop(&mut self) {
        self.destroy();
    }
}
