use super::cards::DomStrip;
use super::dom::EventListener;
use crate::core::CardStreamController;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SharedStream = Rc<RefCell<CardStreamController<DomStrip>>>;

#[inline]
fn first_touch_x(ev: &web::Event) -> Option<f32> {
    let te = ev.dyn_ref::<web::TouchEvent>()?;
    te.touches().get(0).map(|t| t.client_x() as f32)
}

#[inline]
fn mouse_x(ev: &web::Event) -> Option<f32> {
    ev.dyn_ref::<web::MouseEvent>().map(|me| me.client_x() as f32)
}

/// Pointer, touch and wheel input for the strip. Presses start on the strip;
/// moves and releases are tracked on the document so a drag survives leaving
/// the strip.
pub fn wire_stream_input(
    stream: &SharedStream,
    strip: &web::HtmlElement,
    document: &web::Document,
) -> anyhow::Result<Vec<EventListener>> {
    let mut listeners = Vec::with_capacity(8);

    {
        let s = stream.clone();
        listeners.push(EventListener::new(strip, "mousedown", move |ev| {
            if let Some(x) = mouse_x(&ev) {
                s.borrow_mut().begin_drag(x, ev.time_stamp());
            }
        })?);
    }
    {
        let s = stream.clone();
        listeners.push(EventListener::new(document, "mousemove", move |ev| {
            if let Some(x) = mouse_x(&ev) {
                s.borrow_mut().drag_to(x, ev.time_stamp());
            }
        })?);
    }
    {
        let s = stream.clone();
        listeners.push(EventListener::new(document, "mouseup", move |_ev| {
            s.borrow_mut().end_drag();
        })?);
    }
    {
        let s = stream.clone();
        listeners.push(EventListener::new_active(strip, "touchstart", move |ev| {
            if let Some(x) = first_touch_x(&ev) {
                s.borrow_mut().begin_drag(x, ev.time_stamp());
            }
        })?);
    }
    {
        let s = stream.clone();
        listeners.push(EventListener::new_active(document, "touchmove", move |ev| {
            if let Some(x) = first_touch_x(&ev) {
                s.borrow_mut().drag_to(x, ev.time_stamp());
            }
        })?);
    }
    {
        let s = stream.clone();
        listeners.push(EventListener::new(document, "touchend", move |_ev| {
            s.borrow_mut().end_drag();
        })?);
    }
    {
        let s = stream.clone();
        listeners.push(EventListener::new_active(strip, "wheel", move |ev| {
            ev.prevent_default();
            if let Some(we) = ev.dyn_ref::<web::WheelEvent>() {
                s.borrow_mut().wheel(we.delta_x() as f32, we.delta_y() as f32);
            }
        })?);
    }
    // native image dragging would steal the gesture
    listeners.push(EventListener::new(strip, "dragstart", |ev| {
        ev.prevent_default();
    })?);

    Ok(listeners)
}

/// Window resize hook shared by all three components.
pub fn on_resize(
    window: &web::Window,
    mut handler: impl FnMut(f32) + 'static,
) -> anyhow::Result<EventListener> {
    EventListener::new(window, "resize", move |_ev| {
        handler(super::dom::viewport_width());
    })
}
