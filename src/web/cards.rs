//! DOM side of the card strip: builds the card wrappers and applies the
//! reveal boundaries the controller computes.

use super::dom::{create_html, js_err, viewport_width};
use crate::core::constants::{
    CARD_FALLBACK_FILL, CARD_IMAGE_URLS, CODE_FONT_SIZE_PX, CODE_LINE_HEIGHT_PX,
};
use crate::core::{code_dimensions, generate_code, CardBounds, CardReveal, StreamTuning, StripSurface};
use rand::Rng;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct CardNodes {
    wrapper: web::HtmlElement,
    plain: web::HtmlElement,
    decoded: web::HtmlElement,
    content: web::HtmlElement,
    image: web::HtmlImageElement,
}

pub struct DomStrip {
    container: web::HtmlElement,
    strip: web::HtmlElement,
    body: Option<web::HtmlElement>,
    speed: Option<web::HtmlElement>,
    cards: Vec<CardNodes>,
    image_fallbacks: Vec<Closure<dyn FnMut()>>,
    last_speed: Option<u32>,
}

impl DomStrip {
    /// Replace the strip's children with `tuning.card_count` fresh cards.
    pub fn build<R: Rng + ?Sized>(
        document: &web::Document,
        container: web::HtmlElement,
        strip: web::HtmlElement,
        speed: Option<web::HtmlElement>,
        tuning: &StreamTuning,
        rng: &mut R,
    ) -> anyhow::Result<Self> {
        strip.set_inner_html("");
        let dims = code_dimensions(tuning.card_width, tuning.card_height);
        let mut cards = Vec::with_capacity(tuning.card_count);
        let mut image_fallbacks = Vec::with_capacity(tuning.card_count);

        for i in 0..tuning.card_count {
            let wrapper = create_html(document, "div", "card-wrapper")?;
            let plain = create_html(document, "div", "card card-normal")?;
            let decoded = create_html(document, "div", "card card-ascii")?;
            let content = create_html(document, "div", "ascii-content")?;

            let image = document
                .create_element("img")
                .map_err(js_err)?
                .dyn_into::<web::HtmlImageElement>()
                .map_err(|e| anyhow::anyhow!("<img> is not an HtmlImageElement: {:?}", e))?;
            image.set_class_name("card-image");
            image.set_alt("Card");
            image.set_src(CARD_IMAGE_URLS[i % CARD_IMAGE_URLS.len()]);

            let fallback = {
                let image = image.clone();
                let plain = plain.clone();
                Closure::wrap(Box::new(move || {
                    _ = image.style().set_property("display", "none");
                    _ = plain.style().set_property("background", CARD_FALLBACK_FILL);
                }) as Box<dyn FnMut()>)
            };
            image.set_onerror(Some(fallback.as_ref().unchecked_ref()));
            image_fallbacks.push(fallback);

            let style = content.style();
            _ = style.set_property("font-size", &format!("{}px", CODE_FONT_SIZE_PX));
            _ = style.set_property("line-height", &format!("{}px", CODE_LINE_HEIGHT_PX));
            content.set_text_content(Some(&generate_code(dims.columns, dims.rows, &mut *rng)));

            plain.append_child(&image).map_err(js_err)?;
            decoded.append_child(&content).map_err(js_err)?;
            wrapper.append_child(&plain).map_err(js_err)?;
            wrapper.append_child(&decoded).map_err(js_err)?;
            strip.append_child(&wrapper).map_err(js_err)?;

            cards.push(CardNodes {
                wrapper,
                plain,
                decoded,
                content,
                image,
            });
        }
        log::info!("[stream] built {} cards", cards.len());

        let body = document.body();
        Ok(Self {
            container,
            strip,
            body,
            speed,
            cards,
            image_fallbacks,
            last_speed: None,
        })
    }
}

impl StripSurface for DomStrip {
    fn container_width(&self) -> f32 {
        self.container.offset_width() as f32
    }

    fn viewport_width(&self) -> f32 {
        viewport_width()
    }

    fn card_count(&self) -> usize {
        self.cards.len()
    }

    fn set_offset(&mut self, offset_px: f32) {
        _ = self
            .strip
            .style()
            .set_property("transform", &format!("translateX({}px)", offset_px));
    }

    fn read_card_bounds(&self, out: &mut Vec<CardBounds>) {
        out.extend(self.cards.iter().map(|c| {
            let rect = c.wrapper.get_bounding_client_rect();
            CardBounds {
                left: rect.left() as f32,
                right: rect.right() as f32,
            }
        }));
    }

    fn write_reveals(&mut self, reveals: &[CardReveal]) {
        for (card, r) in self.cards.iter().zip(reveals) {
            _ = card
                .plain
                .style()
                .set_property("--clip-right", &format!("{}%", r.plain_clip_right));
            _ = card
                .decoded
                .style()
                .set_property("--clip-left", &format!("{}%", r.decoded_clip_left));
            if r.scanned_changed {
                if r.scanned {
                    _ = card.wrapper.set_attribute("data-scanned", "true");
                } else {
                    _ = card.wrapper.remove_attribute("data-scanned");
                }
            }
        }
    }

    fn set_decoded_text(&mut self, index: usize, text: &str) {
        if let Some(card) = self.cards.get(index) {
            card.content.set_text_content(Some(text));
        }
    }

    fn set_dragging(&mut self, dragging: bool) {
        let classes = self.strip.class_list();
        if dragging {
            _ = classes.add_1("dragging");
        } else {
            _ = classes.remove_1("dragging");
        }
        if let Some(body) = &self.body {
            let style = body.style();
            if dragging {
                _ = style.set_property("user-select", "none");
                _ = style.set_property("cursor", "grabbing");
            } else {
                _ = style.remove_property("user-select");
                _ = style.remove_property("cursor");
            }
        }
    }

    fn set_speed_readout(&mut self, velocity: u32) {
        if self.last_speed == Some(velocity) {
            return;
        }
        if let Some(speed) = &self.speed {
            speed.set_text_content(Some(&velocity.to_string()));
        }
        self.last_speed = Some(velocity);
    }
}

impl Drop for DomStrip {
    fn drop(&mut self) {
        // detach before the closures go away
        for card in &self.cards {
            card.image.set_onerror(None);
        }
        self.image_fallbacks.clear();
    }
}
