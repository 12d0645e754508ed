//! Landing-page scanner section: a light-beam particle field, an ambient
//! point field and a draggable card strip whose cards flip to a decoded face
//! as they cross the beam.
//!
//! Everything under [`core`] is platform-free and testable natively; the
//! browser glue only builds for `wasm32`.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::ScannerSection;
