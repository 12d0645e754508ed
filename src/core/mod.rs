pub mod ambient;
pub mod beam;
pub mod codegen;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod reveal;
pub mod schedule;
pub mod strip;

pub use ambient::*;
pub use beam::*;
pub use codegen::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use reveal::*;
pub use schedule::*;
pub use strip::*;

// Shaders bundled as string constants
pub static AMBIENT_WGSL: &str = include_str!("../../shaders/ambient.wgsl");
