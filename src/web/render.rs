mod ambient;
mod beam;
mod helpers;

pub use ambient::{AmbientTask, PointRenderer};
pub use beam::BeamCanvas;
