//! Math and physics primitives for track evaluation.
//!
//! Plain `Copy` types with no knowledge of curves or documents.

mod frame;
mod math;
mod physics_params;

pub mod physics;

pub use frame::Frame;
pub use math::{Float2, Float3, Quaternion};
pub use physics::{delta_degrees, wrap_degrees, G, GRAVITY, UP_DIR};
pub use physics_params::MotionParams;
