//! Track geometry, orientation, motion and rail meshes.
//!
//! A [`Track`] owns a [`PiecewiseLinearCurve`] and per-point roll. Frames,
//! cart motion and mesh generation are free functions over it.

mod curve;
mod document;
mod frames;
mod mesh;
mod motion;
mod pick;

pub use curve::{CurveSample, PiecewiseLinearCurve};
pub use document::Track;
pub use frames::{frame_at, frame_at_interpolated};
pub use mesh::{generate_mesh, MeshData, MeshParams, Vertex};
pub use motion::{step, MotionState};
pub use pick::{hovered_control_point, nearest_control_point, ScreenProjection};
