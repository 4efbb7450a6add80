//! OspEngine - track curves, orientation frames and cart motion for an
//! interactive rollercoaster editor.
//!
//! # Architecture
//!
//! Layered modules with strict inward-only dependencies:
//!
//! - **sim**: Math/physics primitives (Float3, Frame, MotionParams)
//! - **track**: Curve model, frames, track document, motion, meshing, picking
//! - **persistence**: YAML track files
//! - **editor**: Editing session for a host event loop
//! - **ffi**: C FFI bindings
//!
//! # Usage
//!
//! ```ignore
//! use ospengine::{Editor, EditorConfig};
//!
//! let mut editor = Editor::new(EditorConfig::default());
//! editor.append_segment();
//! let u = editor.tick(1.0 / 60.0);
//! ```
//!
//! For C hosts, build with the `ffi` feature, link the cdylib and use the
//! `osp_*` functions.

pub mod editor;
pub mod error;
pub mod persistence;
pub mod sim;
pub mod track;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types at crate root
pub use editor::{Editor, EditorConfig};
pub use error::{Result, TrackError};
pub use sim::{Float2, Float3, Frame, MotionParams};
pub use track::{MeshData, MeshParams, MotionState, PiecewiseLinearCurve, Track};
