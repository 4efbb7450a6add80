//! C ABI for hosting the editor core from another runtime.
//!
//! Tracks are passed around as opaque `OspTrackHandle`s created by
//! `osp_track_new_default` / `osp_track_load` and released with
//! `osp_track_free`.
//!
//! Functions:
//! - `osp_track_new_default` / `osp_track_load` / `osp_track_save` / `osp_track_free`
//! - `osp_track_point_count` / `osp_track_total_length`
//! - `osp_track_evaluate` / `osp_track_frame_at`
//! - `osp_track_set_control_point` / `osp_track_set_roll`
//! - `osp_track_append_segment` / `osp_track_remove_last_segment`
//! - `osp_track_mesh_size` / `osp_track_mesh` - rail mesh with default parameters
//! - `osp_motion_step` - advance a cart state
//!
//! # Error Codes
//! - `0`: Success
//! - `-1`: Null pointer
//! - `-2`: Invalid argument (index out of range, non-finite value, bad path)
//! - `-3`: Buffer too small (resize and retry)
//! - `-5`: Invalid format
//! - `-6`: I/O failure

use crate::error::TrackError;
use crate::persistence;
use crate::sim::{Float3, Frame, MotionParams};
use crate::track::{generate_mesh, step, MeshParams, MotionState, Track, Vertex};
use std::ffi::{c_char, CStr};

pub type OspTrackHandle = *mut std::ffi::c_void;

const OK: i32 = 0;
const NULL_POINTER: i32 = -1;
const INVALID_ARGUMENT: i32 = -2;
const BUFFER_TOO_SMALL: i32 = -3;
const INVALID_FORMAT: i32 = -5;
const IO_FAILURE: i32 = -6;

fn error_code(err: &TrackError) -> i32 {
    match err {
        TrackError::Parse(_) | TrackError::LengthMismatch { .. } | TrackError::NonFinite { .. } => {
            INVALID_FORMAT
        }
        TrackError::Io { .. } => IO_FAILURE,
    }
}

fn into_handle(track: Track) -> OspTrackHandle {
    Box::into_raw(Box::new(track)) as OspTrackHandle
}

unsafe fn track_ref<'a>(handle: OspTrackHandle) -> Option<&'a Track> {
    (handle as *const Track).as_ref()
}

unsafe fn track_mut<'a>(handle: OspTrackHandle) -> Option<&'a mut Track> {
    (handle as *mut Track).as_mut()
}

unsafe fn path_str<'a>(path: *const c_char) -> Option<&'a str> {
    CStr::from_ptr(path).to_str().ok()
}

/// Creates the default starter track.
#[no_mangle]
pub extern "C" fn osp_track_new_default() -> OspTrackHandle {
    into_handle(Track::default())
}

/// Loads a YAML track file.
///
/// # Safety
///
/// - `path` must be a valid NUL-terminated string
/// - `out_handle` must be a valid pointer; it receives a handle on success
#[no_mangle]
pub unsafe extern "C" fn osp_track_load(
    path: *const c_char,
    out_handle: *mut OspTrackHandle,
) -> i32 {
    if path.is_null() || out_handle.is_null() {
        return NULL_POINTER;
    }
    let Some(path) = path_str(path) else {
        return INVALID_ARGUMENT;
    };
    match persistence::load(path) {
        Ok(track) => {
            *out_handle = into_handle(track);
            OK
        }
        Err(err) => {
            log::warn!("osp_track_load failed: {err}");
            error_code(&err)
        }
    }
}

/// Saves a track as YAML, replacing `path` atomically.
///
/// # Safety
///
/// - `handle` must come from this library and not be freed
/// - `path` must be a valid NUL-terminated string
#[no_mangle]
pub unsafe extern "C" fn osp_track_save(handle: OspTrackHandle, path: *const c_char) -> i32 {
    if path.is_null() {
        return NULL_POINTER;
    }
    let Some(track) = track_ref(handle) else {
        return NULL_POINTER;
    };
    let Some(path) = path_str(path) else {
        return INVALID_ARGUMENT;
    };
    match persistence::save(track, path) {
        Ok(()) => OK,
        Err(err) => {
            log::warn!("osp_track_save failed: {err}");
            error_code(&err)
        }
    }
}

/// # Safety
///
/// `handle` must be null or come from this library, and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn osp_track_free(handle: OspTrackHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle as *mut Track));
    }
}

/// Number of control points, or `-1` for a null handle.
///
/// # Safety
///
/// `handle` must be null or a live handle from this library.
#[no_mangle]
pub unsafe extern "C" fn osp_track_point_count(handle: OspTrackHandle) -> i64 {
    track_ref(handle).map_or(-1, |track| track.point_count() as i64)
}

/// Total arc length, or `0` for a null handle.
///
/// # Safety
///
/// `handle` must be null or a live handle from this library.
#[no_mangle]
pub unsafe extern "C" fn osp_track_total_length(handle: OspTrackHandle) -> f32 {
    track_ref(handle).map_or(0.0, Track::total_length)
}

/// Position at arc length `s`.
///
/// # Safety
///
/// - `handle` must be a live handle from this library
/// - `out` must be a valid pointer to a `Float3`
#[no_mangle]
pub unsafe extern "C" fn osp_track_evaluate(
    handle: OspTrackHandle,
    s: f32,
    out: *mut Float3,
) -> i32 {
    let Some(track) = track_ref(handle) else {
        return NULL_POINTER;
    };
    if out.is_null() {
        return NULL_POINTER;
    }
    *out = track.evaluate(s);
    OK
}

/// Orientation frame at arc length `s`; `interpolated != 0` blends tangent
/// and roll between control points.
///
/// # Safety
///
/// - `handle` must be a live handle from this library
/// - `out` must be a valid pointer to a `Frame`
#[no_mangle]
pub unsafe extern "C" fn osp_track_frame_at(
    handle: OspTrackHandle,
    s: f32,
    interpolated: u8,
    out: *mut Frame,
) -> i32 {
    let Some(track) = track_ref(handle) else {
        return NULL_POINTER;
    };
    if out.is_null() {
        return NULL_POINTER;
    }
    *out = if interpolated != 0 {
        track.frame_at_interpolated(s)
    } else {
        track.frame_at(s)
    };
    OK
}

/// # Safety
///
/// `handle` must be a live handle from this library.
#[no_mangle]
pub unsafe extern "C" fn osp_track_set_control_point(
    handle: OspTrackHandle,
    index: usize,
    position: Float3,
) -> i32 {
    let Some(track) = track_mut(handle) else {
        return NULL_POINTER;
    };
    if track.mutate_control_point(index, position) {
        OK
    } else {
        INVALID_ARGUMENT
    }
}

/// # Safety
///
/// `handle` must be a live handle from this library.
#[no_mangle]
pub unsafe extern "C" fn osp_track_set_roll(
    handle: OspTrackHandle,
    index: usize,
    degrees: f32,
) -> i32 {
    let Some(track) = track_mut(handle) else {
        return NULL_POINTER;
    };
    if track.set_roll(index, degrees) {
        OK
    } else {
        INVALID_ARGUMENT
    }
}

/// # Safety
///
/// `handle` must be a live handle from this library.
#[no_mangle]
pub unsafe extern "C" fn osp_track_append_segment(handle: OspTrackHandle) -> i32 {
    let Some(track) = track_mut(handle) else {
        return NULL_POINTER;
    };
    if track.append_segment() {
        OK
    } else {
        INVALID_ARGUMENT
    }
}

/// # Safety
///
/// `handle` must be a live handle from this library.
#[no_mangle]
pub unsafe extern "C" fn osp_track_remove_last_segment(handle: OspTrackHandle) -> i32 {
    let Some(track) = track_mut(handle) else {
        return NULL_POINTER;
    };
    if track.remove_last_segment() {
        OK
    } else {
        INVALID_ARGUMENT
    }
}

/// Vertex and index counts of the rail mesh.
///
/// # Safety
///
/// - `handle` must be a live handle from this library
/// - `vertex_count` and `index_count` must be valid pointers
#[no_mangle]
pub unsafe extern "C" fn osp_track_mesh_size(
    handle: OspTrackHandle,
    vertex_count: *mut usize,
    index_count: *mut usize,
) -> i32 {
    let Some(track) = track_ref(handle) else {
        return NULL_POINTER;
    };
    if vertex_count.is_null() || index_count.is_null() {
        return NULL_POINTER;
    }
    let mesh = generate_mesh(track, &MeshParams::default());
    *vertex_count = mesh.vertices.len();
    *index_count = mesh.indices.len();
    OK
}

/// Writes the rail mesh into caller-owned buffers.
///
/// Returns `-3` when either buffer is too small; query
/// `osp_track_mesh_size` first.
///
/// # Safety
///
/// - `handle` must be a live handle from this library
/// - `vertices` must be valid for `vertex_capacity` writes
/// - `indices` must be valid for `index_capacity` writes
#[no_mangle]
pub unsafe extern "C" fn osp_track_mesh(
    handle: OspTrackHandle,
    vertices: *mut Vertex,
    vertex_capacity: usize,
    indices: *mut u32,
    index_capacity: usize,
) -> i32 {
    let Some(track) = track_ref(handle) else {
        return NULL_POINTER;
    };
    let mesh = generate_mesh(track, &MeshParams::default());
    if mesh.vertices.is_empty() {
        return OK;
    }
    if vertices.is_null() || indices.is_null() {
        return NULL_POINTER;
    }
    if mesh.vertices.len() > vertex_capacity || mesh.indices.len() > index_capacity {
        return BUFFER_TOO_SMALL;
    }

    std::ptr::copy_nonoverlapping(mesh.vertices.as_ptr(), vertices, mesh.vertices.len());
    std::ptr::copy_nonoverlapping(mesh.indices.as_ptr(), indices, mesh.indices.len());
    OK
}

/// Advances `state` by `dt` seconds. A null `params` uses the defaults.
///
/// # Safety
///
/// - `handle` must be a live handle from this library
/// - `state` must be a valid pointer to a `MotionState`
/// - `params` must be null or a valid pointer to a `MotionParams`
#[no_mangle]
pub unsafe extern "C" fn osp_motion_step(
    handle: OspTrackHandle,
    state: *mut MotionState,
    params: *const MotionParams,
    dt: f32,
) -> i32 {
    let Some(track) = track_ref(handle) else {
        return NULL_POINTER;
    };
    let Some(state) = state.as_mut() else {
        return NULL_POINTER;
    };
    if !dt.is_finite() {
        return INVALID_ARGUMENT;
    }
    let params = params.as_ref().copied().unwrap_or_default();
    step(track.curve(), state, &params, dt);
    OK
}
