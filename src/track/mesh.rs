//! CPU-side rail geometry.
//!
//! Each rail is a tube swept along interpolated track frames. Buffers are
//! plain vectors; uploading them is the renderer's job.

use super::document::Track;
use crate::sim::Float3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Vertex layout shared with the renderer's vertex shader.
/// C-compatible layout for FFI.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: Float3,
    pub color: Float3,
    pub tex_coord: [f32; 2],
    pub normal: Float3,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshParams {
    /// Lateral offset of each rail from the centreline, along `right`.
    pub rail_offsets: Vec<f32>,
    pub rail_radius: f32,
    pub radial_segments: u32,
    /// Frames sampled per segment; the last point is always added.
    pub samples_per_segment: u32,
    pub color: Float3,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            rail_offsets: vec![-0.1, 0.1],
            rail_radius: 0.02,
            radial_segments: 8,
            samples_per_segment: 4,
            color: Float3::new(170.0 / 256.0, 50.0 / 256.0, 50.0 / 256.0),
        }
    }
}

/// Arc-length stations at which frames are sampled.
fn stations(track: &Track, samples_per_segment: u32) -> Vec<f32> {
    let curve = track.curve();
    let per_segment = samples_per_segment.max(1);
    let mut result = Vec::with_capacity(curve.segment_count() * per_segment as usize + 1);

    for (i, &length) in curve.segment_lengths().iter().enumerate() {
        if length <= 0.0 {
            continue;
        }
        let start = curve.segment_start(i);
        for j in 0..per_segment {
            result.push(start + length * j as f32 / per_segment as f32);
        }
    }
    result.push(curve.total_length());
    result
}

/// Builds tube geometry for every rail in `params`.
///
/// Returns an empty mesh for tracks with fewer than two control points.
pub fn generate_mesh(track: &Track, params: &MeshParams) -> MeshData {
    let mut mesh = MeshData::default();
    let curve = track.curve();
    if curve.segment_count() == 0 || curve.total_length() <= 0.0 || params.radial_segments < 3 {
        return mesh;
    }

    let stations = stations(track, params.samples_per_segment);
    let frames: Vec<_> = stations
        .iter()
        .map(|&s| (curve.arc_length_to_normalized(s), track.frame_at_interpolated(s)))
        .collect();

    let ring = params.radial_segments;
    let rings_per_rail = frames.len() as u32;
    mesh.vertices
        .reserve(params.rail_offsets.len() * (ring * rings_per_rail) as usize);
    mesh.indices
        .reserve(params.rail_offsets.len() * (6 * ring * (rings_per_rail - 1)) as usize);

    for &offset in &params.rail_offsets {
        let base = mesh.vertices.len() as u32;

        for (u, frame) in &frames {
            let center = frame.offset(offset, 0.0);
            for k in 0..ring {
                let fraction = k as f32 / ring as f32;
                let (sin, cos) = (fraction * TAU).sin_cos();
                let radial = frame.right * cos + frame.up * sin;
                mesh.vertices.push(Vertex {
                    position: center + radial * params.rail_radius,
                    color: params.color,
                    tex_coord: [*u, fraction],
                    normal: radial.normalize(),
                });
            }
        }

        for r in 0..rings_per_rail - 1 {
            let current = base + r * ring;
            let next = current + ring;
            for k in 0..ring {
                let k1 = (k + 1) % ring;
                mesh.indices
                    .extend_from_slice(&[current + k, current + k1, next + k1]);
                mesh.indices
                    .extend_from_slice(&[next + k1, next + k, current + k]);
            }
        }
    }

    log::debug!(
        "generated rail mesh: {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    mesh
}
