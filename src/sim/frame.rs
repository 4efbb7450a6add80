use super::math::{Float3, Quaternion};
use super::physics::{PARALLEL_THRESHOLD, UP_DIR};

/// Orthonormal orientation frame at a position on the track.
///
/// - `forward`: direction of travel (track tangent)
/// - `right`: lateral axis, rolled about `forward`
/// - `up`: `-(forward x right)`, pointing away from the track floor
///
/// C-compatible layout for FFI.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub position: Float3,
    pub right: Float3,
    pub up: Float3,
    pub forward: Float3,
}

impl Frame {
    pub const fn new(position: Float3, right: Float3, up: Float3, forward: Float3) -> Self {
        Self {
            position,
            right,
            up,
            forward,
        }
    }

    /// Builds a frame from a travel direction and a roll angle in degrees.
    ///
    /// The unrolled right vector is `forward x UP_DIR`. When `forward` is
    /// within [`PARALLEL_THRESHOLD`] of the up axis that cross product
    /// collapses, so `+X` is used as the reference axis instead. A zero
    /// `forward` yields the default orientation.
    pub fn from_forward_and_roll(position: Float3, forward: Float3, roll_degrees: f32) -> Self {
        let forward = forward.normalize();
        if forward == Float3::ZERO {
            return Self {
                position,
                ..Self::DEFAULT
            };
        }

        let reference = if forward.dot(UP_DIR).abs() > PARALLEL_THRESHOLD {
            Float3::RIGHT
        } else {
            UP_DIR
        };

        let unrolled = forward.cross(reference).normalize();
        let rotation = Quaternion::from_axis_angle(forward, roll_degrees.to_radians());
        let right = rotation.mul_vec(unrolled).normalize();
        let up = -forward.cross(right).normalize();

        Self::new(position, right, up, forward)
    }

    /// Point in the frame's cross-section plane.
    pub fn offset(&self, lateral: f32, vertical: f32) -> Float3 {
        self.position + self.right * lateral + self.up * vertical
    }

    /// Column-major 4x4 model matrix: columns are right, up, forward, position.
    pub fn to_matrix(&self) -> [[f32; 4]; 4] {
        let column = |v: Float3, w: f32| [v.x, v.y, v.z, w];
        [
            column(self.right, 0.0),
            column(self.up, 0.0),
            column(self.forward, 0.0),
            column(self.position, 1.0),
        ]
    }

    pub const DEFAULT: Self = Self::new(Float3::ZERO, Float3::RIGHT, Float3::UP, Float3::BACK);
}

impl Default for Frame {
    fn default() -> Self {
        Self::DEFAULT
    }
}
