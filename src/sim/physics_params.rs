use super::math::Float3;
use super::physics::GRAVITY;
use serde::{Deserialize, Serialize};

/// Tunables for the cart integrator.
///
/// `acceleration_scale` multiplies the gravity component along the
/// current segment; it is the editor's "how fast does the cart feel" knob,
/// not a physical constant.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    pub gravity: Float3,
    pub acceleration_scale: f32,
}

impl MotionParams {
    pub fn new(gravity: Float3, acceleration_scale: f32) -> Self {
        Self {
            gravity,
            acceleration_scale,
        }
    }

    /// Tangential acceleration on a straight segment with unit `direction`.
    pub fn acceleration_along(&self, direction: Float3) -> f32 {
        self.acceleration_scale * self.gravity.dot(direction)
    }
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            acceleration_scale: 0.01,
        }
    }
}
