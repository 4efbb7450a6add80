use super::math::Float3;

pub const G: f32 = 9.80665;
pub const GRAVITY: Float3 = Float3::new(0.0, -G, 0.0);

/// World up axis (Y-up).
pub const UP_DIR: Float3 = Float3::UP;

/// `|dot(forward, UP_DIR)|` above which frame construction swaps reference axis.
pub const PARALLEL_THRESHOLD: f32 = 0.99;

/// Accelerations below this are integrated as uniform motion.
pub const ACCEL_EPSILON: f32 = 1e-6;
pub const VELOCITY_EPSILON: f32 = 1e-6;
pub const LENGTH_EPSILON: f32 = 1e-5;
pub const TIME_EPSILON: f32 = 1e-7;

/// Upper bound on segment-boundary crossings resolved in a single step.
pub const MAX_BOUNDARY_CROSSINGS: usize = 4096;

/// Wraps an angle in degrees into `(-180, 180]`.
pub fn wrap_degrees(degrees: f32) -> f32 {
    if degrees > -180.0 && degrees <= 180.0 {
        return degrees;
    }
    let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Shortest signed angular difference `to - from`, in degrees.
pub fn delta_degrees(from: f32, to: f32) -> f32 {
    wrap_degrees(to - from)
}
