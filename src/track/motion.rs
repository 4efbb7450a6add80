//! Cart motion along the track.
//!
//! Each segment is treated as a straight incline with constant tangential
//! acceleration `k * dot(gravity, segment_direction)`. Within a segment the
//! motion is solved in closed form; segment-boundary crossing times come
//! from the quadratic `v t + a t^2 / 2 = d`.

use super::curve::PiecewiseLinearCurve;
use crate::sim::physics::{
    ACCEL_EPSILON, LENGTH_EPSILON, MAX_BOUNDARY_CROSSINGS, TIME_EPSILON, VELOCITY_EPSILON,
};
use crate::sim::MotionParams;

/// Arc-length position and signed velocity of the cart.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MotionState {
    pub s: f32,
    pub v: f32,
}

impl MotionState {
    pub const fn new(s: f32, v: f32) -> Self {
        Self { s, v }
    }

    pub const REST: Self = Self::new(0.0, 0.0);
}

/// Advances `state` by `dt` seconds.
///
/// The cart stops dead (`v = 0`) when it reaches either end of the track.
/// On a curve without segments the state is reset to rest.
pub fn step(curve: &PiecewiseLinearCurve, state: &mut MotionState, params: &MotionParams, dt: f32) {
    let total = curve.total_length();
    if curve.segment_count() == 0 || total <= 0.0 {
        *state = MotionState::REST;
        return;
    }
    if !(dt > 0.0) {
        return;
    }

    let last = curve.segment_count() - 1;
    let accel = |segment: usize| params.acceleration_along(curve.segment_direction(segment));

    let mut remaining = dt;
    let mut crossings = 0;

    while remaining > TIME_EPSILON {
        state.s = state.s.clamp(0.0, total);

        if state.s >= total - LENGTH_EPSILON && heading_forward(state.v, accel(last)) {
            *state = MotionState::new(total, 0.0);
            return;
        }
        if state.s <= LENGTH_EPSILON && heading_forward(-state.v, -accel(0)) {
            *state = MotionState::new(0.0, 0.0);
            return;
        }

        crossings += 1;
        if crossings > MAX_BOUNDARY_CROSSINGS {
            log::warn!(
                "motion step hit {MAX_BOUNDARY_CROSSINGS} boundary crossings at s = {:.4}, stopping cart",
                state.s
            );
            state.v = 0.0;
            return;
        }

        let segment = governing_segment(curve, state, &accel);
        let start = curve.segment_start(segment);
        let end = curve.segment_end(segment);
        let a = accel(segment);
        let (s0, v0) = (state.s, state.v);

        let hit_end = time_to_reach(end - s0, v0, a);
        let hit_start = time_to_reach(start - s0, v0, a);
        let hit = match (hit_end, hit_start) {
            (Some(te), Some(ts)) if ts < te => Some((ts, start)),
            (Some(te), _) => Some((te, end)),
            (None, Some(ts)) => Some((ts, start)),
            (None, None) => None,
        };

        match hit {
            Some((t_hit, boundary)) if t_hit <= remaining => {
                state.s = boundary;
                state.v = v0 + a * t_hit;
                remaining -= t_hit;
            }
            _ => {
                let t = remaining;
                let s1 = s0 + v0 * t + 0.5 * a * t * t;
                let v1 = v0 + a * t;
                if (start..=end).contains(&s1) {
                    *state = MotionState::new(s1, v1);
                    return;
                }
                let boundary = if s1 > end { end } else { start };
                if v0.abs() <= VELOCITY_EPSILON {
                    // Pushed past a bound from rest: the cart sits in a vertex.
                    *state = MotionState::new(boundary, 0.0);
                    return;
                }
                // The crossing fell below the time resolution of the solver.
                let t_cross = ((boundary - s0) / v0).clamp(0.0, remaining);
                state.s = boundary;
                state.v = v0 + a * t_cross;
                remaining -= t_cross;
            }
        }
    }
}

/// Direction of travel for velocity `v`, falling back to the sign of
/// acceleration `a` when the cart is momentarily at rest.
fn heading_forward(v: f32, a: f32) -> bool {
    if v.abs() > VELOCITY_EPSILON {
        v > 0.0
    } else {
        a > ACCEL_EPSILON
    }
}

/// Segment whose incline governs the cart's next stretch of motion.
///
/// `segment_at_length` resolves a boundary to the segment ending there;
/// a cart leaving that boundary forwards belongs to the next segment.
fn governing_segment(
    curve: &PiecewiseLinearCurve,
    state: &MotionState,
    accel: &impl Fn(usize) -> f32,
) -> usize {
    let last = curve.segment_count() - 1;
    let mut segment = curve.segment_at_length(state.s);
    while segment < last
        && state.s >= curve.segment_end(segment) - LENGTH_EPSILON
        && heading_forward(state.v, accel(segment + 1))
    {
        segment += 1;
    }
    segment
}

/// Smallest strictly positive `t` with `v t + a t^2 / 2 = d`, if any.
fn time_to_reach(d: f32, v: f32, a: f32) -> Option<f32> {
    if a.abs() < ACCEL_EPSILON {
        if v.abs() < VELOCITY_EPSILON {
            return None;
        }
        let t = d / v;
        return (t > TIME_EPSILON).then_some(t);
    }

    let disc = v * v + 2.0 * a * d;
    if disc < 0.0 {
        return None;
    }
    // Roots of a/2 t^2 + v t - d = 0 without cancelling `-v + sqrt(disc)`.
    let q = -0.5 * (v + v.signum() * disc.sqrt());
    if q == 0.0 {
        return None;
    }
    let (t1, t2) = (q / (0.5 * a), -d / q);
    let (lo, hi) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
    if lo > TIME_EPSILON {
        Some(lo)
    } else if hi > TIME_EPSILON {
        Some(hi)
    } else {
        None
    }
}
