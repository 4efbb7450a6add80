use super::curve::PiecewiseLinearCurve;
use crate::sim::{delta_degrees, Float3, Frame};

/// Frame at arc length `s` using the tangent and roll of the control point
/// that starts the containing segment.
pub fn frame_at(curve: &PiecewiseLinearCurve, roll: &[f32], s: f32) -> Frame {
    if curve.segment_count() == 0 {
        return Frame::DEFAULT;
    }
    let sample = curve.sample(s);
    let forward = curve.control_tangents()[sample.segment];
    let roll_degrees = roll.get(sample.segment).copied().unwrap_or(0.0);
    Frame::from_forward_and_roll(sample.position, forward, roll_degrees)
}

/// Frame at arc length `s` with tangent and roll blended between the two
/// endpoints of the containing segment.
///
/// Roll is blended along the shorter angular arc, so `170°` to `-170°`
/// passes through `180°` rather than sweeping back through zero. Roll
/// values are taken modulo 360: `0°` to `350°` turns through `-5°`.
pub fn frame_at_interpolated(curve: &PiecewiseLinearCurve, roll: &[f32], s: f32) -> Frame {
    if curve.segment_count() == 0 {
        return Frame::DEFAULT;
    }
    let sample = curve.sample(s);
    let (i, t) = (sample.segment, sample.t);

    let tangents = curve.control_tangents();
    let mut forward = tangents[i].lerp(tangents[i + 1], t).normalize();
    if forward == Float3::ZERO {
        forward = curve.segment_direction(i);
    }

    let roll_a = roll.get(i).copied().unwrap_or(0.0);
    let roll_b = roll.get(i + 1).copied().unwrap_or(roll_a);
    let roll_degrees = roll_a + delta_degrees(roll_a, roll_b) * t;

    Frame::from_forward_and_roll(sample.position, forward, roll_degrees)
}
