use super::curve::PiecewiseLinearCurve;
use super::frames::{frame_at, frame_at_interpolated};
use crate::error::{Result, TrackError};
use crate::sim::{wrap_degrees, Float3, Frame};

/// Editable track: a curve plus one roll angle (degrees) per control point.
///
/// All mutators keep `knots`, `control_points` and `roll` the same length
/// and leave the curve's derived data recomputed. Edits that cannot apply
/// (bad index, too few points) are rejected with `false` and a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    curve: PiecewiseLinearCurve,
    roll: Vec<f32>,
}

impl Track {
    /// Builds a track from the three parallel sequences.
    ///
    /// Roll values are wrapped into `(-180, 180]`. Fails with [`TrackError::LengthMismatch`] if the sequences differ in
    /// length and [`TrackError::NonFinite`] on NaN or infinite values.
    pub fn new(knots: Vec<f32>, control_points: Vec<Float3>, roll: Vec<f32>) -> Result<Self> {
        if knots.len() != control_points.len() || roll.len() != control_points.len() {
            return Err(TrackError::LengthMismatch {
                knots: knots.len(),
                points: control_points.len(),
                roll: roll.len(),
            });
        }
        check_finite("knots", knots.iter().map(|k| k.is_finite()))?;
        check_finite("points", control_points.iter().map(|p| p.is_finite()))?;
        check_finite("roll", roll.iter().map(|r| r.is_finite()))?;

        Ok(Self {
            curve: PiecewiseLinearCurve::new(knots, control_points),
            roll: roll.into_iter().map(wrap_degrees).collect(),
        })
    }

    pub fn curve(&self) -> &PiecewiseLinearCurve {
        &self.curve
    }

    pub fn knots(&self) -> &[f32] {
        self.curve.knots()
    }

    pub fn control_points(&self) -> &[Float3] {
        self.curve.control_points()
    }

    pub fn control_tangents(&self) -> &[Float3] {
        self.curve.control_tangents()
    }

    pub fn roll(&self) -> &[f32] {
        &self.roll
    }

    pub fn point_count(&self) -> usize {
        self.curve.point_count()
    }

    pub fn total_length(&self) -> f32 {
        self.curve.total_length()
    }

    pub fn evaluate(&self, s: f32) -> Float3 {
        self.curve.evaluate(s)
    }

    pub fn frame_at(&self, s: f32) -> Frame {
        frame_at(&self.curve, &self.roll, s)
    }

    pub fn frame_at_interpolated(&self, s: f32) -> Frame {
        frame_at_interpolated(&self.curve, &self.roll, s)
    }

    /// Extends the track by one segment continuing along the last tangent,
    /// with the same length as the current last segment.
    pub fn append_segment(&mut self) -> bool {
        let (Some(&length), Some(&tangent), Some(&last)) = (
            self.curve.segment_lengths().last(),
            self.curve.control_tangents().last(),
            self.curve.control_points().last(),
        ) else {
            log::warn!("append_segment needs at least two control points");
            return false;
        };
        let knot = self.curve.knots().last().map_or(0.0, |k| k + 1.0);
        let roll = self.roll.last().copied().unwrap_or(0.0);

        self.roll.push(roll);
        self.curve.push(knot, last + tangent * length);
        true
    }

    /// Drops the final control point. Requires at least two points.
    pub fn remove_last_segment(&mut self) -> bool {
        if self.point_count() < 2 {
            log::warn!(
                "remove_last_segment needs at least two control points, have {}",
                self.point_count()
            );
            return false;
        }
        self.roll.pop();
        self.curve.pop();
        true
    }

    /// Moves one control point (interactive drag).
    pub fn mutate_control_point(&mut self, index: usize, position: Float3) -> bool {
        if !position.is_finite() {
            log::warn!("ignoring non-finite position for control point {index}");
            return false;
        }
        if !self.curve.set_point(index, position) {
            log::warn!(
                "control point {index} out of range ({} points)",
                self.point_count()
            );
            return false;
        }
        true
    }

    /// Sets the roll of one control point, wrapped into `(-180, 180]`.
    pub fn set_roll(&mut self, index: usize, degrees: f32) -> bool {
        if !degrees.is_finite() {
            log::warn!("ignoring non-finite roll for control point {index}");
            return false;
        }
        let Some(slot) = self.roll.get_mut(index) else {
            log::warn!("roll index {index} out of range ({} points)", self.roll.len());
            return false;
        };
        *slot = wrap_degrees(degrees);
        true
    }

    /// Adds `delta` degrees to one control point's roll, wrapping.
    pub fn adjust_roll(&mut self, index: usize, delta: f32) -> bool {
        match self.roll.get(index).copied() {
            Some(current) => self.set_roll(index, current + delta),
            None => self.set_roll(index, delta),
        }
    }
}

impl Default for Track {
    /// A short starter hill: climb, crest, drop, run-out.
    fn default() -> Self {
        let points = vec![
            Float3::new(0.0, 1.0, 0.0),
            Float3::new(0.0, 1.0, -5.0),
            Float3::new(0.0, 6.0, -12.0),
            Float3::new(0.0, 6.5, -16.0),
            Float3::new(0.0, 1.0, -24.0),
            Float3::new(0.0, 1.0, -32.0),
        ];
        let knots = (0..points.len()).map(|i| i as f32).collect();
        let roll = vec![0.0; points.len()];
        Self {
            curve: PiecewiseLinearCurve::new(knots, points),
            roll,
        }
    }
}

fn check_finite(field: &'static str, values: impl Iterator<Item = bool>) -> Result<()> {
    for (index, finite) in values.enumerate() {
        if !finite {
            return Err(TrackError::NonFinite { field, index });
        }
    }
    Ok(())
}
