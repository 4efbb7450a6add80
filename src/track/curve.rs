use crate::sim::Float3;

/// Position on the curve together with the segment it was found on.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CurveSample {
    pub position: Float3,
    /// Index of the segment `[segment, segment + 1]` containing the sample.
    pub segment: usize,
    /// Local fraction along that segment, in `[0, 1]`.
    pub t: f32,
}

impl CurveSample {
    pub const ZERO: Self = Self {
        position: Float3::ZERO,
        segment: 0,
        t: 0.0,
    };
}

/// Piecewise-linear 3D curve parameterized by arc length.
///
/// Control points and knots are the source of truth. Segment lengths,
/// cumulative lengths and tangents are derived and rebuilt in full by
/// [`recompute`](Self::recompute) after every mutation; every mutator on
/// this type calls it before returning.
///
/// With fewer than two control points the derived arrays are empty and all
/// queries return zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PiecewiseLinearCurve {
    knots: Vec<f32>,
    control_points: Vec<Float3>,
    control_tangents: Vec<Float3>,
    segment_lengths: Vec<f32>,
    cumulative_lengths: Vec<f32>,
}

impl PiecewiseLinearCurve {
    /// Creates a curve and computes its derived data.
    ///
    /// `knots` and `control_points` are expected to have equal length;
    /// [`Track::new`](super::Track::new) validates that before calling.
    pub fn new(knots: Vec<f32>, control_points: Vec<Float3>) -> Self {
        let mut curve = Self {
            knots,
            control_points,
            ..Self::default()
        };
        curve.recompute();
        curve
    }

    pub fn knots(&self) -> &[f32] {
        &self.knots
    }

    pub fn control_points(&self) -> &[Float3] {
        &self.control_points
    }

    pub fn control_tangents(&self) -> &[Float3] {
        &self.control_tangents
    }

    pub fn segment_lengths(&self) -> &[f32] {
        &self.segment_lengths
    }

    pub fn cumulative_lengths(&self) -> &[f32] {
        &self.cumulative_lengths
    }

    pub fn point_count(&self) -> usize {
        self.control_points.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segment_lengths.len()
    }

    pub fn total_length(&self) -> f32 {
        self.cumulative_lengths.last().copied().unwrap_or(0.0)
    }

    /// Regenerates segment lengths, cumulative lengths and tangents.
    pub fn recompute(&mut self) {
        self.segment_lengths.clear();
        self.cumulative_lengths.clear();
        self.control_tangents.clear();

        let n = self.control_points.len();
        if n < 2 {
            return;
        }

        self.segment_lengths.reserve(n - 1);
        self.cumulative_lengths.reserve(n - 1);
        self.control_tangents.reserve(n);

        let mut total = 0.0;
        for pair in self.control_points.windows(2) {
            let length = pair[0].distance(pair[1]);
            total += length;
            self.segment_lengths.push(length);
            self.cumulative_lengths.push(total);
        }

        let points = &self.control_points;
        self.control_tangents
            .push((points[1] - points[0]).normalize());
        for i in 1..n - 1 {
            let back = points[i] - points[i - 1];
            let forward = points[i + 1] - points[i];
            let mut tangent = back.lerp(forward, 0.5).normalize();
            // Hairpin: the two differences cancel out.
            if tangent == Float3::ZERO {
                tangent = forward.normalize();
            }
            if tangent == Float3::ZERO {
                tangent = back.normalize();
            }
            self.control_tangents.push(tangent);
        }
        self.control_tangents
            .push((points[n - 1] - points[n - 2]).normalize());

        log::trace!(
            "recomputed curve: {} points, total length {:.3}",
            n,
            total
        );
    }

    /// Arc length at which segment `index` starts.
    pub fn segment_start(&self, index: usize) -> f32 {
        if index == 0 {
            0.0
        } else {
            self.cumulative_lengths
                .get(index - 1)
                .copied()
                .unwrap_or_else(|| self.total_length())
        }
    }

    /// Arc length at which segment `index` ends.
    pub fn segment_end(&self, index: usize) -> f32 {
        self.cumulative_lengths
            .get(index)
            .copied()
            .unwrap_or_else(|| self.total_length())
    }

    /// Unit direction of the straight segment `index`, or zero when the
    /// segment does not exist or has no length.
    pub fn segment_direction(&self, index: usize) -> Float3 {
        match (
            self.control_points.get(index),
            self.control_points.get(index + 1),
        ) {
            (Some(&a), Some(&b)) => (b - a).normalize(),
            _ => Float3::ZERO,
        }
    }

    /// Smallest segment index whose cumulative length reaches `s`.
    ///
    /// `s` is clamped to `[0, total_length]`. A query exactly on a boundary
    /// resolves to the segment ending there. Returns 0 for a curve without
    /// segments.
    pub fn segment_at_length(&self, s: f32) -> usize {
        let Some(&total) = self.cumulative_lengths.last() else {
            return 0;
        };
        let s = s.clamp(0.0, total);
        let index = self.cumulative_lengths.partition_point(|&c| c < s);
        index.min(self.cumulative_lengths.len() - 1)
    }

    /// Position at arc length `s`, plus the segment and local fraction used.
    pub fn sample(&self, s: f32) -> CurveSample {
        if self.cumulative_lengths.is_empty() {
            return CurveSample::ZERO;
        }
        let s = s.clamp(0.0, self.total_length());
        let segment = self.segment_at_length(s);

        let length = self.segment_lengths[segment];
        let t = if length > 0.0 {
            ((s - self.segment_start(segment)) / length).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let position = self.control_points[segment].lerp(self.control_points[segment + 1], t);
        CurveSample {
            position,
            segment,
            t,
        }
    }

    pub fn evaluate(&self, s: f32) -> Float3 {
        self.sample(s).position
    }

    pub fn evaluate_normalized(&self, u: f32) -> Float3 {
        self.evaluate(self.normalized_to_arc_length(u))
    }

    pub fn normalized_to_arc_length(&self, u: f32) -> f32 {
        let total = self.total_length();
        if total <= 0.0 {
            return 0.0;
        }
        u * total
    }

    pub fn arc_length_to_normalized(&self, s: f32) -> f32 {
        let total = self.total_length();
        if total <= 0.0 {
            return 0.0;
        }
        s / total
    }

    pub(crate) fn push(&mut self, knot: f32, point: Float3) {
        self.knots.push(knot);
        self.control_points.push(point);
        self.recompute();
    }

    pub(crate) fn pop(&mut self) -> Option<(f32, Float3)> {
        let knot = self.knots.pop();
        let point = self.control_points.pop();
        self.recompute();
        Some((knot?, point?))
    }

    pub(crate) fn set_point(&mut self, index: usize, point: Float3) -> bool {
        let Some(slot) = self.control_points.get_mut(index) else {
            return false;
        };
        *slot = point;
        self.recompute();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-5;

    fn curve(points: &[[f32; 3]]) -> PiecewiseLinearCurve {
        let knots = (0..points.len()).map(|i| i as f32).collect();
        PiecewiseLinearCurve::new(knots, points.iter().copied().map(Float3::from).collect())
    }

    fn zigzag() -> PiecewiseLinearCurve {
        curve(&[
            [0.0, 0.0, 0.0],
            [3.0, 4.0, 0.0],
            [3.0, 4.0, -2.0],
            [0.0, 0.0, -2.0],
            [0.0, 0.0, -7.0],
        ])
    }

    #[test]
    fn two_point_curve_length_midpoint_and_tangents() {
        let c = curve(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]);

        assert_relative_eq!(c.total_length(), 10.0, epsilon = TOLERANCE);

        let mid = c.evaluate(5.0);
        assert_relative_eq!(mid.x, 5.0, epsilon = TOLERANCE);
        assert_relative_eq!(mid.y, 0.0, epsilon = TOLERANCE);
        assert_relative_eq!(mid.z, 0.0, epsilon = TOLERANCE);

        assert_eq!(c.control_tangents().len(), 2);
        for tangent in c.control_tangents() {
            assert_relative_eq!(tangent.x, 1.0, epsilon = TOLERANCE);
            assert_relative_eq!(tangent.y, 0.0, epsilon = TOLERANCE);
        }
    }

    #[test]
    fn interior_tangent_averages_neighbours() {
        let c = curve(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
        let t = c.control_tangents()[1];
        let half_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(t.x, half_sqrt2, epsilon = TOLERANCE);
        assert_relative_eq!(t.y, half_sqrt2, epsilon = TOLERANCE);
        assert_relative_eq!(t.z, 0.0, epsilon = TOLERANCE);
    }

    #[test]
    fn hairpin_tangent_falls_back_to_forward_segment() {
        let c = curve(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        let t = c.control_tangents()[1];
        assert_relative_eq!(t.x, -1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn derived_array_lengths() {
        let c = zigzag();
        assert_eq!(c.segment_lengths().len(), 4);
        assert_eq!(c.cumulative_lengths().len(), 4);
        assert_eq!(c.control_tangents().len(), 5);
        assert_relative_eq!(c.segment_lengths()[0], 5.0, epsilon = TOLERANCE);
        assert_relative_eq!(c.total_length(), 17.0, epsilon = TOLERANCE);
        assert!(c.cumulative_lengths().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn evaluate_hits_endpoints() {
        let c = zigzag();
        let first = c.evaluate(0.0);
        let last = c.evaluate(c.total_length());
        assert_eq!(first, c.control_points()[0]);
        assert_relative_eq!(last.z, -7.0, epsilon = TOLERANCE);
        assert_relative_eq!(last.x, 0.0, epsilon = TOLERANCE);
    }

    #[test]
    fn evaluate_clamps_out_of_range() {
        let c = zigzag();
        assert_eq!(c.evaluate(-3.0), c.evaluate(0.0));
        assert_eq!(c.evaluate(100.0), c.evaluate(c.total_length()));
    }

    #[test]
    fn segment_at_length_boundary_resolves_to_ending_segment() {
        let c = zigzag();
        assert_eq!(c.segment_at_length(0.0), 0);
        assert_eq!(c.segment_at_length(5.0), 0);
        assert_eq!(c.segment_at_length(5.001), 1);
        assert_eq!(c.segment_at_length(7.0), 1);
        assert_eq!(c.segment_at_length(17.0), 3);
        assert_eq!(c.segment_at_length(1e6), 3);
    }

    #[test]
    fn segment_at_length_is_valid_and_non_decreasing() {
        let c = zigzag();
        let total = c.total_length();
        let mut previous = 0;
        for i in 0..=340 {
            let s = total * i as f32 / 340.0;
            let seg = c.segment_at_length(s);
            assert!(seg <= c.point_count() - 2);
            assert!(seg >= previous);
            previous = seg;
        }
    }

    #[test]
    fn sample_reports_segment_and_fraction() {
        let c = zigzag();
        let sample = c.sample(6.0);
        assert_eq!(sample.segment, 1);
        assert_relative_eq!(sample.t, 0.5, epsilon = TOLERANCE);
        assert_relative_eq!(sample.position.z, -1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn normalized_conversion_is_monotonic_and_round_trips() {
        let c = zigzag();
        let total = c.total_length();
        let mut previous = f32::NEG_INFINITY;
        for i in 0..=100 {
            let s = total * i as f32 / 100.0;
            let u = c.arc_length_to_normalized(s);
            assert!(u >= previous);
            previous = u;
            assert_relative_eq!(c.normalized_to_arc_length(u), s, epsilon = 1e-4);
        }
        assert_relative_eq!(c.arc_length_to_normalized(total), 1.0, epsilon = TOLERANCE);
        assert_eq!(c.evaluate_normalized(1.0), c.evaluate(total));
    }

    #[test]
    fn empty_and_single_point_curves_degrade_to_zero() {
        for c in [curve(&[]), curve(&[[1.0, 2.0, 3.0]])] {
            assert_eq!(c.segment_count(), 0);
            assert!(c.control_tangents().is_empty());
            assert_eq!(c.total_length(), 0.0);
            assert_eq!(c.segment_at_length(3.0), 0);
            assert_eq!(c.evaluate(3.0), Float3::ZERO);
            assert_eq!(c.sample(1.0), CurveSample::ZERO);
            assert_eq!(c.normalized_to_arc_length(0.5), 0.0);
            assert_eq!(c.arc_length_to_normalized(0.5), 0.0);
            assert_eq!(c.segment_direction(0), Float3::ZERO);
        }
    }

    #[test]
    fn zero_length_segment_does_not_produce_nan() {
        let c = curve(&[[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let p = c.evaluate(0.0);
        assert!(p.is_finite());
        let q = c.evaluate(1.0);
        assert_relative_eq!(q.x, 1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn mutators_recompute_derived_data() {
        let mut c = curve(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]);
        c.push(2.0, Float3::new(10.0, 0.0, 5.0));
        assert_relative_eq!(c.total_length(), 15.0, epsilon = TOLERANCE);

        assert!(c.set_point(0, Float3::new(4.0, 0.0, 0.0)));
        assert_relative_eq!(c.total_length(), 11.0, epsilon = TOLERANCE);
        assert!(!c.set_point(9, Float3::ZERO));

        assert_eq!(c.pop(), Some((2.0, Float3::new(10.0, 0.0, 5.0))));
        assert_relative_eq!(c.total_length(), 6.0, epsilon = TOLERANCE);
        assert_eq!(c.knots().len(), c.point_count());
    }
}
