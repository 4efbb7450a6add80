//! Screen-space picking of control points.

use crate::sim::{Float2, Float3};

/// Maps a world-space point to window pixel coordinates.
///
/// `None` means the point is not visible (behind the camera or clipped)
/// and cannot be picked.
pub trait ScreenProjection {
    fn project(&self, world: Float3) -> Option<Float2>;
}

impl<F> ScreenProjection for F
where
    F: Fn(Float3) -> Option<Float2>,
{
    fn project(&self, world: Float3) -> Option<Float2> {
        self(world)
    }
}

/// Index and pixel distance of the projected control point closest to
/// `cursor`. Ties resolve to the lower index.
pub fn nearest_control_point(
    points: &[Float3],
    cursor: Float2,
    projection: &impl ScreenProjection,
) -> Option<(usize, f32)> {
    points
        .iter()
        .enumerate()
        .filter_map(|(i, &p)| {
            let screen = projection.project(p)?;
            let distance = screen.distance(cursor);
            distance.is_finite().then_some((i, distance))
        })
        .fold(None, |best, candidate| match best {
            Some((_, d)) if d <= candidate.1 => best,
            _ => Some(candidate),
        })
}

/// Nearest control point within `radius` pixels of `cursor`.
pub fn hovered_control_point(
    points: &[Float3],
    cursor: Float2,
    projection: &impl ScreenProjection,
    radius: f32,
) -> Option<usize> {
    nearest_control_point(points, cursor, projection)
        .filter(|&(_, distance)| distance <= radius)
        .map(|(index, _)| index)
}
