//! Interactive editing session.
//!
//! [`Editor`] ties a [`Track`], the cart's [`MotionState`] and the rail
//! mesh together. Hosts forward input and frame ticks; every edit
//! recomputes the curve and regenerates the mesh before returning.

use crate::error::Result;
use crate::persistence;
use crate::sim::{Float2, Float3, Frame, MotionParams};
use crate::track::{
    generate_mesh, hovered_control_point, step, MeshData, MeshParams, MotionState,
    ScreenProjection, Track,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub motion: MotionParams,
    pub mesh: MeshParams,
    /// Hover radius around a projected control point, in pixels.
    pub pick_radius: f32,
    /// Roll change per scroll unit, in degrees.
    pub roll_step: f32,
}

impl EditorConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            motion: MotionParams::default(),
            mesh: MeshParams::default(),
            pick_radius: 50.0,
            roll_step: 1.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    track: Track,
    cart: MotionState,
    hovered: Option<usize>,
    mesh: MeshData,
}

impl Editor {
    /// Session on the default starter track.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_track(Track::default(), config)
    }

    pub fn with_track(track: Track, config: EditorConfig) -> Self {
        let mesh = generate_mesh(&track, &config.mesh);
        Self {
            config,
            track,
            cart: MotionState::REST,
            hovered: None,
            mesh,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn cart(&self) -> MotionState {
        self.cart
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    /// Replaces the track with the file at `path`.
    ///
    /// On failure the current track is left untouched.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let track = persistence::load(path)?;
        self.track = track;
        self.cart = MotionState::REST;
        self.hovered = None;
        self.rebuild();
        Ok(())
    }

    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        persistence::save(&self.track, path)
    }

    /// Updates the hovered control point from the cursor position.
    pub fn hover(&mut self, cursor: Float2, projection: &impl ScreenProjection) -> Option<usize> {
        self.hovered = hovered_control_point(
            self.track.control_points(),
            cursor,
            projection,
            self.config.pick_radius,
        );
        self.hovered
    }

    /// Moves the hovered control point by `delta`. No-op without a hover.
    pub fn drag_hovered(&mut self, delta: Float3) -> bool {
        let Some(index) = self.hovered else {
            return false;
        };
        let Some(&current) = self.track.control_points().get(index) else {
            return false;
        };
        self.drag_control_point(index, current + delta)
    }

    pub fn drag_control_point(&mut self, index: usize, position: Float3) -> bool {
        let changed = self.track.mutate_control_point(index, position);
        if changed {
            self.rebuild();
        }
        changed
    }

    /// Rolls the hovered control point by `offset * roll_step` degrees.
    pub fn scroll_roll(&mut self, offset: f32) -> bool {
        let Some(index) = self.hovered else {
            return false;
        };
        let changed = self
            .track
            .adjust_roll(index, offset * self.config.roll_step);
        if changed {
            self.rebuild();
        }
        changed
    }

    pub fn append_segment(&mut self) -> bool {
        let changed = self.track.append_segment();
        if changed {
            self.rebuild();
        }
        changed
    }

    pub fn remove_last_segment(&mut self) -> bool {
        let changed = self.track.remove_last_segment();
        if changed {
            if self
                .hovered
                .is_some_and(|index| index >= self.track.point_count())
            {
                self.hovered = None;
            }
            self.rebuild();
        }
        changed
    }

    /// Places the cart at normalized position `u` and stops it.
    pub fn scrub(&mut self, u: f32) {
        let s = self.track.curve().normalized_to_arc_length(u.clamp(0.0, 1.0));
        self.cart = MotionState::new(s, 0.0);
    }

    /// Advances the cart by `dt` seconds and returns its normalized position.
    pub fn tick(&mut self, dt: f32) -> f32 {
        step(self.track.curve(), &mut self.cart, &self.config.motion, dt);
        self.track.curve().arc_length_to_normalized(self.cart.s)
    }

    pub fn cart_frame(&self) -> Frame {
        self.track.frame_at_interpolated(self.cart.s)
    }

    fn rebuild(&mut self) {
        let total = self.track.total_length();
        if self.cart.s > total {
            self.cart = MotionState::new(total, 0.0);
        }
        self.mesh = generate_mesh(&self.track, &self.config.mesh);
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackError;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-4;

    /// Side view looking down -X: screen x follows -z, screen y follows y.
    fn side_view(p: Float3) -> Option<Float2> {
        Some(Float2::new(-p.z * 20.0, p.y * 20.0))
    }

    fn cursor_on(point: Float3) -> Float2 {
        side_view(point).unwrap()
    }

    #[test]
    fn config_from_yaml_fills_defaults() {
        let text = "pick_radius: 20\nmotion:\n  acceleration_scale: 0.5\n";
        let config = EditorConfig::from_yaml_str(text).unwrap();
        assert_eq!(config.pick_radius, 20.0);
        assert_eq!(config.roll_step, 1.5);
        assert_eq!(config.motion.acceleration_scale, 0.5);
        assert_eq!(config.motion.gravity, MotionParams::default().gravity);
        assert_eq!(config.mesh, MeshParams::default());
    }

    #[test]
    fn config_from_bad_yaml_is_parse_error() {
        assert!(matches!(
            EditorConfig::from_yaml_str("pick_radius: [1, 2]"),
            Err(TrackError::Parse(_))
        ));
    }

    #[test]
    fn new_session_has_mesh() {
        let editor = Editor::default();
        assert!(!editor.mesh().is_empty());
        assert_eq!(editor.cart(), MotionState::REST);
        assert_eq!(editor.hovered(), None);
    }

    #[test]
    fn hover_and_drag_moves_point_and_rebuilds_mesh() {
        let mut editor = Editor::default();
        let target = editor.track().control_points()[2];

        let hovered = editor.hover(
            Float2::new(cursor_on(target).x + 10.0, cursor_on(target).y),
            &side_view,
        );
        assert_eq!(hovered, Some(2));

        let before = editor.mesh().clone();
        assert!(editor.drag_hovered(Float3::new(0.0, 2.0, 0.0)));
        let moved = editor.track().control_points()[2];
        assert_relative_eq!(moved.y, target.y + 2.0, epsilon = TOLERANCE);
        assert_ne!(editor.mesh(), &before);
    }

    #[test]
    fn hover_misses_outside_radius() {
        let mut editor = Editor::default();
        assert_eq!(editor.hover(Float2::new(-5000.0, -5000.0), &side_view), None);
        assert!(!editor.drag_hovered(Float3::UP));
        assert!(!editor.scroll_roll(1.0));
    }

    #[test]
    fn scroll_adjusts_hovered_roll() {
        let mut editor = Editor::default();
        let point = editor.track().control_points()[1];
        editor.hover(cursor_on(point), &side_view);

        assert!(editor.scroll_roll(4.0));
        assert_relative_eq!(editor.track().roll()[1], 6.0, epsilon = TOLERANCE);
        assert!(editor.scroll_roll(-2.0));
        assert_relative_eq!(editor.track().roll()[1], 3.0, epsilon = TOLERANCE);
    }

    #[test]
    fn removing_hovered_point_clears_hover() {
        let mut editor = Editor::default();
        let last = *editor.track().control_points().last().unwrap();
        editor.hover(cursor_on(last), &side_view);
        assert!(editor.hovered().is_some());

        assert!(editor.remove_last_segment());
        assert_eq!(editor.hovered(), None);
        assert!(editor.append_segment());
        assert_eq!(editor.track().point_count(), Track::default().point_count());
    }

    #[test]
    fn scrub_places_cart_at_rest() {
        let mut editor = Editor::default();
        editor.scrub(0.5);
        let total = editor.track().total_length();
        assert_relative_eq!(editor.cart().s, total * 0.5, epsilon = TOLERANCE);
        assert_eq!(editor.cart().v, 0.0);

        let frame = editor.cart_frame();
        assert_relative_eq!(
            frame.position.distance(editor.track().evaluate(total * 0.5)),
            0.0,
            epsilon = TOLERANCE
        );
    }

    #[test]
    fn tick_moves_cart_downhill() {
        let config = EditorConfig {
            motion: MotionParams {
                acceleration_scale: 1.0,
                ..MotionParams::default()
            },
            ..EditorConfig::default()
        };
        let mut editor = Editor::new(config);
        // Just past the crest of the starter hill.
        let crest = editor.track().curve().segment_end(2);
        editor.scrub(editor.track().curve().arc_length_to_normalized(crest + 0.5));

        let before = editor.cart().s;
        let mut u = 0.0;
        for _ in 0..30 {
            u = editor.tick(1.0 / 60.0);
        }
        assert!(editor.cart().s > before);
        assert!(editor.cart().v > 0.0);
        assert!((0.0..=1.0).contains(&u));
    }

    #[test]
    fn shrinking_track_clamps_cart() {
        let mut editor = Editor::default();
        editor.scrub(1.0);
        assert!(editor.remove_last_segment());
        assert_relative_eq!(
            editor.cart().s,
            editor.track().total_length(),
            epsilon = TOLERANCE
        );
    }

    #[test]
    fn open_failure_keeps_previous_track() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "knots: [0.0]\n").unwrap();

        let mut editor = Editor::default();
        editor.append_segment();
        let before = editor.track().clone();

        assert!(editor.open(&bad).is_err());
        assert!(editor.open(dir.path().join("absent.yaml")).is_err());
        assert_eq!(editor.track(), &before);
    }

    #[test]
    fn save_then_open_restores_track() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.yaml");

        let mut editor = Editor::default();
        editor.drag_control_point(3, Float3::new(1.0, 7.0, -16.0));
        editor.save_as(&path).unwrap();

        let mut other = Editor::default();
        other.scrub(0.7);
        other.open(&path).unwrap();
        assert_eq!(other.cart(), MotionState::REST);
        assert_eq!(
            other.track().control_points()[3],
            Float3::new(1.0, 7.0, -16.0)
        );
        assert_eq!(other.mesh().vertices.len(), editor.mesh().vertices.len());
    }
}
