//! YAML persistence for track documents.
//!
//! A track file holds three parallel sequences:
//!
//! ```yaml
//! knots: [0.0, 1.0]
//! points:
//!   - [0.0, 1.0, 0.0]
//!   - [0.0, 1.0, -10.0]
//! roll: [0.0, 0.0]
//! ```

use crate::error::{Result, TrackError};
use crate::sim::Float3;
use crate::track::Track;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// On-disk schema. Points are stored as `[x, y, z]` triples.
#[derive(Debug, Serialize, Deserialize)]
struct TrackFile {
    knots: Vec<f32>,
    points: Vec<[f32; 3]>,
    roll: Vec<f32>,
}

impl From<&Track> for TrackFile {
    fn from(track: &Track) -> Self {
        Self {
            knots: track.knots().to_vec(),
            points: track.control_points().iter().map(|p| p.to_array()).collect(),
            roll: track.roll().to_vec(),
        }
    }
}

impl TryFrom<TrackFile> for Track {
    type Error = TrackError;

    fn try_from(file: TrackFile) -> Result<Self> {
        let points = file.points.into_iter().map(Float3::from).collect();
        Track::new(file.knots, points, file.roll)
    }
}

/// Serialize a track to YAML text.
pub fn serialize(track: &Track) -> Result<String> {
    Ok(serde_yaml::to_string(&TrackFile::from(track))?)
}

/// Parse a track from YAML text, validating lengths and values.
pub fn deserialize(text: &str) -> Result<Track> {
    let file: TrackFile = serde_yaml::from_str(text)?;
    Track::try_from(file)
}

/// Load a track file from disk.
pub fn load(path: impl AsRef<Path>) -> Result<Track> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| TrackError::io(path, e))?;
    let track = deserialize(&text)?;
    log::debug!(
        "loaded {} control points from {}",
        track.point_count(),
        path.display()
    );
    Ok(track)
}

/// Write a track file to disk.
///
/// The YAML is written to a temporary file in the target directory and
/// renamed over `path`, so a failed save never leaves a partial file.
pub fn save(track: &Track, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = serialize(track)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| TrackError::io(path, e))?;
    file.write_all(text.as_bytes())
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| TrackError::io(path, e))?;
    file.persist(path).map_err(|e| TrackError::io(path, e.error))?;

    log::debug!(
        "saved {} control points to {}",
        track.point_count(),
        path.display()
    );
    Ok(())
}
