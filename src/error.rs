//! Error types for track documents and persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for fallible track operations
pub type Result<T> = std::result::Result<T, TrackError>;

/// Errors surfaced by track construction, loading and saving.
///
/// Queries against degenerate curves are not errors; they return zero or
/// default values.
#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Length mismatch: {knots} knots, {points} points, {roll} roll values")]
    LengthMismatch {
        knots: usize,
        points: usize,
        roll: usize,
    },

    #[error("Non-finite value in `{field}` at index {index}")]
    NonFinite { field: &'static str, index: usize },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrackError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrackError::Io {
            path: path.into(),
            source,
        }
    }
}
