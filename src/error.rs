//! Unified error type for the outer surfaces of the crate.
//!
//! The geometry core never fails: a rejected fix or a path without a loop is
//! an `Option::None`, not an error. Errors only come from setup and I/O:
//! configuration validation, GPX parsing and JSON handling.

use thiserror::Error;

/// Errors raised by configuration, session setup and track loading.
#[derive(Debug, Error)]
pub enum TerritoryError {
    /// A configuration value is out of its usable range.
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A track has too few points to be replayed.
    #[error("track {track_id} has {point_count} points, at least {minimum_required} required")]
    InsufficientPoints {
        track_id: String,
        point_count: usize,
        minimum_required: usize,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// GPX parse failure (message from the parser).
    #[error("gpx error: {0}")]
    Gpx(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TerritoryError>;

/// Convert an empty option into an `InsufficientPoints` error.
pub trait OptionExt<T> {
    fn ok_or_insufficient_points(
        self,
        track_id: &str,
        point_count: usize,
        minimum_required: usize,
    ) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_insufficient_points(
        self,
        track_id: &str,
        point_count: usize,
        minimum_required: usize,
    ) -> Result<T> {
        self.ok_or_else(|| TerritoryError::InsufficientPoints {
            track_id: track_id.to_string(),
            point_count,
            minimum_required,
        })
    }
}
