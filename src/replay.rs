//! Replaying recorded tracks through a fresh capture session.

use log::info;
use serde::Serialize;

use crate::error::{OptionExt, Result};
use crate::geo_utils::path_length;
use crate::{CaptureSession, FixOutcome, GpsPoint, LoopResult, TerritoryConfig};

/// Outcome of replaying one track.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub track_id: String,
    /// Fixes fed to the session
    pub fixes: usize,
    /// Fixes dropped by the filter
    pub rejected: usize,
    /// Raw track length in meters
    pub distance_m: f64,
    /// Every capture, in order
    pub captures: Vec<LoopResult>,
    /// Distinct cells claimed over the whole track
    pub claimed_cells: usize,
}

/// Replay a track fix by fix.
///
/// Fails only on an invalid config or an empty track.
pub fn replay_track(
    track_id: &str,
    points: &[GpsPoint],
    config: &TerritoryConfig,
) -> Result<ReplaySummary> {
    points
        .first()
        .ok_or_insufficient_points(track_id, points.len(), 1)?;

    let mut session = CaptureSession::with_config(config.clone())?;
    let mut captures = Vec::new();
    for fix in points {
        if let FixOutcome::Captured(result) = session.push_fix(*fix) {
            captures.push(result);
        }
    }

    info!(
        "[Replay] {}: {} fixes, {} rejected, {} captures, {} cells",
        track_id,
        points.len(),
        session.rejected_count(),
        captures.len(),
        session.territory().len()
    );

    Ok(ReplaySummary {
        track_id: track_id.to_string(),
        fixes: points.len(),
        rejected: session.rejected_count(),
        distance_m: path_length(points),
        captures,
        claimed_cells: session.territory().len(),
    })
}

/// Replay independent tracks concurrently.
///
/// Each track gets its own session, so no state is shared between workers.
/// Results are returned in input order.
#[cfg(feature = "parallel")]
pub fn replay_tracks_parallel(
    tracks: &[(String, Vec<GpsPoint>)],
    config: &TerritoryConfig,
) -> Vec<Result<ReplaySummary>> {
    use rayon::prelude::*;

    tracks
        .par_iter()
        .map(|(id, points)| replay_track(id, points, config))
        .collect()
}
