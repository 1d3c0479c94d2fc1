//! Closed loop detection.
//!
//! Given the accumulated path and the newest fix, decide whether the walk
//! has just closed a loop. Three strategies are tried in order and the first
//! candidate that passes validation wins:
//!
//! 1. **Snap-to-start** - the fix is back within `snap_to_start_m` of the
//!    first point; the whole path becomes the loop.
//! 2. **Self-intersection** - the newest edge properly crosses an earlier
//!    edge; the loop runs from the crossing back to itself.
//! 3. **Proximity snap** - the fix is within `proximity_snap_m` of an
//!    earlier point; the loop runs from that point back to itself.
//!
//! Strategies 2 and 3 ignore the most recent `trailing_buffer` points so
//! that the path cannot close on its own last few edges.

use std::borrow::Cow;
use std::collections::HashSet;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::enclosure::enclosed_cells;
use crate::geo_utils::{haversine_distance, segment_intersection};
use crate::{CellId, GpsPoint, Polygon, TerritoryConfig};

/// Which strategy produced a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureKind {
    SnapToStart,
    SelfIntersection,
    ProximitySnap,
}

/// A captured loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopResult {
    /// Cleaned, strictly closed loop polygon.
    pub polygon: Polygon,
    /// Cells whose center lies inside the polygon (unordered).
    pub enclosed_cell_ids: HashSet<CellId>,
    /// Where the loop closes: the path start, the crossing point, or the
    /// earlier point that was approached.
    pub closure_point: GpsPoint,
    pub kind: ClosureKind,
    /// Index into the detector's input path where the loop begins.
    ///
    /// Points before this index are the "tail" leading into the loop.
    pub start_index: usize,
    /// Loop perimeter in meters.
    pub perimeter_m: f64,
}

impl LoopResult {
    pub fn cell_count(&self) -> usize {
        self.enclosed_cell_ids.len()
    }
}

/// Stateless loop detector holding the tolerances it checks against.
#[derive(Debug, Clone, Default)]
pub struct LoopDetector {
    config: TerritoryConfig,
}

impl LoopDetector {
    pub fn new(config: TerritoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TerritoryConfig {
        &self.config
    }

    /// Check whether `new_point` closes a loop on `path`.
    ///
    /// `path` may or may not already end with `new_point`; either way the
    /// newest edge is the one ending at `new_point`. Paths with fewer than
    /// three points never form a loop. The path is never modified:
    /// truncating it after a capture is up to the caller (see
    /// [`LoopResult::start_index`]).
    pub fn detect(&self, path: &[GpsPoint], new_point: &GpsPoint) -> Option<LoopResult> {
        if path.len() < 3 {
            return None;
        }

        let trail: Cow<'_, [GpsPoint]> = if path.last() == Some(new_point) {
            Cow::Borrowed(path)
        } else {
            let mut owned = path.to_vec();
            owned.push(*new_point);
            Cow::Owned(owned)
        };

        self.snap_to_start(&trail)
            .or_else(|| self.self_intersection(&trail))
            .or_else(|| self.proximity_snap(&trail))
    }

    /// Number of leading points eligible for intersection and proximity search.
    ///
    /// Never reaches the edge adjacent to the newest one, even with a zero buffer.
    fn searchable_len(&self, n: usize) -> usize {
        n.saturating_sub(1 + self.config.trailing_buffer)
            .min(n.saturating_sub(2))
    }

    fn snap_to_start(&self, trail: &[GpsPoint]) -> Option<LoopResult> {
        let start = trail[0];
        let newest = trail[trail.len() - 1];
        let gap = haversine_distance(&newest, &start);
        if gap > self.config.snap_to_start_m {
            return None;
        }

        let mut ring = trail.to_vec();
        ring.push(start);
        self.validate(&ring, ClosureKind::SnapToStart, 0, start)
    }

    fn self_intersection(&self, trail: &[GpsPoint]) -> Option<LoopResult> {
        let n = trail.len();
        let (a, b) = (&trail[n - 2], &trail[n - 1]);
        let searchable = self.searchable_len(n);

        let (i, crossing) = trail[..searchable]
            .windows(2)
            .enumerate()
            .find_map(|(i, edge)| segment_intersection(a, b, &edge[0], &edge[1]).map(|x| (i, x)))?;

        let mut ring = Vec::with_capacity(n - i + 1);
        ring.push(crossing);
        ring.extend_from_slice(&trail[i + 1..n - 1]);
        ring.push(crossing);
        self.validate(&ring, ClosureKind::SelfIntersection, i + 1, crossing)
    }

    fn proximity_snap(&self, trail: &[GpsPoint]) -> Option<LoopResult> {
        let n = trail.len();
        let newest = &trail[n - 1];
        let searchable = self.searchable_len(n);

        let j = trail[..searchable]
            .iter()
            .position(|p| haversine_distance(p, newest) <= self.config.proximity_snap_m)?;

        let mut ring = trail[j..].to_vec();
        ring.push(trail[j]);
        self.validate(&ring, ClosureKind::ProximitySnap, j, trail[j])
    }

    /// Clean a candidate ring and run the perimeter, cell-count and extent checks.
    fn validate(
        &self,
        ring: &[GpsPoint],
        kind: ClosureKind,
        start_index: usize,
        closure_point: GpsPoint,
    ) -> Option<LoopResult> {
        let cfg = &self.config;

        let Some(polygon) = Polygon::clean(ring, cfg.dedup_epsilon) else {
            debug!("[Loop] {:?} candidate degenerate after cleaning", kind);
            return None;
        };

        let perimeter_m = polygon.perimeter_meters();
        if perimeter_m < cfg.min_loop_perimeter_m {
            debug!(
                "[Loop] {:?} rejected: perimeter {:.1}m < {:.1}m",
                kind, perimeter_m, cfg.min_loop_perimeter_m
            );
            return None;
        }

        let enclosed_cell_ids = enclosed_cells(&polygon, cfg);
        if enclosed_cell_ids.len() < cfg.min_enclosed_cells {
            debug!(
                "[Loop] {:?} rejected: {} cells < {}",
                kind,
                enclosed_cell_ids.len(),
                cfg.min_enclosed_cells
            );
            return None;
        }

        let bounds = polygon.bounds();
        let (width, height) = (bounds.width_meters(), bounds.height_meters());
        if width < cfg.min_loop_extent_m && height < cfg.min_loop_extent_m {
            debug!(
                "[Loop] {:?} rejected: extent {:.1}m x {:.1}m, both below {:.1}m",
                kind, width, height, cfg.min_loop_extent_m
            );
            return None;
        }

        info!(
            "[Loop] Captured via {:?}: {} cells, perimeter {:.0}m",
            kind,
            enclosed_cell_ids.len(),
            perimeter_m
        );

        Some(LoopResult {
            polygon,
            enclosed_cell_ids,
            closure_point,
            kind,
            start_index,
            perimeter_m,
        })
    }
}

/// Detect a closed loop with the given configuration.
///
/// Convenience wrapper around [`LoopDetector::detect`].
pub fn detect_closed_loop(
    path: &[GpsPoint],
    new_point: &GpsPoint,
    config: &TerritoryConfig,
) -> Option<LoopResult> {
    LoopDetector::new(config.clone()).detect(path, new_point)
}
