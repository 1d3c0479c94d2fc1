//! Capture session: the per-player pipeline.
//!
//! Each incoming fix runs filter → append → detect exactly once, to
//! completion, before the next fix is accepted. The session owns its live
//! path exclusively and hands the detector a read-only view of it.

use log::debug;

use crate::error::Result;
use crate::{
    AfterCapture, CellId, FixFilter, GpsPoint, LoopDetector, LoopResult, TerritoryConfig,
    Territory,
};

/// What happened to one fix.
#[derive(Debug, Clone)]
pub enum FixOutcome {
    /// Dropped by the filter (or carried invalid coordinates).
    Rejected,
    /// Added to the path; no loop yet.
    Appended,
    /// Added to the path and closed a loop.
    Captured(LoopResult),
}

impl FixOutcome {
    pub fn is_capture(&self) -> bool {
        matches!(self, FixOutcome::Captured(_))
    }
}

/// Live capture state for one player.
#[derive(Debug)]
pub struct CaptureSession {
    filter: FixFilter,
    detector: LoopDetector,
    after_capture: AfterCapture,
    path: Vec<GpsPoint>,
    territory: Territory,
    captures: usize,
    rejected: usize,
    last_claimed: Vec<CellId>,
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSession {
    /// Create a session with the default configuration.
    pub fn new() -> Self {
        Self::build(TerritoryConfig::default())
    }

    /// Create a session after validating `config`.
    pub fn with_config(config: TerritoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: TerritoryConfig) -> Self {
        Self {
            filter: FixFilter::from_config(&config),
            after_capture: config.after_capture,
            territory: Territory::new(config.grid_size),
            detector: LoopDetector::new(config),
            path: Vec::new(),
            captures: 0,
            rejected: 0,
            last_claimed: Vec::new(),
        }
    }

    /// Feed one raw fix through the pipeline.
    pub fn push_fix(&mut self, raw: GpsPoint) -> FixOutcome {
        if !raw.is_valid() {
            debug!("[Session] Ignoring fix with invalid coordinates at t={}", raw.timestamp);
            self.rejected += 1;
            return FixOutcome::Rejected;
        }

        let Some(fix) = self.filter.filter(&raw, self.path.last()) else {
            self.rejected += 1;
            return FixOutcome::Rejected;
        };

        self.path.push(fix);
        let Some(result) = self.detector.detect(&self.path, &fix) else {
            return FixOutcome::Appended;
        };

        self.captures += 1;
        self.last_claimed = self.territory.claim(&result);
        debug!(
            "[Session] Capture #{}: {} cells ({} new), path had {} points",
            self.captures,
            result.cell_count(),
            self.last_claimed.len(),
            self.path.len()
        );

        match self.after_capture {
            AfterCapture::Clear => self.path.clear(),
            AfterCapture::KeepLast => {
                self.path.clear();
                self.path.push(fix);
            }
        }

        FixOutcome::Captured(result)
    }

    /// The live (filtered) path.
    pub fn path(&self) -> &[GpsPoint] {
        &self.path
    }

    /// Drop the live path; claimed territory is kept.
    pub fn reset(&mut self) {
        self.path.clear();
    }

    pub fn territory(&self) -> &Territory {
        &self.territory
    }

    /// Cells first claimed by the most recent capture.
    pub fn last_claimed(&self) -> &[CellId] {
        &self.last_claimed
    }

    pub fn capture_count(&self) -> usize {
        self.captures
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected
    }

    pub fn config(&self) -> &TerritoryConfig {
        self.detector.config()
    }
}
