//! GPS fix filtering.
//!
//! Raw fixes are gated on reported accuracy and then smoothed with an
//! exponential moving average against the previous accepted point.

use log::debug;

use crate::{GpsPoint, TerritoryConfig};

/// Accuracy gate plus EMA smoothing for incoming fixes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixFilter {
    /// Fixes with a larger accuracy radius (meters) are dropped.
    pub accuracy_threshold: f64,
    /// Weight of the newest fix.
    pub alpha: f64,
    /// Pass everything through untouched.
    pub test_mode: bool,
}

impl Default for FixFilter {
    fn default() -> Self {
        Self::from_config(&TerritoryConfig::default())
    }
}

impl FixFilter {
    pub fn from_config(config: &TerritoryConfig) -> Self {
        Self {
            accuracy_threshold: config.accuracy_threshold,
            alpha: config.ema_alpha,
            test_mode: config.test_mode,
        }
    }

    /// Filter one raw fix against the previous accepted point.
    ///
    /// Returns `None` when the fix is rejected. The first fix of a path
    /// (`previous == None`) is always accepted as-is, whatever its accuracy.
    /// Accuracy and timestamp of the result always come from `raw`.
    pub fn filter(&self, raw: &GpsPoint, previous: Option<&GpsPoint>) -> Option<GpsPoint> {
        if self.test_mode {
            return Some(*raw);
        }

        let Some(prev) = previous else {
            return Some(*raw);
        };

        if let Some(accuracy) = raw.accuracy {
            if accuracy > self.accuracy_threshold {
                debug!(
                    "[Filter] Dropping fix at t={} (accuracy {:.0}m > {:.0}m)",
                    raw.timestamp, accuracy, self.accuracy_threshold
                );
                return None;
            }
        }

        Some(GpsPoint {
            latitude: self.alpha * raw.latitude + (1.0 - self.alpha) * prev.latitude,
            longitude: self.alpha * raw.longitude + (1.0 - self.alpha) * prev.longitude,
            accuracy: raw.accuracy,
            timestamp: raw.timestamp,
        })
    }
}

/// Filter a fix with an explicit mode flag, using default thresholds.
pub fn filter_fix(raw: &GpsPoint, previous: Option<&GpsPoint>, test_mode: bool) -> Option<GpsPoint> {
    FixFilter {
        test_mode,
        ..FixFilter::default()
    }
    .filter(raw, previous)
}
