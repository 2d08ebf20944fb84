//! Evenly spaced sample ranges for the calibration scan and the grid search.

use serde::{Deserialize, Serialize};

use crate::errors::{KinematicsError, KinematicsResult};

/// Upper bound on the samples of one range.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Samples `start, start + step, ...` up to and including `end` when `end`
/// lies on the grid.
///
/// Values are `start + i * step`, never accumulated, so sample `i` is the
/// same number no matter how the range is walked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl ScanRange {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    /// A single sample at `value`; holds a joint fixed during a search.
    pub fn fixed(value: f64) -> Self {
        Self {
            start: value,
            end: value,
            step: 1.0,
        }
    }

    /// Range given in degrees, sampled in radians.
    pub fn degrees(start: f64, end: f64, step: f64) -> Self {
        Self {
            start: start.to_radians(),
            end: end.to_radians(),
            step: step.to_radians(),
        }
    }

    /// Check that the range can be sampled.
    ///
    /// # Errors
    /// Non-finite bounds, a non-positive step, `end < start`, or more than
    /// [`MAX_SAMPLES`] samples.
    pub fn validate(&self) -> KinematicsResult<()> {
        if !(self.start.is_finite() && self.end.is_finite() && self.step.is_finite()) {
            return Err(KinematicsError::InvalidRange(format!(
                "bounds must be finite: {self:?}"
            )));
        }
        if self.step <= 0.0 {
            return Err(KinematicsError::InvalidRange(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if self.end < self.start {
            return Err(KinematicsError::InvalidRange(format!(
                "end {} is below start {}",
                self.end, self.start
            )));
        }
        let intervals = self.intervals();
        if !intervals.is_finite() || intervals >= MAX_SAMPLES as f64 {
            return Err(KinematicsError::InvalidRange(format!(
                "step {} gives more than {MAX_SAMPLES} samples over [{}, {}]",
                self.step, self.start, self.end
            )));
        }
        Ok(())
    }

    // The epsilon keeps an end that sits on the grid from being lost to rounding.
    fn intervals(&self) -> f64 {
        ((self.end - self.start) / self.step + 1e-9).floor()
    }

    /// Number of samples. Assumes a validated range.
    pub fn len(&self) -> usize {
        (self.intervals() as usize).saturating_add(1)
    }

    /// Always false for a validated range.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample `i`.
    #[inline]
    pub fn value(&self, i: usize) -> f64 {
        self.start + i as f64 * self.step
    }

    /// All samples in ascending order.
    pub fn values(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.value(i)).collect()
    }
}

/// Per-joint angle range for the grid search, in radians.
pub type AngleRange = ScanRange;
