//! Result type shared by the calibration scan and the grid search.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A candidate (a DH constant value or a joint-angle vector) together with
/// the tip position it produced and that position's distance to the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult<C> {
    pub candidate: C,
    pub position: Vector3<f64>,
    pub error: f64,
}

impl<C> SearchResult<C> {
    pub fn new(candidate: C, position: Vector3<f64>, target: &Vector3<f64>) -> Self {
        Self {
            candidate,
            error: (position - target).norm(),
            position,
        }
    }
}

impl SearchResult<Vec<f64>> {
    /// Candidate angles converted to degrees.
    pub fn angles_deg(&self) -> Vec<f64> {
        self.candidate.iter().map(|a| a.to_degrees()).collect()
    }
}

/// First result with the smallest error; earlier entries win ties.
pub fn first_minimum<C>(results: &[SearchResult<C>]) -> Option<&SearchResult<C>> {
    results.iter().fold(None, |best: Option<&SearchResult<C>>, r| match best {
        Some(b) if b.error <= r.error => Some(b),
        _ => Some(r),
    })
}
