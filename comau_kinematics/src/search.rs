//! Exhaustive grid search for joint configurations that reach a tip position.
//!
//! This is approximate inverse kinematics by brute force: every tuple of the
//! per-joint sample grids is evaluated and every tuple whose tip lands within
//! tolerance of the target is kept. Joint 1 varies slowest and the last joint
//! fastest, and the parallel search returns the same ordering as the
//! sequential one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use nalgebra::Vector3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chain::KinematicChain;
use crate::errors::{KinematicsError, KinematicsResult};
use crate::range::AngleRange;
use crate::result::{first_minimum, SearchResult};

/// Default match distance for the grid search: 50 mm at meter scale.
pub const DEFAULT_SEARCH_TOLERANCE: f64 = 0.05;

/// Search scope: one range per joint plus the match rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub ranges: Vec<AngleRange>,
    /// A tuple matches when its error is strictly below this distance.
    pub tolerance: f64,
    /// Skip tuples that put any joint outside its limits.
    #[serde(default)]
    pub respect_limits: bool,
}

impl SearchConfig {
    pub fn new(ranges: Vec<AngleRange>) -> Self {
        Self {
            ranges,
            tolerance: DEFAULT_SEARCH_TOLERANCE,
            respect_limits: false,
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_respect_limits(mut self, respect_limits: bool) -> Self {
        self.respect_limits = respect_limits;
        self
    }

    /// Grid used for the COMAU Table 2 poses: q1 0..90/15, q2 -90..180/15,
    /// q3 -90..90/15, q4 and q5 0..90/30, q6 held at zero (degrees).
    pub fn comau_wide() -> Self {
        Self::new(vec![
            AngleRange::degrees(0.0, 90.0, 15.0),
            AngleRange::degrees(-90.0, 180.0, 15.0),
            AngleRange::degrees(-90.0, 90.0, 15.0),
            AngleRange::degrees(0.0, 90.0, 30.0),
            AngleRange::degrees(0.0, 90.0, 30.0),
            AngleRange::fixed(0.0),
        ])
    }

    /// Number of tuples in the grid, saturating at `usize::MAX`.
    pub fn grid_size(&self) -> usize {
        self.ranges
            .iter()
            .fold(1usize, |total, range| total.saturating_mul(range.len()))
    }

    /// Checks the configuration against `chain` and returns the grid size.
    fn validate(&self, chain: &KinematicChain) -> KinematicsResult<usize> {
        if self.ranges.len() != chain.dof() {
            return Err(KinematicsError::AngleCount {
                expected: chain.dof(),
                actual: self.ranges.len(),
            });
        }
        for range in &self.ranges {
            range.validate()?;
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(KinematicsError::InvalidTolerance(self.tolerance));
        }
        self.ranges
            .iter()
            .try_fold(1usize, |total, range| total.checked_mul(range.len()))
            .ok_or_else(|| {
                KinematicsError::InvalidRange(format!(
                    "grid of {} ranges has more tuples than fit in usize",
                    self.ranges.len()
                ))
            })
    }
}

/// Everything a finished (or cancelled) search found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Tuples within tolerance, in enumeration order.
    pub matches: Vec<SearchResult<Vec<f64>>>,
    /// Best tuple seen, whether or not it matched. Earliest wins ties.
    pub closest: Option<SearchResult<Vec<f64>>>,
    /// Tuples actually evaluated (excludes those skipped for limits).
    pub evaluated: usize,
    pub cancelled: bool,
}

impl SearchOutcome {
    /// Lowest-error match; earliest wins ties.
    pub fn best(&self) -> Option<&SearchResult<Vec<f64>>> {
        first_minimum(&self.matches)
    }

    /// The whole grid was searched and nothing was within tolerance.
    pub fn is_exhausted(&self) -> bool {
        self.matches.is_empty() && !self.cancelled
    }
}

/// Runs a [`SearchConfig`] against a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSearcher {
    config: SearchConfig,
}

impl ConfigurationSearcher {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Sequential search over the whole grid.
    ///
    /// # Errors
    /// Fails if the number of ranges differs from the chain's joint count, a
    /// range is invalid, or the tolerance is negative or non-finite. Finding
    /// nothing is not an error.
    pub fn search(
        &self,
        chain: &KinematicChain,
        target: &Vector3<f64>,
    ) -> KinematicsResult<SearchOutcome> {
        self.search_with_cancel(chain, target, &AtomicBool::new(false))
    }

    /// Sequential search that stops before the next tuple once `cancel` is set.
    pub fn search_with_cancel(
        &self,
        chain: &KinematicChain,
        target: &Vector3<f64>,
        cancel: &AtomicBool,
    ) -> KinematicsResult<SearchOutcome> {
        self.walk(chain, target, || cancel.load(Ordering::Relaxed))
    }

    /// Odometer walk over the grid; `stop` is polled before every tuple.
    fn walk(
        &self,
        chain: &KinematicChain,
        target: &Vector3<f64>,
        stop: impl Fn() -> bool,
    ) -> KinematicsResult<SearchOutcome> {
        let total = self.config.validate(chain)?;
        let samples: Vec<Vec<f64>> = self.config.ranges.iter().map(AngleRange::values).collect();
        let started = Instant::now();
        info!(
            chain = chain.name(),
            grid = total,
            tolerance = self.config.tolerance,
            "starting configuration search"
        );

        let mut partial = Partial::default();
        let mut index = vec![0usize; samples.len()];
        let mut angles: Vec<f64> = samples.iter().map(|s| s[0]).collect();

        'grid: loop {
            if stop() {
                partial.cancelled = true;
                break;
            }
            partial.visit(self.evaluate(chain, &angles, target), 0);

            // Odometer step: the last joint turns fastest.
            let mut joint = samples.len();
            loop {
                if joint == 0 {
                    break 'grid;
                }
                joint -= 1;
                index[joint] += 1;
                if index[joint] < samples[joint].len() {
                    angles[joint] = samples[joint][index[joint]];
                    break;
                }
                index[joint] = 0;
                angles[joint] = samples[joint][0];
            }
        }

        Ok(self.finish(partial, started))
    }

    /// Parallel search over the flattened grid; same result as [`ConfigurationSearcher::search`].
    pub fn par_search(
        &self,
        chain: &KinematicChain,
        target: &Vector3<f64>,
    ) -> KinematicsResult<SearchOutcome> {
        self.par_search_with_cancel(chain, target, &AtomicBool::new(false))
    }

    /// Parallel search; workers stop picking up tuples once `cancel` is set.
    pub fn par_search_with_cancel(
        &self,
        chain: &KinematicChain,
        target: &Vector3<f64>,
        cancel: &AtomicBool,
    ) -> KinematicsResult<SearchOutcome> {
        let total = self.config.validate(chain)?;
        let samples: Vec<Vec<f64>> = self.config.ranges.iter().map(AngleRange::values).collect();
        let started = Instant::now();
        info!(
            chain = chain.name(),
            grid = total,
            tolerance = self.config.tolerance,
            threads = rayon::current_num_threads(),
            "starting parallel configuration search"
        );

        let mut partial = (0..total)
            .into_par_iter()
            .fold(Partial::default, |mut acc, flat| {
                if cancel.load(Ordering::Relaxed) {
                    acc.cancelled = true;
                    return acc;
                }
                let angles = decode(&samples, flat);
                acc.visit(self.evaluate(chain, &angles, target), flat);
                acc
            })
            .reduce(Partial::default, Partial::merge);

        partial.matches.sort_by_key(|(flat, _)| *flat);
        Ok(self.finish(partial, started))
    }

    /// `None` when the tuple is skipped for limits.
    #[inline]
    fn evaluate(
        &self,
        chain: &KinematicChain,
        angles: &[f64],
        target: &Vector3<f64>,
    ) -> Option<(SearchResult<Vec<f64>>, bool)> {
        if self.config.respect_limits
            && chain
                .joints()
                .iter()
                .zip(angles)
                .any(|(joint, angle)| !joint.within_limits(*angle))
        {
            return None;
        }
        let position = chain.tip_unchecked(angles).translation();
        let result = SearchResult::new(angles.to_vec(), position, target);
        let matched = result.error < self.config.tolerance;
        if matched {
            debug!(angles_deg = ?result.angles_deg(), error = result.error, "match");
        }
        Some((result, matched))
    }

    fn finish(&self, partial: Partial, started: Instant) -> SearchOutcome {
        let outcome = SearchOutcome {
            matches: partial.matches.into_iter().map(|(_, r)| r).collect(),
            closest: partial.closest.map(|(_, r)| r),
            evaluated: partial.evaluated,
            cancelled: partial.cancelled,
        };
        info!(
            matches = outcome.matches.len(),
            evaluated = outcome.evaluated,
            cancelled = outcome.cancelled,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "configuration search finished"
        );
        outcome
    }
}

/// Angle tuple at position `flat` of the grid, last joint fastest.
fn decode(samples: &[Vec<f64>], mut flat: usize) -> Vec<f64> {
    let mut angles = vec![0.0; samples.len()];
    for (angle, values) in angles.iter_mut().zip(samples).rev() {
        *angle = values[flat % values.len()];
        flat /= values.len();
    }
    angles
}

/// Search state for one slice of the grid, tagged with flat indices so
/// slices can be merged back into enumeration order.
#[derive(Default)]
struct Partial {
    matches: Vec<(usize, SearchResult<Vec<f64>>)>,
    closest: Option<(usize, SearchResult<Vec<f64>>)>,
    evaluated: usize,
    cancelled: bool,
}

impl Partial {
    fn visit(&mut self, evaluated: Option<(SearchResult<Vec<f64>>, bool)>, flat: usize) {
        let Some((result, matched)) = evaluated else {
            return;
        };
        self.evaluated += 1;
        let closer = match &self.closest {
            Some((_, best)) => result.error < best.error,
            None => true,
        };
        if matched {
            if closer {
                self.closest = Some((flat, result.clone()));
            }
            self.matches.push((flat, result));
        } else if closer {
            self.closest = Some((flat, result));
        }
    }

    fn merge(mut self, other: Partial) -> Partial {
        self.matches.extend(other.matches);
        self.evaluated += other.evaluated;
        self.cancelled |= other.cancelled;
        self.closest = match (self.closest, other.closest) {
            (Some(a), Some(b)) => {
                if b.1.error < a.1.error || (b.1.error == a.1.error && b.0 < a.0) {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (a, b) => a.or(b),
        };
        self
    }
}
