//! One-dimensional calibration of a single DH constant.
//!
//! The calibrator substitutes every candidate value of one constant into a
//! copy of the chain, evaluates the copy at a reference pose, and keeps the
//! candidate whose tip lands closest to the reference position. The result is
//! only optimal on the sampled grid.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chain::KinematicChain;
use crate::errors::{KinematicsError, KinematicsResult};
use crate::joint::DhParameter;
use crate::range::ScanRange;
use crate::result::{first_minimum, SearchResult};
use crate::validation::ReferenceCase;

/// Which constant to scan and over which values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterCalibrator {
    /// Zero-based joint index.
    pub joint: usize,
    pub parameter: DhParameter,
    pub range: ScanRange,
}

impl ParameterCalibrator {
    pub fn new(joint: usize, parameter: DhParameter, range: ScanRange) -> Self {
        Self {
            joint,
            parameter,
            range,
        }
    }

    /// Joint 1 link length over 0..=0.2 m in 1 mm steps.
    pub fn base_link_length() -> Self {
        Self::new(0, DhParameter::LinkLength, ScanRange::new(0.0, 0.2, 0.001))
    }

    /// Every candidate in ascending order with the tip position it produced.
    ///
    /// # Errors
    /// Fails on an invalid range, a joint index outside the chain, or a case
    /// whose angles do not fit the chain.
    pub fn scan(
        &self,
        chain: &KinematicChain,
        case: &ReferenceCase,
    ) -> KinematicsResult<Vec<SearchResult<f64>>> {
        self.range.validate()?;
        if self.joint >= chain.dof() {
            return Err(KinematicsError::JointIndex {
                index: self.joint,
                len: chain.dof(),
            });
        }
        chain.check_len(&case.angles)?;

        info!(
            chain = chain.name(),
            joint = self.joint + 1,
            parameter = self.parameter.name(),
            candidates = self.range.len(),
            "scanning DH constant"
        );

        let mut results = Vec::with_capacity(self.range.len());
        for value in self.range.values() {
            let candidate = chain.with_parameter(self.joint, self.parameter, value)?;
            let position = candidate.tip_position(&case.angles)?;
            let result = SearchResult::new(value, position, &case.target);
            debug!(value, error = result.error, "candidate evaluated");
            results.push(result);
        }
        Ok(results)
    }

    /// The candidate with the smallest error. Ties go to the lowest value.
    ///
    /// # Errors
    /// Same as [`ParameterCalibrator::scan`].
    pub fn calibrate(
        &self,
        chain: &KinematicChain,
        case: &ReferenceCase,
    ) -> KinematicsResult<SearchResult<f64>> {
        let results = self.scan(chain, case)?;
        // A validated range always yields at least one candidate.
        let best = first_minimum(&results)
            .cloned()
            .ok_or_else(|| KinematicsError::InvalidRange(format!("{:?} is empty", self.range)))?;

        info!(
            joint = self.joint + 1,
            parameter = self.parameter.name(),
            value = best.candidate,
            error_mm = best.error * 1000.0,
            "calibration finished"
        );
        Ok(best)
    }
}
