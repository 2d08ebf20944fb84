//! Check a chain against known joint-angle / tip-position pairs.
//!
//! A case outside tolerance is a normal result and shows up in the report as
//! `passed: false`. Only malformed input (a case whose angle vector does not
//! fit the chain) makes [`Validator::validate`] fail.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::chain::KinematicChain;
use crate::errors::{KinematicsError, KinematicsResult};

/// Default pass/fail distance: 50 mm at meter scale.
pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// A named joint configuration with the tip position it should produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCase {
    pub name: String,
    /// Joint variables in radians.
    pub angles: Vec<f64>,
    /// Expected tip position, same length unit as the chain.
    pub target: Vector3<f64>,
    #[serde(default)]
    pub description: String,
}

impl ReferenceCase {
    pub fn new(
        name: impl Into<String>,
        angles: Vec<f64>,
        target: Vector3<f64>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            angles,
            target,
            description: description.into(),
        }
    }
}

/// Result of one reference case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseOutcome {
    pub name: String,
    pub description: String,
    pub angles: Vec<f64>,
    pub calculated: Vector3<f64>,
    pub reference: Vector3<f64>,
    /// Euclidean distance between `calculated` and `reference`.
    pub error: f64,
    pub passed: bool,
}

/// Per-case outcomes plus the tolerance they were judged against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub tolerance: f64,
    pub cases: Vec<CaseOutcome>,
}

impl ValidationReport {
    /// True when every case is within tolerance (vacuously true for no cases).
    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.cases.iter().filter(|c| !c.passed)
    }

    pub fn max_error(&self) -> Option<f64> {
        self.cases.iter().map(|c| c.error).reduce(f64::max)
    }
}

/// Runs reference cases through a chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    tolerance: f64,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pass/fail distance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Evaluate every case and classify it against the tolerance.
    ///
    /// # Errors
    /// Fails on a negative or non-finite tolerance, or when a case's angle
    /// vector does not match the chain.
    pub fn validate(
        &self,
        chain: &KinematicChain,
        cases: &[ReferenceCase],
    ) -> KinematicsResult<ValidationReport> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(KinematicsError::InvalidTolerance(self.tolerance));
        }

        let mut outcomes = Vec::with_capacity(cases.len());
        for case in cases {
            let calculated = chain.tip_position(&case.angles)?;
            let error = (calculated - case.target).norm();
            let passed = error <= self.tolerance;

            if passed {
                debug!(case = %case.name, error_mm = error * 1000.0, "reference case passed");
            } else {
                warn!(
                    case = %case.name,
                    error_mm = error * 1000.0,
                    tolerance_mm = self.tolerance * 1000.0,
                    "reference case outside tolerance"
                );
            }

            outcomes.push(CaseOutcome {
                name: case.name.clone(),
                description: case.description.clone(),
                angles: case.angles.clone(),
                calculated,
                reference: case.target,
                error,
                passed,
            });
        }

        let report = ValidationReport {
            tolerance: self.tolerance,
            cases: outcomes,
        };
        info!(
            chain = chain.name(),
            cases = report.cases.len(),
            failed = report.failures().count(),
            "validation finished"
        );
        Ok(report)
    }
}

fn fmt_point(p: &Vector3<f64>) -> String {
    format!("[{:.3}, {:.3}, {:.3}]", p.x, p.y, p.z)
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<8} {:<42} {:<24} {:<24} {:>10}",
            "Config", "Description", "Calculated", "Reference", "Error"
        )?;
        writeln!(f, "{}", "-".repeat(112))?;

        for case in &self.cases {
            writeln!(
                f,
                "{:<8} {:<42} {:<24} {:<24} {:>7.1}mm {}",
                case.name,
                case.description,
                fmt_point(&case.calculated),
                fmt_point(&case.reference),
                case.error * 1000.0,
                if case.passed { "✓" } else { "✗" },
            )?;

            if !case.passed {
                let degrees: Vec<String> = case
                    .angles
                    .iter()
                    .map(|a| format!("{:.1}°", a.to_degrees()))
                    .collect();
                let delta = case.calculated - case.reference;
                writeln!(f, "  └─> Angles: [{}]", degrees.join(", "))?;
                writeln!(
                    f,
                    "  └─> Error: ΔX={:.3}, ΔY={:.3}, ΔZ={:.3}",
                    delta.x, delta.y, delta.z
                )?;
            }
        }

        writeln!(f, "{}", "-".repeat(112))?;
        if self.all_passed() {
            write!(
                f,
                "✓ all {} cases within {:.0}mm",
                self.cases.len(),
                self.tolerance * 1000.0
            )
        } else {
            write!(
                f,
                "✗ {} of {} cases exceed {:.0}mm",
                self.failures().count(),
                self.cases.len(),
                self.tolerance * 1000.0
            )
        }
    }
}
