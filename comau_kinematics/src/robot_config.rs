//! Robot configuration for the COMAU Smart Six 6-1.4
//!
//! DH table from Guida et al. (2019), "Multibody Model of the COMAU Smart Six
//! 6-1.4 Industrial Robot", IOP Conf. Ser.: Mater. Sci. Eng. 568 012115, with
//! the corrections needed to reproduce the paper's Table 2 positions:
//! - a1 = 0.101 m, found by scanning joint 1 link length against the home pose
//! - joint 2 carries a +90° offset (paper's zero is shoulder horizontal)
//! - d4 = 0.674 m (Table 1 prints 0.647)

use std::f64::consts::FRAC_PI_2;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::chain::KinematicChain;
use crate::errors::KinematicsResult;
use crate::joint::{DhConvention, JointSpec};
use crate::validation::ReferenceCase;

/// One row of a DH table as written in a datasheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DhRow {
    /// Link offset d
    pub d: f64,
    /// Link length a
    pub a: f64,
    /// Link twist alpha (radians)
    pub alpha: f64,
    /// Joint angle offset (radians)
    pub offset: f64,
    /// Joint limits [min, max] in degrees
    pub limits_deg: [f64; 2],
}

impl DhRow {
    /// Unvalidated joint; the chain constructor checks it with its index.
    fn to_spec(self) -> JointSpec {
        JointSpec::from_parts(
            self.d,
            self.a,
            self.alpha,
            self.offset,
            self.limits_deg[0].to_radians(),
            self.limits_deg[1].to_radians(),
        )
    }
}

/// Robot configuration: DH table plus the reference poses used to check it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Human-readable model name
    pub name: String,

    #[serde(default)]
    pub convention: DhConvention,

    /// DH rows, base joint first
    pub rows: Vec<DhRow>,

    /// Known joint-angle / tip-position pairs
    #[serde(default)]
    pub reference_cases: Vec<ReferenceCase>,
}

impl RobotConfig {
    /// Calibrated COMAU Smart Six 6-1.4 (meters, radians).
    ///
    /// Joint | d     | a     | alpha | offset | limits (deg)
    /// ------|-------|-------|-------|--------|-------------
    /// 1     | 0.45  | 0.101 | 90°   | 0°     | ±170
    /// 2     | 0     | 0.59  | 0°    | 90°    | -85 … 155
    /// 3     | 0     | 0.13  | 90°   | 0°     | -170 … 158
    /// 4     | 0.674 | 0     | -90°  | 0°     | ±270
    /// 5     | 0     | 0     | 90°   | 0°     | ±130
    /// 6     | 0.095 | 0     | 0°    | 0°     | ±270
    pub fn comau_smart_six() -> Self {
        let row = |d, a, alpha, offset, min, max| DhRow {
            d,
            a,
            alpha,
            offset,
            limits_deg: [min, max],
        };

        Self {
            name: "COMAU Smart Six 6-1.4".to_string(),
            convention: DhConvention::Standard,
            rows: vec![
                row(0.45, 0.101, FRAC_PI_2, 0.0, -170.0, 170.0),
                row(0.0, 0.59, 0.0, FRAC_PI_2, -85.0, 155.0),
                row(0.0, 0.13, FRAC_PI_2, 0.0, -170.0, 158.0),
                row(0.674, 0.0, -FRAC_PI_2, 0.0, -270.0, 270.0),
                row(0.0, 0.0, FRAC_PI_2, 0.0, -130.0, 130.0),
                row(0.095, 0.0, 0.0, 0.0, -270.0, 270.0),
            ],
            reference_cases: comau_reference_cases(),
        }
    }

    /// Validated chain for this configuration.
    ///
    /// # Errors
    /// Fails if the table is empty or a row is malformed.
    pub fn chain(&self) -> KinematicsResult<KinematicChain> {
        let joints = self.rows.iter().map(|row| row.to_spec()).collect();
        KinematicChain::with_convention(self.name.clone(), self.convention, joints)
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self::comau_smart_six()
    }
}

/// Table 2 of the paper. q_s and q_n angles are the best grid-search matches
/// for the published positions (21.1 mm and 13.1 mm off respectively).
pub fn comau_reference_cases() -> Vec<ReferenceCase> {
    let deg = |q: [f64; 6]| q.iter().map(|a| a.to_radians()).collect::<Vec<_>>();

    vec![
        ReferenceCase::new(
            "q_z",
            vec![0.0; 6],
            Vector3::new(0.87, 0.0, 1.17),
            "Home/ready position, all joints at zero",
        ),
        ReferenceCase::new(
            "q_r",
            deg([90.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            Vector3::new(0.0, 0.87, 1.17),
            "90° rotation around the base",
        ),
        ReferenceCase::new(
            "q_s",
            deg([0.0, 45.0, -60.0, 0.0, 60.0, 0.0]),
            Vector3::new(0.45, 0.0, 0.87),
            "Singular configuration",
        ),
        ReferenceCase::new(
            "q_n",
            deg([0.0, -45.0, 0.0, 0.0, 60.0, 0.0]),
            Vector3::new(1.19, 0.0, 0.501),
            "Numerical example configuration",
        ),
    ]
}
