//! Serial kinematic chain built from DH joint specs.
//!
//! A [`KinematicChain`] is immutable once built. Evaluation walks the joints
//! once, multiplying each joint transform onto the running product, so frame
//! `i` is always `frame[i - 1] * joint_i(angle_i)`.

use std::fmt;

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::errors::{KinematicsError, KinematicsResult};
use crate::joint::{DhConvention, DhParameter, JointSpec};
use crate::transform::RigidTransform;

/// Ordered joints from base to tip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChain")]
pub struct KinematicChain {
    name: String,
    convention: DhConvention,
    joints: Vec<JointSpec>,
}

impl KinematicChain {
    /// Build a standard-DH chain.
    ///
    /// # Errors
    /// Fails on an empty joint list or a malformed joint.
    pub fn new(name: impl Into<String>, joints: Vec<JointSpec>) -> KinematicsResult<Self> {
        Self::with_convention(name, DhConvention::Standard, joints)
    }

    /// Build a chain whose parameters follow `convention`.
    pub fn with_convention(
        name: impl Into<String>,
        convention: DhConvention,
        joints: Vec<JointSpec>,
    ) -> KinematicsResult<Self> {
        if joints.is_empty() {
            return Err(KinematicsError::EmptyChain);
        }
        let joints = joints
            .into_iter()
            .enumerate()
            .map(|(i, joint)| joint.checked(i))
            .collect::<KinematicsResult<Vec<_>>>()?;

        Ok(Self {
            name: name.into(),
            convention,
            joints,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn convention(&self) -> DhConvention {
        self.convention
    }

    /// Number of joints.
    pub fn dof(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> &[JointSpec] {
        &self.joints
    }

    /// Copy of this chain with one DH constant of one joint replaced.
    ///
    /// # Errors
    /// Fails if `joint` is out of range or `value` is not finite.
    pub fn with_parameter(
        &self,
        joint: usize,
        parameter: DhParameter,
        value: f64,
    ) -> KinematicsResult<Self> {
        let spec = self.joints.get(joint).ok_or(KinematicsError::JointIndex {
            index: joint,
            len: self.joints.len(),
        })?;
        let replaced = spec.with_parameter(parameter, value).map_err(|e| match e {
            KinematicsError::NonFiniteParameter { field, value, .. } => {
                KinematicsError::NonFiniteParameter { joint, field, value }
            }
            other => other,
        })?;

        let mut chain = self.clone();
        chain.joints[joint] = replaced;
        Ok(chain)
    }

    /// Frames 0 (base, identity) through n (tip) for the given joint variables.
    ///
    /// # Errors
    /// Fails if `angles.len() != self.dof()` or an angle is not finite.
    pub fn evaluate(&self, angles: &[f64]) -> KinematicsResult<Vec<RigidTransform>> {
        self.check_angles(angles)?;

        let mut frames = Vec::with_capacity(self.joints.len() + 1);
        let mut current = RigidTransform::identity();
        frames.push(current);
        for (joint, &angle) in self.joints.iter().zip(angles) {
            current = current.compose(&joint.transform(angle, self.convention));
            frames.push(current);
        }
        Ok(frames)
    }

    /// Tip pose without materialising intermediate frames.
    pub fn tip(&self, angles: &[f64]) -> KinematicsResult<RigidTransform> {
        self.check_angles(angles)?;
        Ok(self.tip_unchecked(angles))
    }

    /// Tip position (translation of the tip pose).
    pub fn tip_position(&self, angles: &[f64]) -> KinematicsResult<Vector3<f64>> {
        Ok(self.tip(angles)?.translation())
    }

    /// Tip orientation (rotation block of the tip pose).
    pub fn tip_orientation(&self, angles: &[f64]) -> KinematicsResult<Matrix3<f64>> {
        Ok(self.tip(angles)?.rotation())
    }

    /// Origin of every frame, base first.
    pub fn frame_positions(&self, angles: &[f64]) -> KinematicsResult<Vec<Vector3<f64>>> {
        Ok(self
            .evaluate(angles)?
            .iter()
            .map(RigidTransform::translation)
            .collect())
    }

    /// Indices of joints whose variable lies outside its limits.
    ///
    /// # Errors
    /// Fails if `angles.len() != self.dof()`.
    pub fn limit_violations(&self, angles: &[f64]) -> KinematicsResult<Vec<usize>> {
        self.check_len(angles)?;
        Ok(self
            .joints
            .iter()
            .zip(angles)
            .enumerate()
            .filter(|(_, (joint, angle))| !joint.within_limits(**angle))
            .map(|(i, _)| i)
            .collect())
    }

    /// Running product over all joints. Callers guarantee the length.
    #[inline]
    pub(crate) fn tip_unchecked(&self, angles: &[f64]) -> RigidTransform {
        self.joints
            .iter()
            .zip(angles)
            .fold(RigidTransform::identity(), |acc, (joint, &angle)| {
                acc.compose(&joint.transform(angle, self.convention))
            })
    }

    pub(crate) fn check_len(&self, angles: &[f64]) -> KinematicsResult<()> {
        if angles.len() != self.joints.len() {
            return Err(KinematicsError::AngleCount {
                expected: self.joints.len(),
                actual: angles.len(),
            });
        }
        Ok(())
    }

    fn check_angles(&self, angles: &[f64]) -> KinematicsResult<()> {
        self.check_len(angles)?;
        if let Some((joint, &value)) = angles.iter().enumerate().find(|(_, a)| !a.is_finite()) {
            return Err(KinematicsError::NonFiniteAngle { joint, value });
        }
        Ok(())
    }
}

/// DH table, one row per joint, angles in degrees.
impl fmt::Display for KinematicChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({:?} DH)", self.name, self.convention)?;
        writeln!(
            f,
            "{:<6}|{:>9} |{:>9} |{:>9} |{:>9} | limits (deg)",
            "joint", "d", "a", "alpha", "offset"
        )?;
        writeln!(f, "{}", "-".repeat(70))?;
        for (i, joint) in self.joints.iter().enumerate() {
            writeln!(
                f,
                "{:<6}|{:>9.4} |{:>9.4} |{:>8.1}° |{:>8.1}° | [{:.1}, {:.1}]",
                i + 1,
                joint.link_offset(),
                joint.link_length(),
                joint.link_twist().to_degrees(),
                joint.angle_offset().to_degrees(),
                joint.angle_min().to_degrees(),
                joint.angle_max().to_degrees(),
            )?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawChain {
    name: String,
    #[serde(default)]
    convention: DhConvention,
    joints: Vec<JointSpec>,
}

impl TryFrom<RawChain> for KinematicChain {
    type Error = KinematicsError;

    fn try_from(raw: RawChain) -> Result<Self, Self::Error> {
        KinematicChain::with_convention(raw.name, raw.convention, raw.joints)
    }
}
