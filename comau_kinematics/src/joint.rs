//! DH parameters of a single revolute joint.

use serde::{Deserialize, Serialize};

use crate::errors::{KinematicsError, KinematicsResult};
use crate::transform::RigidTransform;

/// Which Denavit-Hartenberg convention a chain's parameters follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DhConvention {
    /// Craig standard DH: `Rz(theta) * Tz(d) * Tx(a) * Rx(alpha)`.
    #[default]
    Standard,
    /// Khalil modified DH: `Rx(alpha) * Tx(a) * Rz(theta) * Tz(d)`.
    Modified,
}

/// One of the four DH constants of a joint, used to address a parameter
/// when calibrating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DhParameter {
    /// `d`, distance along the previous joint axis.
    LinkOffset,
    /// `a`, distance along the common normal.
    LinkLength,
    /// `alpha`, angle between consecutive joint axes.
    LinkTwist,
    /// Constant bias added to the joint variable.
    AngleOffset,
}

impl DhParameter {
    pub fn name(&self) -> &'static str {
        match self {
            DhParameter::LinkOffset => "link_offset",
            DhParameter::LinkLength => "link_length",
            DhParameter::LinkTwist => "link_twist",
            DhParameter::AngleOffset => "angle_offset",
        }
    }
}

/// DH constants and mechanical limits of one revolute joint.
///
/// Lengths share the chain's unit (meters for the COMAU preset), angles are
/// radians. The limits are metadata for callers building search ranges or UI
/// sliders; [`JointSpec::transform`] never clamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawJointSpec")]
pub struct JointSpec {
    link_offset: f64,
    link_length: f64,
    link_twist: f64,
    angle_offset: f64,
    angle_min: f64,
    angle_max: f64,
}

impl JointSpec {
    /// Build a joint with unlimited travel.
    ///
    /// # Errors
    /// Fails if any constant is not finite.
    pub fn new(
        link_offset: f64,
        link_length: f64,
        link_twist: f64,
        angle_offset: f64,
    ) -> KinematicsResult<Self> {
        Self {
            link_offset,
            link_length,
            link_twist,
            angle_offset,
            angle_min: f64::NEG_INFINITY,
            angle_max: f64::INFINITY,
        }
        .checked(0)
    }

    /// Replace the angle limits (radians).
    ///
    /// # Errors
    /// Fails if a limit is NaN or `min > max`.
    pub fn with_limits(self, angle_min: f64, angle_max: f64) -> KinematicsResult<Self> {
        Self {
            angle_min,
            angle_max,
            ..self
        }
        .checked(0)
    }

    /// Same as [`JointSpec::with_limits`] but with the limits given in degrees.
    pub fn with_limits_deg(self, min_deg: f64, max_deg: f64) -> KinematicsResult<Self> {
        self.with_limits(min_deg.to_radians(), max_deg.to_radians())
    }

    pub fn link_offset(&self) -> f64 {
        self.link_offset
    }

    pub fn link_length(&self) -> f64 {
        self.link_length
    }

    pub fn link_twist(&self) -> f64 {
        self.link_twist
    }

    pub fn angle_offset(&self) -> f64 {
        self.angle_offset
    }

    pub fn angle_min(&self) -> f64 {
        self.angle_min
    }

    pub fn angle_max(&self) -> f64 {
        self.angle_max
    }

    /// Read one DH constant.
    pub fn parameter(&self, parameter: DhParameter) -> f64 {
        match parameter {
            DhParameter::LinkOffset => self.link_offset,
            DhParameter::LinkLength => self.link_length,
            DhParameter::LinkTwist => self.link_twist,
            DhParameter::AngleOffset => self.angle_offset,
        }
    }

    /// Copy of this joint with one DH constant replaced.
    ///
    /// # Errors
    /// Fails if `value` is not finite.
    pub fn with_parameter(&self, parameter: DhParameter, value: f64) -> KinematicsResult<Self> {
        let mut spec = *self;
        match parameter {
            DhParameter::LinkOffset => spec.link_offset = value,
            DhParameter::LinkLength => spec.link_length = value,
            DhParameter::LinkTwist => spec.link_twist = value,
            DhParameter::AngleOffset => spec.angle_offset = value,
        }
        spec.checked(0)
    }

    /// Whether `angle` (the joint variable, before the offset) is inside the limits.
    pub fn within_limits(&self, angle: f64) -> bool {
        angle >= self.angle_min && angle <= self.angle_max
    }

    /// Transform from the previous frame to this joint's frame for the joint
    /// variable `angle` (radians, offset not yet applied).
    #[inline]
    pub fn transform(&self, angle: f64, convention: DhConvention) -> RigidTransform {
        let theta = angle + self.angle_offset;
        match convention {
            DhConvention::Standard => RigidTransform::standard_dh(
                theta,
                self.link_offset,
                self.link_length,
                self.link_twist,
            ),
            DhConvention::Modified => RigidTransform::modified_dh(
                theta,
                self.link_offset,
                self.link_length,
                self.link_twist,
            ),
        }
    }

    /// Assemble a joint without validation.
    pub(crate) fn from_parts(
        link_offset: f64,
        link_length: f64,
        link_twist: f64,
        angle_offset: f64,
        angle_min: f64,
        angle_max: f64,
    ) -> Self {
        Self {
            link_offset,
            link_length,
            link_twist,
            angle_offset,
            angle_min,
            angle_max,
        }
    }

    /// Validate all fields, reporting errors against joint index `joint`.
    pub(crate) fn checked(self, joint: usize) -> KinematicsResult<Self> {
        let constants = [
            ("link_offset", self.link_offset),
            ("link_length", self.link_length),
            ("link_twist", self.link_twist),
            ("angle_offset", self.angle_offset),
        ];
        for (field, value) in constants {
            if !value.is_finite() {
                return Err(KinematicsError::NonFiniteParameter { joint, field, value });
            }
        }
        // Infinite limits mean "unlimited"; NaN is never meaningful.
        for (field, value) in [("angle_min", self.angle_min), ("angle_max", self.angle_max)] {
            if value.is_nan() {
                return Err(KinematicsError::NonFiniteParameter { joint, field, value });
            }
        }
        if self.angle_min > self.angle_max {
            return Err(KinematicsError::InvertedLimits {
                joint,
                min: self.angle_min,
                max: self.angle_max,
            });
        }
        Ok(self)
    }
}

/// Unvalidated wire form of [`JointSpec`].
#[derive(Deserialize)]
struct RawJointSpec {
    link_offset: f64,
    link_length: f64,
    link_twist: f64,
    #[serde(default)]
    angle_offset: f64,
    #[serde(default = "neg_infinity")]
    angle_min: f64,
    #[serde(default = "infinity")]
    angle_max: f64,
}

fn neg_infinity() -> f64 {
    f64::NEG_INFINITY
}

fn infinity() -> f64 {
    f64::INFINITY
}

impl TryFrom<RawJointSpec> for JointSpec {
    type Error = KinematicsError;

    fn try_from(raw: RawJointSpec) -> Result<Self, Self::Error> {
        JointSpec {
            link_offset: raw.link_offset,
            link_length: raw.link_length,
            link_twist: raw.link_twist,
            angle_offset: raw.angle_offset,
            angle_min: raw.angle_min,
            angle_max: raw.angle_max,
        }
        .checked(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rejects_non_finite_constants() {
        let err = JointSpec::new(f64::NAN, 0.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::NonFiniteParameter { field: "link_offset", .. }
        ));

        let err = JointSpec::new(0.0, 0.0, f64::INFINITY, 0.0).unwrap_err();
        assert!(matches!(
            err,
            KinematicsError::NonFiniteParameter { field: "link_twist", .. }
        ));
    }

    #[test]
    fn rejects_inverted_limits() {
        let spec = JointSpec::new(0.0, 0.59, 0.0, FRAC_PI_2).unwrap();
        assert!(matches!(
            spec.with_limits(1.0, -1.0),
            Err(KinematicsError::InvertedLimits { .. })
        ));
    }

    #[test]
    fn offset_is_added_to_the_joint_variable() {
        let with_offset = JointSpec::new(0.0, 0.59, 0.0, FRAC_PI_2).unwrap();
        let without = JointSpec::new(0.0, 0.59, 0.0, 0.0).unwrap();

        let a = with_offset.transform(0.0, DhConvention::Standard);
        let b = without.transform(FRAC_PI_2, DhConvention::Standard);
        assert_eq!(a, b);
        assert_relative_eq!(a.translation().y, 0.59, epsilon = 1e-12);
    }

    #[test]
    fn limits_are_not_applied_by_the_transform() {
        let spec = JointSpec::new(0.45, 0.101, FRAC_PI_2, 0.0)
            .unwrap()
            .with_limits_deg(-170.0, 170.0)
            .unwrap();
        assert!(!spec.within_limits(3.5));
        let beyond = spec.transform(3.5, DhConvention::Standard);
        let expected = RigidTransform::standard_dh(3.5, 0.45, 0.101, FRAC_PI_2);
        assert_eq!(beyond, expected);
    }

    #[test]
    fn with_parameter_replaces_one_constant() {
        let spec = JointSpec::new(0.45, 0.0, FRAC_PI_2, 0.0).unwrap();
        let calibrated = spec.with_parameter(DhParameter::LinkLength, 0.101).unwrap();
        assert_eq!(calibrated.link_length(), 0.101);
        assert_eq!(calibrated.link_offset(), 0.45);
        assert_eq!(spec.link_length(), 0.0);
        assert!(spec.with_parameter(DhParameter::LinkOffset, f64::NAN).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let ok: JointSpec =
            serde_json::from_str(r#"{"link_offset":0.45,"link_length":0.101,"link_twist":1.5}"#)
                .unwrap();
        assert_eq!(ok.angle_offset(), 0.0);
        assert!(ok.within_limits(100.0));

        let inverted = serde_json::from_str::<JointSpec>(
            r#"{"link_offset":0,"link_length":0,"link_twist":0,"angle_min":1,"angle_max":-1}"#,
        );
        assert!(inverted.is_err());
    }
}
