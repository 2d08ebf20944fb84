//! Error types for chain construction, evaluation and the numeric searches.
//!
//! Every variant is a usage error: the caller handed the engine something it
//! cannot evaluate. A validation case or a search that misses its tolerance is
//! reported as data, never as one of these.

use thiserror::Error;

/// Errors raised by the kinematics engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KinematicsError {
    /// Angle vector length does not match the number of joints in the chain.
    #[error("expected {expected} joint angles, got {actual}")]
    AngleCount {
        /// Number of joints in the chain.
        expected: usize,
        /// Number of angles supplied.
        actual: usize,
    },

    /// A joint angle is NaN or infinite.
    #[error("joint {joint} angle is not finite: {value}")]
    NonFiniteAngle {
        /// Zero-based joint index.
        joint: usize,
        /// The offending value.
        value: f64,
    },

    /// A DH constant or limit of a joint is NaN or infinite.
    #[error("joint {joint} field `{field}` is not finite: {value}")]
    NonFiniteParameter {
        /// Zero-based joint index.
        joint: usize,
        /// Field name.
        field: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Lower angle limit lies above the upper one.
    #[error("joint {joint} limits are inverted: min {min} > max {max}")]
    InvertedLimits {
        /// Zero-based joint index.
        joint: usize,
        /// Lower limit (radians).
        min: f64,
        /// Upper limit (radians).
        max: f64,
    },

    /// A chain needs at least one joint.
    #[error("kinematic chain has no joints")]
    EmptyChain,

    /// Joint index outside the chain.
    #[error("joint index {index} out of range for chain with {len} joints")]
    JointIndex {
        /// Requested index.
        index: usize,
        /// Number of joints in the chain.
        len: usize,
    },

    /// A scan or search range cannot be sampled.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// A tolerance is negative or not finite.
    #[error("invalid tolerance: {0}")]
    InvalidTolerance(f64),
}

/// Result type for kinematics operations.
pub type KinematicsResult<T> = Result<T, KinematicsError>;
