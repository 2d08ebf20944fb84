//! Denavit-Hartenberg forward kinematics for serial revolute arms, with the
//! calibrated COMAU Smart Six 6-1.4 as the reference robot.
//!
//! Beyond evaluating a chain, the crate checks it against known poses
//! ([`Validator`]), recovers an unknown DH constant by scanning
//! ([`ParameterCalibrator`]) and finds joint configurations for a tip position
//! by brute-force grid search ([`ConfigurationSearcher`]).

pub mod errors;
pub use errors::*;

pub mod transform;
pub use transform::RigidTransform;

pub mod joint;
pub use joint::{DhConvention, DhParameter, JointSpec};

pub mod chain;
pub use chain::KinematicChain;

pub mod robot_config;
pub use robot_config::{comau_reference_cases, DhRow, RobotConfig};

pub mod validation;
pub use validation::{CaseOutcome, ReferenceCase, ValidationReport, Validator, DEFAULT_TOLERANCE};

pub mod range;
pub use range::{AngleRange, ScanRange};

pub mod result;
pub use result::SearchResult;

pub mod calibration;
pub use calibration::ParameterCalibrator;

pub mod search;
pub use search::{ConfigurationSearcher, SearchConfig, SearchOutcome, DEFAULT_SEARCH_TOLERANCE};
