use approx::assert_relative_eq;
use comau_kinematics::{KinematicsError, RobotConfig};
use nalgebra::{Matrix3, Vector3};
use std::f64::consts::FRAC_PI_2;

#[test]
fn home_position_matches_datasheet() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let tip = chain.tip_position(&[0.0; 6]).unwrap();
    assert_relative_eq!(tip, Vector3::new(0.87, 0.0, 1.17), epsilon = 1e-9);
}

#[test]
fn base_rotation_swings_tip_onto_y_axis() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let tip = chain
        .tip_position(&[FRAC_PI_2, 0.0, 0.0, 0.0, 0.0, 0.0])
        .unwrap();
    assert_relative_eq!(tip, Vector3::new(0.0, 0.87, 1.17), epsilon = 1e-9);
}

#[test]
fn evaluate_returns_base_plus_one_frame_per_joint() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let frames = chain.evaluate(&[0.1, -0.2, 0.3, -0.4, 0.5, -0.6]).unwrap();
    assert_eq!(frames.len(), 7);
    assert_eq!(frames[0], comau_kinematics::RigidTransform::identity());
    assert_eq!(
        frames[6],
        chain.tip(&[0.1, -0.2, 0.3, -0.4, 0.5, -0.6]).unwrap()
    );
}

#[test]
fn five_angles_is_a_usage_error() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    assert_eq!(
        chain.evaluate(&[0.0; 5]).unwrap_err(),
        KinematicsError::AngleCount {
            expected: 6,
            actual: 5
        }
    );
    assert!(chain.tip_position(&[0.0; 7]).is_err());
}

#[test]
fn repeated_evaluation_is_bit_identical() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let q = [0.3, 1.1, -0.7, 2.0, -1.3, 0.4];
    let first = chain.evaluate(&q).unwrap();
    let second = chain.evaluate(&q).unwrap();
    for (a, b) in first.iter().zip(&second) {
        for (x, y) in a.to_rows().iter().flatten().zip(b.to_rows().iter().flatten()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }
}

#[test]
fn every_frame_has_a_proper_rotation() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    for q in [
        [0.0; 6],
        [0.5, -1.0, 1.5, -2.0, 2.5, -3.0],
        [3.0, 2.7, -2.9, 4.5, 2.2, -4.7],
    ] {
        for frame in chain.evaluate(&q).unwrap() {
            let r = frame.rotation();
            assert_relative_eq!(r * r.transpose(), Matrix3::identity(), epsilon = 1e-12);
            assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
            assert_eq!(frame.to_rows()[3], [0.0, 0.0, 0.0, 1.0]);
        }
    }
}

#[test]
fn frame_positions_trace_the_arm_at_home() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let origins = chain.frame_positions(&[0.0; 6]).unwrap();
    assert_eq!(origins.len(), 7);
    assert_relative_eq!(origins[0], Vector3::zeros());
    // Shoulder sits on top of the base column, offset by a1.
    assert_relative_eq!(origins[1], Vector3::new(0.101, 0.0, 0.45), epsilon = 1e-12);
    // Upper arm points straight up because of the joint 2 offset.
    assert_relative_eq!(origins[2], Vector3::new(0.101, 0.0, 1.04), epsilon = 1e-12);
    assert_relative_eq!(origins[6], Vector3::new(0.87, 0.0, 1.17), epsilon = 1e-9);
}

#[test]
fn tip_orientation_at_home_points_the_flange_forward() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let r = chain.tip_orientation(&[0.0; 6]).unwrap();
    // Tool z axis along base +x.
    assert_relative_eq!(r.column(2).into_owned(), Vector3::x(), epsilon = 1e-12);
}

#[test]
fn limits_do_not_change_evaluation() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let beyond = [0.0, 3.0, 0.0, 0.0, 0.0, 0.0];
    assert_eq!(chain.limit_violations(&beyond).unwrap(), vec![1]);
    assert!(chain.tip_position(&beyond).is_ok());
}
