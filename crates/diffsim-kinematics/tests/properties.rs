//! Property-based tests for the drive model.
//!
//! Run with: cargo test -p diffsim-kinematics -- prop

use diffsim_kinematics::{
    DifferentialDriveKinematics, DriveParams, RampedScalar, WheelActuator,
    curvature_to_wheel_speeds,
};
use proptest::prelude::*;

fn robot(accel: f64) -> DifferentialDriveKinematics {
    DifferentialDriveKinematics::new(DriveParams::DEFAULT_WHEEL_BASE, 0.066, accel).unwrap()
}

/// Curvature computed back from a pair of wheel speeds.
fn curvature_of(left: f64, right: f64, wheel_base: f64) -> f64 {
    1.0 / (0.5 * wheel_base * (left + right) / (right - left))
}

proptest! {
    #[test]
    fn prop_ramp_never_overshoots(
        start in -100.0..100.0f64,
        target in -100.0..100.0f64,
        rate in 0.0..50.0f64,
        dt in 0.0..5.0f64,
    ) {
        let mut ramp = RampedScalar::new(rate, start).unwrap().with_setpoint(target);
        ramp.advance(dt).unwrap();
        let v = ramp.value();

        let (lo, hi) = if start <= target { (start, target) } else { (target, start) };
        prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        if rate * dt >= (target - start).abs() {
            prop_assert_eq!(v, target);
        }
    }

    #[test]
    fn prop_ramp_zero_dt_is_noop(
        start in -100.0..100.0f64,
        target in -100.0..100.0f64,
        rate in 0.0..1e6f64,
    ) {
        let mut ramp = RampedScalar::new(rate, start).unwrap().with_setpoint(target);
        ramp.advance(0.0).unwrap();
        prop_assert_eq!(ramp.value(), start);
    }

    #[test]
    fn prop_ramp_respects_bounds(steps in prop::collection::vec(0.0..3.0f64, 1..50)) {
        let mut ramp = RampedScalar::new(1.0, 0.0)
            .unwrap()
            .with_bounds(Some(-10.0), Some(10.0))
            .unwrap()
            .with_setpoint(20.0);
        for dt in steps {
            ramp.advance(dt).unwrap();
            prop_assert!(ramp.value() <= 10.0);
        }
    }

    #[test]
    fn prop_zero_curvature_drives_straight(v in -10.0..10.0f64) {
        let mut robot = robot(1e6);
        robot.command_curvature(v, 0.0);
        let setpoints = robot.setpoints();
        prop_assert_eq!(setpoints.left, v);
        prop_assert_eq!(setpoints.right, v);
    }

    #[test]
    fn prop_curvature_round_trip(
        v in prop_oneof![-5.0..-0.01f64, 0.01..5.0f64],
        c in prop_oneof![-5.0..-0.01f64, 0.01..5.0f64],
    ) {
        let w = DriveParams::DEFAULT_WHEEL_BASE;
        let speeds = curvature_to_wheel_speeds(v, c, w);
        let back = curvature_of(speeds.left, speeds.right, w);
        prop_assert!((back - c).abs() <= 1e-9 * c.abs().max(1.0));

        // and through the simulated wheels
        let mut robot = robot(f64::INFINITY);
        robot.command_curvature(v, c);
        robot.step(0.01).unwrap();
        prop_assert!((robot.curvature() - c).abs() <= 1e-9 * c.abs().max(1.0));
    }

    #[test]
    fn prop_wheel_revolutions_follow_distance(
        diameter in 0.01..2.0f64,
        target in -3.0..3.0f64,
        steps in prop::collection::vec(0.0..1.0f64, 1..20),
    ) {
        let mut wheel = WheelActuator::new(diameter, 2.0).unwrap();
        wheel.set_velocity(target);
        for dt in steps {
            wheel.step(dt).unwrap();
        }
        let expected = wheel.distance_traveled() / (std::f64::consts::PI * diameter);
        prop_assert!((wheel.revolutions() - expected).abs() < 1e-9);
    }

    #[test]
    fn prop_negative_dt_rejected(dt in -10.0..-1e-9f64) {
        let mut robot = robot(1.0);
        robot.command_velocity(1.0, 0.5);
        prop_assert!(robot.step(dt).is_err());
        prop_assert_eq!(robot.elapsed_time(), 0.0);
    }
}

#[test]
fn command_velocity_converges() {
    let mut robot = robot(1.0);
    robot.command_velocity(1.0, 0.0);
    for _ in 0..100 {
        robot.step(0.05).unwrap();
    }
    assert_eq!(robot.left().velocity(), 1.0);
    assert_eq!(robot.right().velocity(), 1.0);
}

#[test]
fn turn_in_place_targets() {
    let mut robot = robot(1e6);
    robot.command_velocity(0.0, 1.0);
    let setpoints = robot.setpoints();
    assert_eq!(setpoints.left, -0.08);
    assert_eq!(setpoints.right, 0.08);
}

#[test]
fn wheel_scenario() {
    let mut wheel = WheelActuator::new(1.0, 1.0).unwrap();
    wheel.set_velocity(1.0);
    wheel.step(0.5).unwrap();
    assert_eq!(wheel.velocity(), 0.5);
    wheel.step(10.0).unwrap();
    assert_eq!(wheel.velocity(), 1.0);
    assert_eq!(
        wheel.revolutions(),
        wheel.distance_traveled() / std::f64::consts::PI
    );
}

#[test]
fn equal_speeds_have_zero_curvature() {
    let mut robot = robot(1e6);
    robot.command_wheel_speeds(2.0, 2.0);
    robot.step(0.1).unwrap();
    assert_eq!(robot.curvature(), 0.0);
}
