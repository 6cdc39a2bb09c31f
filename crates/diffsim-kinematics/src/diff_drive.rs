//! Differential-drive robot model: command conversion and pose integration.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{KinematicsError, check_timestep};
use crate::model::DriveModel;
use crate::vector::Vector;
use crate::wheel::WheelActuator;
use crate::{ChassisSpeeds, Pose2D, WheelSpeeds};

/// Convert a linear velocity and curvature into wheel speeds.
///
/// Zero curvature drives both wheels at `v`. Otherwise, with `R = 1 / c`,
/// the right wheel runs at `(v·W + 2·R·v) / 2 / R` and the left wheel makes up
/// the difference to `2·v`. Producers of curvature commands rely on this exact
/// evaluation order.
///
/// # Arguments
///
/// * `v`: Linear velocity (m/s).
/// * `c`: Curvature (1/m), positive turns left.
/// * `wheel_base`: Distance between the wheels (m).
pub fn curvature_to_wheel_speeds(v: f64, c: f64, wheel_base: f64) -> WheelSpeeds {
    if c == 0.0 {
        return WheelSpeeds::new(v, v);
    }

    let r = 1.0 / c;
    let right = (v * wheel_base + 2.0 * r * v) / 2.0 / r;
    let left = 2.0 * v - right;
    WheelSpeeds::new(left, right)
}

/// Physical parameters of a differential-drive robot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveParams {
    /// Distance between the wheel contact points (m).
    pub wheel_base: f64,
    /// Wheel diameter (m).
    pub wheel_diameter: f64,
    /// Maximum wheel surface acceleration (m/s²).
    pub wheel_accel: f64,
    /// Optional wheel surface speed limit (m/s).
    pub max_wheel_speed: Option<f64>,
}

impl DriveParams {
    /// Default distance between the wheels (m).
    pub const DEFAULT_WHEEL_BASE: f64 = 0.16;
    /// Default wheel diameter (m).
    pub const DEFAULT_WHEEL_DIAMETER: f64 = 0.066;
    /// Default wheel acceleration (m/s²), effectively instantaneous.
    pub const DEFAULT_WHEEL_ACCEL: f64 = 1e6;
}

impl Default for DriveParams {
    fn default() -> Self {
        DriveParams {
            wheel_base: Self::DEFAULT_WHEEL_BASE,
            wheel_diameter: Self::DEFAULT_WHEEL_DIAMETER,
            wheel_accel: Self::DEFAULT_WHEEL_ACCEL,
            max_wheel_speed: None,
        }
    }
}

/// Simulated differential-drive robot.
///
/// Commands only change the wheel setpoints. The pose moves exclusively in
/// [`step`](Self::step), or jumps when overridden with
/// [`set_pose`](Self::set_pose).
///
/// Integration is first order: the chassis speeds are taken from the wheel
/// speeds reached at the end of the step, the translation `v·dt` is applied
/// along the heading held at the start of the step, and only then the heading
/// advances by `ω·dt`. The heading is accumulated without wrapping.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DifferentialDriveKinematics {
    wheel_base: f64,
    left: WheelActuator,
    right: WheelActuator,
    pose: Pose2D,
    elapsed_time: f64,
}

impl DifferentialDriveKinematics {
    /// Construct a robot at the origin with both wheels at rest.
    ///
    /// # Arguments
    ///
    /// * `wheel_base`: Distance between the wheel contact points in meters.
    /// * `wheel_diameter`: Diameter of both wheels in meters.
    /// * `wheel_accel`: Maximum wheel surface acceleration in m/s².
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidParameter)` if `wheel_base` or
    /// `wheel_diameter` is not positive, or `wheel_accel` is negative.
    pub fn new(
        wheel_base: f64,
        wheel_diameter: f64,
        wheel_accel: f64,
    ) -> Result<Self, KinematicsError> {
        Self::from_params(&DriveParams {
            wheel_base,
            wheel_diameter,
            wheel_accel,
            max_wheel_speed: None,
        })
    }

    /// Construct a robot from a parameter set.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new), and additionally if `max_wheel_speed` is
    /// set but not positive.
    pub fn from_params(params: &DriveParams) -> Result<Self, KinematicsError> {
        if !params.wheel_base.is_finite() || params.wheel_base <= 0.0 {
            return Err(KinematicsError::InvalidParameter(
                "wheel base must be positive",
            ));
        }

        let wheel = || match params.max_wheel_speed {
            Some(max) => {
                WheelActuator::with_max_velocity(params.wheel_diameter, params.wheel_accel, max)
            }
            None => WheelActuator::new(params.wheel_diameter, params.wheel_accel),
        };

        Ok(DifferentialDriveKinematics {
            wheel_base: params.wheel_base,
            left: wheel()?,
            right: wheel()?,
            pose: Pose2D::default(),
            elapsed_time: 0.0,
        })
    }

    /// Returns the wheel base.
    pub fn wheel_base(&self) -> f64 {
        self.wheel_base
    }

    /// Left wheel.
    pub fn left(&self) -> &WheelActuator {
        &self.left
    }

    /// Right wheel.
    pub fn right(&self) -> &WheelActuator {
        &self.right
    }

    /// Simulated time (s).
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    /// Current wheel surface speeds.
    pub fn wheel_speeds(&self) -> WheelSpeeds {
        WheelSpeeds::new(self.left.velocity(), self.right.velocity())
    }

    /// Wheel speeds the actuators are ramping towards.
    pub fn setpoints(&self) -> WheelSpeeds {
        WheelSpeeds::new(self.left.setpoint(), self.right.setpoint())
    }

    /// Chassis speeds produced by the given wheel speeds.
    pub fn forward_kinematics(&self, wheel_speeds: WheelSpeeds) -> ChassisSpeeds {
        let v = (wheel_speeds.left + wheel_speeds.right) / 2.0;
        let omega = (wheel_speeds.right - wheel_speeds.left) / self.wheel_base;
        ChassisSpeeds::new(v, omega)
    }

    /// Wheel speeds required for the given chassis speeds.
    pub fn inverse_kinematics(&self, chassis_speeds: ChassisSpeeds) -> WheelSpeeds {
        let left = chassis_speeds.v - chassis_speeds.omega * self.wheel_base / 2.0;
        let right = chassis_speeds.v + chassis_speeds.omega * self.wheel_base / 2.0;
        WheelSpeeds::new(left, right)
    }

    /// Current chassis speeds.
    pub fn chassis_speeds(&self) -> ChassisSpeeds {
        self.forward_kinematics(self.wheel_speeds())
    }

    /// Current linear velocity (m/s).
    pub fn linear_velocity(&self) -> f64 {
        self.chassis_speeds().v
    }

    /// Current angular velocity (rad/s).
    pub fn angular_velocity(&self) -> f64 {
        self.chassis_speeds().omega
    }

    /// Current driving curvature (1/m).
    ///
    /// Returns `0.0` when the wheel speeds are equal. A pivot turn on the spot
    /// (`v_left + v_right == 0`) also reports `0.0`.
    pub fn curvature(&self) -> f64 {
        let WheelSpeeds { left, right } = self.wheel_speeds();
        let diff = right - left;
        if diff == 0.0 {
            return 0.0;
        }
        let radius = 0.5 * self.wheel_base * (left + right) / diff;
        if radius == 0.0 {
            return 0.0;
        }
        1.0 / radius
    }

    /// Command linear and angular velocity.
    pub fn command_velocity(&mut self, linear_velocity: f64, angular_velocity: f64) {
        let speeds = self.inverse_kinematics(ChassisSpeeds::new(linear_velocity, angular_velocity));
        self.command_wheel_speeds(speeds.left, speeds.right);
    }

    /// Command linear velocity and curvature.
    pub fn command_curvature(&mut self, linear_velocity: f64, curvature: f64) {
        let speeds = curvature_to_wheel_speeds(linear_velocity, curvature, self.wheel_base);
        self.command_wheel_speeds(speeds.left, speeds.right);
    }

    /// Command both wheel speeds directly.
    pub fn command_wheel_speeds(&mut self, left: f64, right: f64) {
        self.left.set_velocity(left);
        self.right.set_velocity(right);
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidTimestep)` if `dt` is negative.
    /// Nothing is advanced in that case.
    pub fn step(&mut self, dt: f64) -> Result<(), KinematicsError> {
        check_timestep(dt)?;

        self.left.step(dt)?;
        self.right.step(dt)?;

        let ChassisSpeeds { v, omega } = self.chassis_speeds();
        let xy = self.pose.xy() + Vector::from_polar(v * dt, self.pose.theta);
        self.pose = Pose2D::new(xy.x, xy.y, self.pose.theta + omega * dt);

        self.elapsed_time += dt;
        Ok(())
    }

    /// Snapshot of the current pose.
    pub fn get_pose(&self) -> Pose2D {
        self.pose
    }

    /// Overwrite the pose, e.g. after an external localization fix.
    /// The wheels keep their state.
    pub fn set_pose(&mut self, x: f64, y: f64, theta: f64) {
        self.pose = Pose2D::new(x, y, theta);
    }

    /// Distance rolled by the left and right wheel since the previous call.
    pub fn take_wheel_increments(&mut self) -> WheelSpeeds {
        WheelSpeeds::new(
            self.left.incremental_distance(),
            self.right.incremental_distance(),
        )
    }
}

impl DriveModel for DifferentialDriveKinematics {
    type Error = KinematicsError;

    fn command_velocity(&mut self, linear_velocity: f64, angular_velocity: f64) {
        DifferentialDriveKinematics::command_velocity(self, linear_velocity, angular_velocity);
    }

    fn command_curvature(&mut self, linear_velocity: f64, curvature: f64) {
        DifferentialDriveKinematics::command_curvature(self, linear_velocity, curvature);
    }

    fn command_wheel_speeds(&mut self, left: f64, right: f64) {
        DifferentialDriveKinematics::command_wheel_speeds(self, left, right);
    }

    fn step(&mut self, dt: f64) -> Result<(), Self::Error> {
        DifferentialDriveKinematics::step(self, dt)
    }

    fn get_pose(&self) -> Pose2D {
        self.pose
    }

    fn set_pose(&mut self, x: f64, y: f64, theta: f64) {
        DifferentialDriveKinematics::set_pose(self, x, y, theta);
    }

    fn linear_velocity(&self) -> f64 {
        DifferentialDriveKinematics::linear_velocity(self)
    }

    fn curvature(&self) -> f64 {
        DifferentialDriveKinematics::curvature(self)
    }
}

impl fmt::Display for DifferentialDriveKinematics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "diffdrive vels: ({:.2},{:.2}) C={}",
            self.left.velocity(),
            self.right.velocity(),
            self.curvature()
        )
    }
}
