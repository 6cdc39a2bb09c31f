//! Interface between drive models and the components that command them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Pose2D;

/// Core trait defining the interface of a simulated mobile base.
///
/// Command producers and pose consumers only talk to a model through this
/// trait. Implementations are not synchronized; callers sharing a model
/// between threads must serialize access themselves.
pub trait DriveModel {
    /// Error returned by [`step`](Self::step).
    type Error;

    /// Drive with a linear (m/s) and angular (rad/s) velocity.
    fn command_velocity(&mut self, linear_velocity: f64, angular_velocity: f64);

    /// Drive with a linear velocity (m/s) on a curvature (1/m).
    fn command_curvature(&mut self, linear_velocity: f64, curvature: f64);

    /// Set the left and right wheel speeds (m/s) directly.
    fn command_wheel_speeds(&mut self, left: f64, right: f64);

    /// Advance the simulation by `dt` seconds.
    fn step(&mut self, dt: f64) -> Result<(), Self::Error>;

    /// Snapshot of the current pose.
    fn get_pose(&self) -> Pose2D;

    /// Jump to a pose without simulating the motion.
    fn set_pose(&mut self, x: f64, y: f64, theta: f64);

    /// Current linear velocity (m/s).
    fn linear_velocity(&self) -> f64;

    /// Current driving curvature (1/m).
    fn curvature(&self) -> f64;
}

/// A motion command as a value, for passing between tasks.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveCommand {
    /// Linear (m/s) and angular (rad/s) velocity.
    Velocity {
        /// Linear velocity (m/s).
        linear: f64,
        /// Angular velocity (rad/s).
        angular: f64,
    },
    /// Linear velocity (m/s) and curvature (1/m).
    Curvature {
        /// Linear velocity (m/s).
        linear: f64,
        /// Curvature (1/m).
        curvature: f64,
    },
    /// Explicit wheel speeds (m/s).
    WheelSpeeds {
        /// Left wheel speed (m/s).
        left: f64,
        /// Right wheel speed (m/s).
        right: f64,
    },
    /// Ramp both wheels down to zero.
    Stop,
}

impl DriveCommand {
    /// Forward the command to a model.
    pub fn apply<M: DriveModel + ?Sized>(&self, model: &mut M) {
        match *self {
            DriveCommand::Velocity { linear, angular } => model.command_velocity(linear, angular),
            DriveCommand::Curvature { linear, curvature } => {
                model.command_curvature(linear, curvature)
            }
            DriveCommand::WheelSpeeds { left, right } => model.command_wheel_speeds(left, right),
            DriveCommand::Stop => model.command_wheel_speeds(0.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DifferentialDriveKinematics, DriveParams, WheelSpeeds};

    fn robot() -> DifferentialDriveKinematics {
        DifferentialDriveKinematics::from_params(&DriveParams::default()).unwrap()
    }

    #[test]
    fn test_apply_commands() {
        let mut robot = robot();

        DriveCommand::Velocity {
            linear: 0.0,
            angular: 1.0,
        }
        .apply(&mut robot);
        assert_eq!(robot.setpoints(), WheelSpeeds::new(-0.08, 0.08));

        DriveCommand::Curvature {
            linear: 0.3,
            curvature: 0.0,
        }
        .apply(&mut robot);
        assert_eq!(robot.setpoints(), WheelSpeeds::new(0.3, 0.3));

        DriveCommand::WheelSpeeds {
            left: 0.1,
            right: 0.2,
        }
        .apply(&mut robot);
        assert_eq!(robot.setpoints(), WheelSpeeds::new(0.1, 0.2));

        DriveCommand::Stop.apply(&mut robot);
        assert_eq!(robot.setpoints(), WheelSpeeds::default());
    }

    #[test]
    fn test_trait_object() {
        let mut robot = robot();
        let model: &mut dyn DriveModel<Error = crate::KinematicsError> = &mut robot;

        DriveCommand::Velocity {
            linear: 1.0,
            angular: 0.0,
        }
        .apply(&mut *model);
        model.step(1.0).unwrap();
        assert_eq!(model.linear_velocity(), 1.0);
        assert_eq!(model.curvature(), 0.0);
        assert_eq!(model.get_pose(), Pose2D::new(1.0, 0.0, 0.0));

        model.set_pose(0.0, 0.0, 1.0);
        assert_eq!(model.get_pose().theta, 1.0);
        assert!(model.step(-1.0).is_err());
    }
}
