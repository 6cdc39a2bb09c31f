//! Drive wheel with a rate-limited surface speed.

use core::f64::consts::PI;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::KinematicsError;
use crate::ramp::RampedScalar;

/// A simulated drive wheel.
///
/// The wheel's surface speed (m/s) follows the commanded velocity with a
/// bounded acceleration. Every step integrates the speed into the distance
/// traveled, from which revolutions and incremental displacement are derived.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct WheelActuator {
    diameter: f64,
    circumference: f64,
    ramp: RampedScalar,
    distance_traveled: f64,
    last_recorded_distance: f64,
    elapsed_time: f64,
}

impl WheelActuator {
    /// Construct a wheel at rest.
    ///
    /// # Arguments
    ///
    /// * `diameter`: Wheel diameter in meters.
    /// * `accel`: Maximum surface acceleration in m/s². `f64::INFINITY`
    ///   gives a wheel that follows its setpoint instantly.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidParameter)` if `diameter` is not a
    /// positive finite number or `accel` is negative.
    pub fn new(diameter: f64, accel: f64) -> Result<Self, KinematicsError> {
        if !diameter.is_finite() || diameter <= 0.0 {
            return Err(KinematicsError::InvalidParameter(
                "wheel diameter must be positive",
            ));
        }
        Ok(WheelActuator {
            diameter,
            circumference: PI * diameter,
            ramp: RampedScalar::new(accel, 0.0)?,
            distance_traveled: 0.0,
            last_recorded_distance: 0.0,
            elapsed_time: 0.0,
        })
    }

    /// Construct a wheel whose speed is limited to `±max_velocity`.
    ///
    /// # Errors
    ///
    /// Same as [`WheelActuator::new`], and additionally if `max_velocity` is
    /// not positive.
    pub fn with_max_velocity(
        diameter: f64,
        accel: f64,
        max_velocity: f64,
    ) -> Result<Self, KinematicsError> {
        if max_velocity.is_nan() || max_velocity <= 0.0 {
            return Err(KinematicsError::InvalidParameter(
                "max wheel velocity must be positive",
            ));
        }
        let mut wheel = Self::new(diameter, accel)?;
        wheel.ramp = wheel
            .ramp
            .with_bounds(Some(-max_velocity), Some(max_velocity))?;
        Ok(wheel)
    }

    /// Wheel diameter (m).
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Wheel circumference (m).
    pub fn circumference(&self) -> f64 {
        self.circumference
    }

    /// Current surface speed (m/s).
    pub fn velocity(&self) -> f64 {
        self.ramp.value()
    }

    /// Commanded surface speed (m/s).
    pub fn setpoint(&self) -> f64 {
        self.ramp.setpoint()
    }

    /// Revolutions per second at the current speed.
    pub fn rps(&self) -> f64 {
        self.ramp.value() / self.circumference
    }

    /// Total distance rolled (m). Reverse motion subtracts.
    pub fn distance_traveled(&self) -> f64 {
        self.distance_traveled
    }

    /// Total number of revolutions.
    pub fn revolutions(&self) -> f64 {
        self.distance_traveled / self.circumference
    }

    /// Simulated time this wheel has been stepped for (s).
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    /// Distance rolled since the previous call.
    ///
    /// This is a consuming read: a second call without an intervening
    /// [`step`](Self::step) returns `0.0`.
    pub fn incremental_distance(&mut self) -> f64 {
        let ds = self.distance_traveled - self.last_recorded_distance;
        self.last_recorded_distance = self.distance_traveled;
        ds
    }

    /// Command a new surface speed (m/s).
    pub fn set_velocity(&mut self, velocity: f64) {
        self.ramp.set_setpoint(velocity);
    }

    /// Advance the wheel by `dt` seconds.
    ///
    /// The distance is integrated with the speed reached at the end of the
    /// step.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidTimestep)` if `dt` is negative.
    pub fn step(&mut self, dt: f64) -> Result<(), KinematicsError> {
        self.ramp.advance(dt)?;
        self.distance_traveled += self.ramp.value() * dt;
        self.elapsed_time += dt;
        Ok(())
    }
}

impl fmt::Display for WheelActuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wheel(rps={:.2}, velocity={:.2} m/s)",
            self.rps(),
            self.velocity()
        )
    }
}
