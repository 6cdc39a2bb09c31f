//! Rate-limited scalar used to model actuators with bounded acceleration.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{KinematicsError, check_timestep};

/// A scalar that follows its setpoint at a bounded rate of change.
///
/// The value never overshoots the setpoint: when the remaining error can be
/// covered within one step, the value lands on the setpoint exactly. Optional
/// inclusive bounds are applied after every step.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampedScalar {
    value: f64,
    rate_of_change: f64,
    setpoint: f64,
    min_bound: Option<f64>,
    max_bound: Option<f64>,
}

impl RampedScalar {
    /// Construct a ramp resting at `value`.
    ///
    /// # Arguments
    ///
    /// * `rate_of_change`: Maximum change per second. May be `f64::INFINITY`
    ///   for an actuator that reaches its setpoint instantly.
    /// * `value`: Initial value; the setpoint starts here as well.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidParameter)` if `rate_of_change` is
    /// negative or NaN.
    pub fn new(rate_of_change: f64, value: f64) -> Result<Self, KinematicsError> {
        if rate_of_change.is_nan() || rate_of_change < 0.0 {
            return Err(KinematicsError::InvalidParameter(
                "rate of change must be non-negative",
            ));
        }
        Ok(RampedScalar {
            value,
            rate_of_change,
            setpoint: value,
            min_bound: None,
            max_bound: None,
        })
    }

    /// Starts the ramp with a target other than its initial value.
    pub fn with_setpoint(mut self, setpoint: f64) -> Self {
        self.setpoint = setpoint;
        self
    }

    /// Limits the value to `[min_bound, max_bound]`. Either side may be open.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidParameter)` if a bound is NaN, or
    /// if both bounds are set and `min_bound > max_bound`.
    pub fn with_bounds(
        mut self,
        min_bound: Option<f64>,
        max_bound: Option<f64>,
    ) -> Result<Self, KinematicsError> {
        if min_bound.is_some_and(f64::is_nan) || max_bound.is_some_and(f64::is_nan) {
            return Err(KinematicsError::InvalidParameter("bounds may not be NaN"));
        }
        if let (Some(lo), Some(hi)) = (min_bound, max_bound) {
            if lo > hi {
                return Err(KinematicsError::InvalidParameter(
                    "min bound may not exceed max bound",
                ));
            }
        }
        self.min_bound = min_bound;
        self.max_bound = max_bound;
        Ok(self)
    }

    /// Current value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Target the value is moving towards.
    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    /// Maximum change per second.
    pub fn rate_of_change(&self) -> f64 {
        self.rate_of_change
    }

    /// Lower bound, if any.
    pub fn min_bound(&self) -> Option<f64> {
        self.min_bound
    }

    /// Upper bound, if any.
    pub fn max_bound(&self) -> Option<f64> {
        self.max_bound
    }

    /// Set a new target. The value is not touched until the next `advance`.
    pub fn set_setpoint(&mut self, setpoint: f64) {
        self.setpoint = setpoint;
    }

    /// Move the value towards the setpoint for `dt` seconds.
    ///
    /// A zero `dt` leaves the value where it is, also for an infinite rate.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidTimestep)` if `dt` is negative, infinite or NaN.
    pub fn advance(&mut self, dt: f64) -> Result<(), KinematicsError> {
        check_timestep(dt)?;

        let error = self.setpoint - self.value;
        if dt > 0.0 && error != 0.0 {
            let max_step = self.rate_of_change * dt;
            if max_step >= libm::fabs(error) {
                self.value = self.setpoint;
            } else {
                self.value += libm::copysign(max_step, error);
            }
        }

        if let Some(hi) = self.max_bound {
            self.value = self.value.min(hi);
        }
        if let Some(lo) = self.min_bound {
            self.value = self.value.max(lo);
        }
        Ok(())
    }
}

impl fmt::Display for RampedScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RampedScalar(value={:?}, setpoint={:?}, roc={:?})",
            self.value, self.setpoint, self.rate_of_change
        )
    }
}
