//! Error types for the kinematics library.
//!
//! Only two things can go wrong inside the simulation core: a model is
//! constructed with physically meaningless parameters, or it is advanced by a
//! negative or infinite amount of time.

use core::fmt;

/// Errors that can occur while building or advancing a drive model.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// A construction parameter is out of range.
    /// Returned for non-positive wheel diameters, wheelbases or speed limits,
    /// negative rates of change and inverted bounds.
    InvalidParameter(&'static str),
    /// A negative or non-finite time delta was passed to a step function.
    /// The offending value is carried along for diagnostics.
    InvalidTimestep(f64),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            KinematicsError::InvalidTimestep(dt) => {
                write!(f, "Invalid timestep: dt must be finite and non-negative, got {}", dt)
            }
        }
    }
}

impl core::error::Error for KinematicsError {}

/// Rejects negative and non-finite time deltas.
pub(crate) fn check_timestep(dt: f64) -> Result<(), KinematicsError> {
    if dt.is_finite() && dt >= 0.0 {
        Ok(())
    } else {
        Err(KinematicsError::InvalidTimestep(dt))
    }
}
