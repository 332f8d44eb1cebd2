//! Path control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Limits on the motion of the vehicle along a generated path.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct KinematicLimits {
    /// Maximum speed along the path
    ///
    /// Units: meters/second
    pub speed_limit_ms: f64,

    /// Maximum magnitude of the acceleration
    ///
    /// Units: meters/second^2
    pub accel_limit_mss: f64,

    /// Maximum magnitude of the rate of change of acceleration
    ///
    /// Units: meters/second^3
    pub jerk_limit_msss: f64,
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
