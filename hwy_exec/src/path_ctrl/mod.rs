//! # Path control module
//!
//! Path control produces, once per planning cycle, the fixed length sequence
//! of positions the vehicle will visit at `DELTA_T_S` intervals. The new path
//! continues from what is left of the previous one (the history) and steers
//! towards a desired trajectory supplied by the planner, while keeping speed,
//! acceleration and jerk within the vehicle's kinematic limits.
//!
//! All of the extension is done in a local frame anchored on the last history
//! point and aligned with the direction of travel there, so that the desired
//! lateral position can be expressed as a function of the local `x`. In this
//! frame:
//!
//!  1. The history is differentiated to get velocity and acceleration at
//!     every history point.
//!  2. Splines of desired lateral position and desired speed against `x` are
//!     fitted through the desired trajectory.
//!  3. New points are added one at a time. Each looks `LOOKAHEAD_S` ahead
//!     along the current motion, picks lateral and longitudinal
//!     accelerations that would bring the vehicle onto the desired
//!     trajectory, limits them, and integrates.
//!
//! The history is then copied through unchanged and the new points are
//! transformed back into the map frame.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_extension;
mod frame;
mod kinematics;
mod params;
mod state;
mod trajectory;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use frame::LocalFrame;
pub use kinematics::KinematicSample;
pub use params::KinematicLimits;
pub use state::*;
pub use trajectory::{DesiredTrajectory, TrajectoryPoint};

use crate::curve::CurveError;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Time between consecutive path points.
///
/// Units: seconds
pub const DELTA_T_S: f64 = 0.02;

/// Number of points in every generated path.
pub const PATH_LENGTH: usize = 50;

/// How far ahead the extension projects the current motion when choosing
/// accelerations.
///
/// Units: seconds
pub const LOOKAHEAD_S: f64 = 1.0;

/// History updates with fewer points than this are ignored.
pub const MIN_HISTORY_UPDATE_POINTS: usize = 3;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while recalculating the path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathCtrlError {
    #[error("At least 2 history points are needed to anchor the local frame, found {0}")]
    HistoryTooShort(usize),

    #[error("The desired trajectory cannot be interpolated: {0}")]
    InvalidTrajectory(CurveError),

    #[error(
        "Desired trajectory components have different lengths: {x_len} x, {y_len} y, {speed_len} speed"
    )]
    TrajectoryLengthMismatch {
        x_len: usize,
        y_len: usize,
        speed_len: usize,
    },

    #[error("Numerical fault while synthesising path point {index}: {fault}")]
    NumericalFault { index: usize, fault: NumericalFault },
}

/// A NaN produced while synthesising a point, with the inputs of the
/// calculation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum NumericalFault {
    #[error("acceleration limited ax is NaN (ax = {ax}, ay = {ay}, accel limit = {accel_limit_mss})")]
    AccelLimitedAx {
        ax: f64,
        ay: f64,
        accel_limit_mss: f64,
    },

    #[error(
        "jerk limited ax is NaN (last ax = {last_ax}, ay = {ay}, last ay = {last_ay}, jerk limit = {jerk_limit_msss})"
    )]
    JerkLimitedAx {
        last_ax: f64,
        ay: f64,
        last_ay: f64,
        jerk_limit_msss: f64,
    },

    #[error("x is NaN (last x = {last_x}, vx = {vx}, ax = {ax})")]
    PositionX { last_x: f64, vx: f64, ax: f64 },

    #[error("y is NaN (last y = {last_y}, vy = {vy}, ay = {ay})")]
    PositionY { last_y: f64, vy: f64, ay: f64 },
}
