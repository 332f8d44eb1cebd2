//! # Highway library.
//!
//! This library provides path control for a vehicle driving along a track,
//! and the pieces needed to run it in closed loop.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Curve interpolation - cubic splines and the arc-length curve capability
pub mod curve;

/// Executable parameters
pub mod params;

/// Path control - extends the vehicle path within its kinematic limits
pub mod path_ctrl;

/// Vehicle pose
pub mod pose;

/// Simulation - lane keeping target, reference speed and a path following vehicle
pub mod sim;

/// Track - conversion between map and Frenet coordinates
pub mod track;
