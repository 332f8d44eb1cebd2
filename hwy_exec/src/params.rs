//! # Highway Executable Parameters
//!
//! This module provides parameters for the highway executable.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HwyExecParams {
    /// Path to the track map file, relative to the software root
    pub map_file: String,

    /// Number of planning cycles to run
    pub num_cycles: usize,

    /// Lane to drive in, 0 is the lane next to the centreline
    pub lane: usize,

    /// Distance along the track at which the vehicle starts
    ///
    /// Units: meters
    pub start_s_m: f64,

    /// Number of path points the vehicle drives each cycle
    pub points_per_cycle: usize,

    /// Number of points in each desired trajectory
    pub num_trajectory_points: usize,

    /// Distance along the track between desired trajectory points
    ///
    /// Units: meters
    pub trajectory_spacing_m: f64,

    /// Increase in the reference speed each cycle
    ///
    /// Units: meters/second
    pub ref_speed_step_ms: f64,
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
