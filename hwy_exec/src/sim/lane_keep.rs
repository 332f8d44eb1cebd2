//! Lane keeping desired trajectory

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;

use crate::curve::ArcCurve;
use crate::path_ctrl::{DesiredTrajectory, TrajectoryPoint};
use crate::track::{FrenetState, Track};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Width of each lane, lane 0 is the one next to the centreline.
///
/// Units: meters
pub const LANE_WIDTH_M: f64 = 4.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Builds desired trajectories that follow the centre of a fixed lane.
#[derive(Debug, Clone, Copy)]
pub struct LaneKeep {
    lane: usize,
    num_points: usize,
    spacing_m: f64,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Lateral offset of the centre of a lane.
pub fn lane_centre_d_m(lane: usize) -> f64 {
    0.5 * LANE_WIDTH_M + LANE_WIDTH_M * lane as f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LaneKeep {
    /// `num_points` trajectory points will be placed `spacing_m` apart along
    /// the track.
    pub fn new(lane: usize, num_points: usize, spacing_m: f64) -> Self {
        Self {
            lane,
            num_points,
            spacing_m,
        }
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    /// Desired trajectory along the lane centre starting level with `start`.
    pub fn plan<C: ArcCurve>(
        &self,
        track: &Track<C>,
        start: &FrenetState,
        speed_ms: f64,
    ) -> DesiredTrajectory {
        let d_m = lane_centre_d_m(self.lane);

        trace!(
            "Lane keeping from s = {:.3} in lane {} at {:.3} m/s",
            start.s_m,
            self.lane,
            speed_ms
        );

        (0..self.num_points)
            .map(|i| {
                let s_m = track.normalise_s(start.s_m + self.spacing_m * i as f64);
                TrajectoryPoint {
                    position_m: track.sd_to_xy(s_m, d_m),
                    speed_ms,
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
