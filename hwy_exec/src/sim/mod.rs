//! # Simulation module
//!
//! Minimal stand-ins for the systems around path control, enough to run the
//! controller in closed loop: a reference speed, a lane keeping target
//! generator in place of a full planner, and a vehicle which follows the
//! generated path exactly.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod lane_keep;
mod ref_speed;
mod vehicle;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::warn;
use nalgebra::Vector2;

use crate::curve::ArcCurve;
use crate::path_ctrl::{KinematicLimits, PathCtrl, PathCtrlError, StatusReport};
use crate::pose::Pose;
use crate::track::{frenet, FrenetState, Track};

pub use lane_keep::{lane_centre_d_m, LaneKeep, LANE_WIDTH_M};
pub use ref_speed::RefSpeed;
pub use vehicle::SimVehicle;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Result of one successful planning cycle.
#[derive(Debug, Clone)]
pub struct CycleOutput {
    /// The new path to dispatch to the vehicle
    pub path: Vec<Vector2<f64>>,

    /// Frenet state the desired trajectory was started from
    pub start: FrenetState,

    /// Reference speed used for the desired trajectory
    pub ref_speed_ms: f64,

    pub report: StatusReport,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Pose on the track at the given curvilinear coordinates, facing along the
/// direction of increasing `s`.
pub fn pose_on_track<C: ArcCurve>(track: &Track<C>, s_m: f64, d_m: f64) -> Pose {
    let tangent = frenet::unit_tangent(track.curve(), s_m);
    Pose::new(track.sd_to_xy(s_m, d_m), tangent[1].atan2(tangent[0]))
}

/// Plan one cycle for the vehicle.
///
/// A new controller is built from the vehicle pose, given the vehicle's
/// unconsumed path as history, and then a lane keeping trajectory started
/// from the end of that history.
pub fn plan_cycle<C: ArcCurve>(
    track: &Track<C>,
    limits: KinematicLimits,
    vehicle: &SimVehicle,
    lane_keep: &LaneKeep,
    ref_speed: &mut RefSpeed,
) -> Result<CycleOutput, PathCtrlError> {
    let mut path_ctrl = PathCtrl::new(track, vehicle.pose(), limits);
    path_ctrl.update_path_history(vehicle.previous_path())?;

    let start = path_ctrl.end_of_history_sdv();
    let ref_speed_ms = ref_speed.step();

    path_ctrl.update_trajectory(lane_keep.plan(track, &start, ref_speed_ms))?;

    Ok(CycleOutput {
        path: path_ctrl.path().to_vec(),
        start,
        ref_speed_ms,
        report: *path_ctrl.report(),
    })
}

/// Plan and dispatch one cycle, keeping the vehicle on its previous path if
/// planning fails.
///
/// Returns the planning result so the caller can log or archive it.
pub fn step_cycle<C: ArcCurve>(
    track: &Track<C>,
    limits: KinematicLimits,
    vehicle: &mut SimVehicle,
    lane_keep: &LaneKeep,
    ref_speed: &mut RefSpeed,
) -> Result<CycleOutput, PathCtrlError> {
    let result = plan_cycle(track, limits, vehicle, lane_keep, ref_speed);

    match result {
        Ok(ref output) => vehicle.dispatch(&output.path),
        Err(ref e) => {
            warn!("Planning failed, continuing on the previous path: {}", e);
            let previous = vehicle.previous_path().to_vec();
            vehicle.dispatch(&previous)
        }
    };

    result
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
