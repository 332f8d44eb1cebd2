//! Main highway executable entry point.
//!
//! # Architecture
//!
//! The executable drives a simulated vehicle around a track in closed loop:
//!
//!     - Initialise session, logging and parameters
//!     - Load the track map
//!     - Main loop, once per cycle:
//!         - Build a path controller from the vehicle pose
//!         - Give it the vehicle's unconsumed path as history
//!         - Give it a lane keeping desired trajectory
//!         - Dispatch the generated path to the vehicle, or keep the vehicle
//!           on its previous path if planning failed
//!         - Archive the cycle and the generated path

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::info;
use serde::Serialize;

// Internal
use hwy_lib::{
    params::HwyExecParams,
    path_ctrl::{KinematicLimits, StatusReport},
    sim::{self, lane_centre_d_m, LaneKeep, RefSpeed, SimVehicle},
    track::Track,
};
use util::{
    archive::Archiver,
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One archived row per cycle.
#[derive(Serialize)]
struct CycleRecord {
    cycle: usize,
    ok: bool,
    x_m: f64,
    y_m: f64,
    s_m: f64,
    d_m: f64,
    speed_ms: f64,
    ref_speed_ms: f64,
    num_synthesised: usize,
    num_lat_accel_limited: usize,
    num_lat_jerk_limited: usize,
    num_accel_limited: usize,
    num_jerk_limited: usize,
}

/// One archived row per generated path point.
#[derive(Serialize)]
struct PathRecord {
    cycle: usize,
    index: usize,
    x_m: f64,
    y_m: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("hwy_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger, per-point path control traces are only wanted when
    // debugging the controller itself
    logger_init(
        LevelFilter::Debug,
        &[("hwy_lib::path_ctrl::calc_extension", LevelFilter::Info)],
        &session,
    )
    .wrap_err("Failed to initialise logging")?;

    info!("Highway Path Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: HwyExecParams =
        util::params::load("hwy_exec.toml").wrap_err("Could not load exec params")?;
    let limits: KinematicLimits =
        util::params::load("path_ctrl.toml").wrap_err("Could not load path control params")?;

    info!("Exec parameters loaded: {:?}", exec_params);
    info!("Kinematic limits loaded: {:?}", limits);

    session
        .save_params("hwy_exec.toml", &exec_params)
        .wrap_err("Could not save the exec params")?;
    session
        .save_params("path_ctrl.toml", &limits)
        .wrap_err("Could not save the path control params")?;

    // ---- LOAD TRACK ----

    let map_path = host::get_sw_root()
        .wrap_err("Could not get the software root")?
        .join(&exec_params.map_file);
    let track = Track::from_map_file(&map_path)
        .wrap_err_with(|| format!("Could not load the track from {:?}", map_path))?;

    info!(
        "Track loaded: s = [{:.1}, {:.1}] m, circular: {}",
        track.min_s(),
        track.max_s(),
        track.is_circular()
    );

    // ---- INITIALISE SIMULATION ----

    let lane_keep = LaneKeep::new(
        exec_params.lane,
        exec_params.num_trajectory_points,
        exec_params.trajectory_spacing_m,
    );
    let mut ref_speed = RefSpeed::new(exec_params.ref_speed_step_ms, limits.speed_limit_ms);
    let mut vehicle = SimVehicle::new(
        sim::pose_on_track(
            &track,
            exec_params.start_s_m,
            lane_centre_d_m(exec_params.lane),
        ),
        exec_params.points_per_cycle,
    );

    let mut cycle_archiver = Archiver::from_path(&session, "hwy_exec/cycles.csv")
        .wrap_err("Could not create the cycle archive")?;
    let mut path_archiver = Archiver::from_path(&session, "path_ctrl/paths.csv")
        .wrap_err("Could not create the path archive")?;

    // ---- MAIN LOOP ----

    info!("Running {} cycles\n", exec_params.num_cycles);

    let mut num_failed = 0;

    for cycle in 0..exec_params.num_cycles {
        let result = sim::step_cycle(&track, limits, &mut vehicle, &lane_keep, &mut ref_speed);

        let position_m = vehicle.pose().position_m;
        let sd = track.xy_to_sd(&position_m);

        let (ok, ref_speed_ms, report) = match result {
            Ok(output) => {
                for (index, point) in output.path.iter().enumerate() {
                    path_archiver
                        .serialise(PathRecord {
                            cycle,
                            index,
                            x_m: point[0],
                            y_m: point[1],
                        })
                        .wrap_err("Could not archive the path")?;
                }

                (true, output.ref_speed_ms, output.report)
            }
            Err(_) => {
                num_failed += 1;
                (false, ref_speed.speed_ms(), StatusReport::default())
            }
        };

        cycle_archiver
            .serialise(CycleRecord {
                cycle,
                ok,
                x_m: position_m[0],
                y_m: position_m[1],
                s_m: sd.s_m,
                d_m: sd.d_m,
                speed_ms: vehicle.speed_ms(),
                ref_speed_ms,
                num_synthesised: report.num_synthesised,
                num_lat_accel_limited: report.num_lat_accel_limited,
                num_lat_jerk_limited: report.num_lat_jerk_limited,
                num_accel_limited: report.num_accel_limited,
                num_jerk_limited: report.num_jerk_limited,
            })
            .wrap_err("Could not archive the cycle")?;
    }

    info!(
        "Finished: {} cycles, {} failed, {:.1} m driven",
        exec_params.num_cycles,
        num_failed,
        vehicle.distance_m()
    );

    Ok(())
}
