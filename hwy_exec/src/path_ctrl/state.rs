//! Path control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::kinematics::differentiate;
use super::*;
use crate::curve::{ArcCurve, CubicSpline};
use crate::pose::Pose;
use crate::track::{FrenetState, SplineCurve, Track};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Path controller for a single planning cycle.
///
/// A controller is created from the vehicle pose at the start of the cycle,
/// which gives it a bootstrap path accelerating from rest along the current
/// heading. The caller then supplies the history (what is left of the
/// previous path) and the desired trajectory, each of which causes the path
/// to be recalculated.
pub struct PathCtrl<'t, C = SplineCurve> {
    track: &'t Track<C>,
    pub(crate) limits: KinematicLimits,

    /// Points carried over from the previous path, in the map frame
    history: Vec<Vector2<f64>>,

    trajectory: DesiredTrajectory,

    /// The generated path, in the map frame
    path: Vec<Vector2<f64>>,

    /// Kinematic samples of the generated path, in the local frame of the
    /// last recalculation. Empty until the first recalculation.
    samples: Vec<KinematicSample>,

    report: StatusReport,
}

/// Counts of the limits enforced during the last recalculation.
#[derive(Default, Copy, Clone, Debug, PartialEq, Serialize)]
pub struct StatusReport {
    /// Number of points added after the history
    pub num_synthesised: usize,

    /// Number of points whose lateral acceleration was limited
    pub num_lat_accel_limited: usize,

    /// Number of points whose change in lateral acceleration was limited
    pub num_lat_jerk_limited: usize,

    /// Number of points whose longitudinal acceleration was cut to respect
    /// the combined acceleration limit
    pub num_accel_limited: usize,

    /// Number of points whose longitudinal acceleration was cut to respect
    /// the combined jerk limit
    pub num_jerk_limited: usize,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<'t, C> PathCtrl<'t, C> {
    /// Create a new controller for the vehicle at the given pose.
    ///
    /// The bootstrap path starts from rest, increasing the acceleration by
    /// the jerk limit every step up to the acceleration limit, and the speed
    /// up to the speed limit, along the pose heading. It is used as the
    /// history, the desired trajectory and the path until the caller supplies
    /// its own.
    pub fn new(track: &'t Track<C>, pose: &Pose, limits: KinematicLimits) -> Self {
        let forward = pose.forward();

        let mut path = Vec::with_capacity(PATH_LENGTH);
        let mut trajectory = DesiredTrajectory::default();

        let mut position_m = pose.position_m;
        let mut speed_ms = 0.0;
        let mut accel_mss = 0.0;

        for _ in 0..PATH_LENGTH {
            accel_mss = f64::min(
                accel_mss + limits.jerk_limit_msss * DELTA_T_S,
                limits.accel_limit_mss,
            );
            speed_ms = f64::min(speed_ms + accel_mss * DELTA_T_S, limits.speed_limit_ms);
            position_m += speed_ms * DELTA_T_S * forward;

            path.push(position_m);
            trajectory.push(TrajectoryPoint {
                position_m,
                speed_ms,
            });
        }

        debug!(
            "Bootstrap path from ({:.3}, {:.3}) heading {:.3} rad, final speed {:.3} m/s",
            pose.position_m[0], pose.position_m[1], pose.heading_rad, speed_ms
        );

        Self {
            track,
            limits,
            history: path.clone(),
            trajectory,
            path,
            samples: Vec::new(),
            report: StatusReport::default(),
        }
    }

    /// Replace the history and recalculate the path.
    ///
    /// Updates with fewer than `MIN_HISTORY_UPDATE_POINTS` points are ignored,
    /// leaving the current history and path in place. If the recalculation
    /// fails the previous history is restored.
    pub fn update_path_history(&mut self, points_m: &[Vector2<f64>]) -> Result<(), PathCtrlError> {
        if points_m.len() < MIN_HISTORY_UPDATE_POINTS {
            debug!(
                "Ignoring history update with {} points (minimum {})",
                points_m.len(),
                MIN_HISTORY_UPDATE_POINTS
            );
            return Ok(());
        }

        let previous = std::mem::replace(&mut self.history, points_m.to_vec());
        let result = self.recalculate();
        if result.is_err() {
            self.history = previous;
        }
        result
    }

    /// Replace the desired trajectory and recalculate the path.
    ///
    /// If the recalculation fails the previous trajectory is restored.
    pub fn update_trajectory(&mut self, trajectory: DesiredTrajectory) -> Result<(), PathCtrlError> {
        let previous = std::mem::replace(&mut self.trajectory, trajectory);
        let result = self.recalculate();
        if result.is_err() {
            self.trajectory = previous;
        }
        result
    }

    /// Generated path in the map frame, `PATH_LENGTH` points long.
    pub fn path(&self) -> &[Vector2<f64>] {
        &self.path
    }

    pub fn path_x(&self) -> Vec<f64> {
        self.path.iter().map(|p| p[0]).collect()
    }

    pub fn path_y(&self) -> Vec<f64> {
        self.path.iter().map(|p| p[1]).collect()
    }

    pub fn history(&self) -> &[Vector2<f64>] {
        &self.history
    }

    pub fn trajectory(&self) -> &DesiredTrajectory {
        &self.trajectory
    }

    /// Kinematic samples of the generated path in the local frame of the last
    /// recalculation.
    pub fn samples(&self) -> &[KinematicSample] {
        &self.samples
    }

    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    pub fn limits(&self) -> &KinematicLimits {
        &self.limits
    }

    pub fn track(&self) -> &Track<C> {
        self.track
    }

    /// Recalculate the path from the current history and trajectory.
    ///
    /// On error the previous path, samples and report are left untouched.
    fn recalculate(&mut self) -> Result<(), PathCtrlError> {
        let num_history = self.history.len();

        let frame = match self.history.as_slice() {
            [.., prev, last] => LocalFrame::from_segment(prev, last),
            _ => return Err(PathCtrlError::HistoryTooShort(num_history)),
        };

        trace!(
            "Local frame at ({:.3}, {:.3}) heading {:.4} rad",
            frame.origin_m()[0],
            frame.origin_m()[1],
            frame.heading_rad()
        );

        let local_history: Vec<Vector2<f64>> =
            self.history.iter().map(|p| frame.to_local(p)).collect();

        let mut samples = differentiate(&local_history, DELTA_T_S);
        samples.truncate(PATH_LENGTH);

        let (y_spline, speed_spline) = self.fit_trajectory(&frame)?;

        let mut report = StatusReport::default();

        while samples.len() < PATH_LENGTH {
            let index = samples.len();
            let next = self
                .calc_next_sample(&samples[index - 1], &y_spline, &speed_spline, &mut report)
                .map_err(|fault| PathCtrlError::NumericalFault { index, fault })?;

            samples.push(next);
            report.num_synthesised += 1;
        }

        // History points are copied verbatim, only synthesised points go back
        // through the frame.
        let num_kept = num_history.min(PATH_LENGTH);
        let mut path = Vec::with_capacity(PATH_LENGTH);
        path.extend_from_slice(&self.history[..num_kept]);
        path.extend(
            samples[num_kept..]
                .iter()
                .map(|s| frame.to_global(&s.position_m)),
        );

        debug!(
            "Path recalculated: {} history points, {} synthesised, limits enforced: \
            lat accel {}, lat jerk {}, accel {}, jerk {}",
            num_kept,
            report.num_synthesised,
            report.num_lat_accel_limited,
            report.num_lat_jerk_limited,
            report.num_accel_limited,
            report.num_jerk_limited
        );

        self.path = path;
        self.samples = samples;
        self.report = report;

        Ok(())
    }

    /// Fit splines of local lateral position and of speed against local `x`
    /// through the desired trajectory.
    fn fit_trajectory(
        &self,
        frame: &LocalFrame,
    ) -> Result<(CubicSpline, CubicSpline), PathCtrlError> {
        let num_points = self.trajectory.len();
        let mut x_m = Vec::with_capacity(num_points);
        let mut y_m = Vec::with_capacity(num_points);
        let mut speed_ms = Vec::with_capacity(num_points);

        for point in self.trajectory.points() {
            let local = frame.to_local(&point.position_m);
            x_m.push(local[0]);
            y_m.push(local[1]);
            speed_ms.push(point.speed_ms);
        }

        let y_spline = CubicSpline::new(&x_m, &y_m).map_err(PathCtrlError::InvalidTrajectory)?;
        let speed_spline =
            CubicSpline::new(&x_m, &speed_ms).map_err(PathCtrlError::InvalidTrajectory)?;

        Ok((y_spline, speed_spline))
    }
}

impl<'t, C: ArcCurve> PathCtrl<'t, C> {
    /// Frenet position and velocity at the end of the history.
    ///
    /// The velocity is taken from the last two history points. This is where
    /// a planner should start the next desired trajectory from.
    pub fn end_of_history_sdv(&self) -> FrenetState {
        match self.history.as_slice() {
            [.., prev, last] => self
                .track
                .xyv_to_sdv(last, &((last - prev) / DELTA_T_S)),
            [last] => self.track.xyv_to_sdv(last, &Vector2::zeros()),
            [] => FrenetState::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
