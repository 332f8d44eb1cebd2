//! # Track module
//!
//! The track is the road centreline, given as a set of waypoints each with an
//! arc-length `s` along the centreline and a lateral normal. It provides
//! conversion between Cartesian map coordinates `(x, y)` and the curvilinear
//! (Frenet) coordinates `(s, d)`, where `d` is the signed offset from the
//! centreline in the direction of the normal.
//!
//! A track is built once and then only read, so it can be shared by
//! reference between any number of planners.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod frenet;
pub mod map;
mod spline_curve;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::Path;

use log::debug;
use nalgebra::Vector2;
use serde::Serialize;

use crate::curve::{ArcCurve, CurveError};
use util::maths::{norm, rem_euclid};

pub use spline_curve::SplineCurve;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// If the first and last waypoints are closer than this the track is treated
/// as a closed loop.
///
/// Units: meters
pub const CIRCULAR_THRESHOLD_M: f64 = 100.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single point on the track centreline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Distance along the centreline
    ///
    /// Units: meters
    pub s_m: f64,

    /// Position in the map frame
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// Unit lateral normal, pointing in the direction of positive `d`.
    pub normal: Vector2<f64>,
}

/// A position in curvilinear coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FrenetPoint {
    pub s_m: f64,
    pub d_m: f64,
}

/// A position and velocity in curvilinear coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FrenetState {
    pub s_m: f64,
    pub d_m: f64,

    /// Velocity along the centreline
    pub vs_ms: f64,

    /// Velocity across the centreline
    pub vd_ms: f64,
}

/// The track frame converter.
#[derive(Debug, Clone)]
pub struct Track<C = SplineCurve> {
    curve: C,
    min_s: f64,
    max_s: f64,
    endpoint_distance_m: f64,
    circular: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("A track needs at least 2 waypoints, found {0}")]
    NotEnoughWaypoints(usize),

    #[error("Could not fit the track curve: {0}")]
    CurveFitError(#[from] CurveError),

    #[error("Could not read the map file: {0}")]
    MapFileError(std::io::Error),

    #[error("Malformed map file line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Track<SplineCurve> {
    /// Build a track by fitting splines through the given waypoints.
    pub fn from_waypoints(waypoints: &[Waypoint]) -> Result<Self, TrackError> {
        Ok(Self::from_curve(SplineCurve::new(waypoints)?))
    }

    /// Load the track from a map file.
    pub fn from_map_file<P: AsRef<Path>>(path: P) -> Result<Self, TrackError> {
        let waypoints = map::load_waypoints(path)?;
        Self::from_waypoints(&waypoints)
    }
}

impl<C: ArcCurve> Track<C> {
    /// Build a track around an existing curve.
    pub fn from_curve(curve: C) -> Self {
        let (min_s, max_s) = curve.s_bounds();

        let start = curve.position(min_s);
        let end = curve.position(max_s);
        let endpoint_distance_m = norm(start.as_slice(), end.as_slice()).unwrap_or(f64::NAN);
        let circular = endpoint_distance_m < CIRCULAR_THRESHOLD_M;

        debug!(
            "Track covers s = [{:.3}, {:.3}], endpoint distance {:.3} m, circular: {}",
            min_s, max_s, endpoint_distance_m, circular
        );

        Self {
            curve,
            min_s,
            max_s,
            endpoint_distance_m,
            circular,
        }
    }

    /// Cartesian position at the given curvilinear coordinates.
    ///
    /// `s` is used as given, on a circular track wrapping it into range is the
    /// caller's job (see [`Track::normalise_s`]).
    pub fn sd_to_xy(&self, s_m: f64, d_m: f64) -> Vector2<f64> {
        frenet::sd_to_xy(&self.curve, s_m, d_m)
    }

    /// Approximate curvilinear coordinates of a Cartesian position.
    ///
    /// This always returns a best effort answer, callers which need to know
    /// the quality of the fit should check the residual distance themselves.
    pub fn xy_to_sd(&self, position_m: &Vector2<f64>) -> FrenetPoint {
        frenet::xy_to_sd(&self.curve, position_m)
    }

    /// Approximate curvilinear position and velocity of a moving point.
    pub fn xyv_to_sdv(&self, position_m: &Vector2<f64>, velocity_ms: &Vector2<f64>) -> FrenetState {
        frenet::xyv_to_sdv(&self.curve, position_m, velocity_ms)
    }

    /// Wrap `s` onto one lap of a circular track.
    ///
    /// The lap length includes the gap between the last and first waypoints.
    /// On an open track `s` is returned unchanged.
    pub fn normalise_s(&self, s_m: f64) -> f64 {
        if !self.circular {
            return s_m;
        }

        self.min_s + rem_euclid(s_m - self.min_s, self.lap_length_m())
    }

    /// Length of one lap of the track, including the closing gap.
    pub fn lap_length_m(&self) -> f64 {
        self.max_s - self.min_s + self.endpoint_distance_m
    }

    pub fn min_s(&self) -> f64 {
        self.min_s
    }

    pub fn max_s(&self) -> f64 {
        self.max_s
    }

    /// True if the track closes on itself.
    pub fn is_circular(&self) -> bool {
        self.circular
    }

    /// Distance between the first and last waypoints.
    pub fn endpoint_distance_m(&self) -> f64 {
        self.endpoint_distance_m
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------


#[cfg(test)]
mod test {
    use super::test_tracks::*;
    use super::*;
    use approx::assert_abs_diff_eq;

    /// A perfect circle of radius 200 m, used to check the projection logic
    /// against a curve that isn't a spline.
    struct Circle;

    impl ArcCurve for Circle {
        fn position(&self, s: f64) -> Vector2<f64> {
            let theta = s / 200.0;
            Vector2::new(200.0 * theta.cos(), 200.0 * theta.sin())
        }

        fn normal(&self, s: f64) -> Vector2<f64> {
            let theta = s / 200.0;
            Vector2::new(theta.cos(), theta.sin())
        }

        fn s_bounds(&self) -> (f64, f64) {
            (0.0, 1000.0)
        }
    }

    #[test]
    fn test_straight_sd_to_xy() {
        let track = straight_with_normal(Vector2::new(0.0, 1.0));

        assert_eq!(track.min_s(), 0.0);
        assert_eq!(track.max_s(), 300.0);
        assert!(!track.is_circular());

        let xy = track.sd_to_xy(50.0, 0.0);
        assert_abs_diff_eq!(xy[0], 50.0, epsilon = 1e-12);
        assert_abs_diff_eq!(xy[1], 0.0, epsilon = 1e-12);

        let xy = track.sd_to_xy(50.0, 3.7);
        assert_abs_diff_eq!(xy[0], 50.0, epsilon = 1e-12);
        assert_abs_diff_eq!(xy[1], 3.7, epsilon = 1e-12);
    }

    #[test]
    fn test_straight_xy_to_sd() {
        let track = straight();

        let sd = track.xy_to_sd(&Vector2::new(123.4, -2.5));
        assert_abs_diff_eq!(sd.s_m, 123.4, epsilon = 1e-9);
        assert_abs_diff_eq!(sd.d_m, 2.5, epsilon = 1e-9);

        let xy = track.sd_to_xy(sd.s_m, sd.d_m);
        assert_abs_diff_eq!(xy[0], 123.4, epsilon = 1e-9);
        assert_abs_diff_eq!(xy[1], -2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_idempotent_inversion() {
        let track = straight();
        for &(s, d) in [(20.0, 0.0), (150.0, 4.0), (280.0, -3.0)].iter() {
            let sd = track.xy_to_sd(&track.sd_to_xy(s, d));
            assert_abs_diff_eq!(sd.s_m, s, epsilon = 1e-6);
            assert_abs_diff_eq!(sd.d_m, d, epsilon = 1e-6);
        }

        let track = ring();
        for &s in [100.0, 700.0, 1500.0].iter() {
            let sd = track.xy_to_sd(&track.sd_to_xy(s, 0.0));
            assert_abs_diff_eq!(sd.s_m, s, epsilon = 1e-6);
            assert_abs_diff_eq!(sd.d_m, 0.0, epsilon = 1e-6);
        }

        // Off the centreline of a curved track the projection converges
        // linearly, so the tolerance is looser.
        for &(s, d) in [(100.0, 4.0), (900.0, -4.0)].iter() {
            let sd = track.xy_to_sd(&track.sd_to_xy(s, d));
            assert_abs_diff_eq!(sd.s_m, s, epsilon = 1e-3);
            assert_abs_diff_eq!(sd.d_m, d, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_round_trip() {
        let track = ring();

        for i in 0..40 {
            let theta = 0.1 + 0.15 * i as f64;
            let radius = 300.0 + (i as f64 * 0.73).sin() * 4.9;
            let xy = Vector2::new(radius * theta.cos(), radius * theta.sin());

            let sd = track.xy_to_sd(&xy);
            let xy_back = track.sd_to_xy(sd.s_m, sd.d_m);

            assert!(
                (xy_back - xy).norm() < 0.5,
                "Round trip of {:?} gave {:?}",
                xy,
                xy_back
            );
        }
    }

    #[test]
    fn test_xyv_to_sdv() {
        let track = straight();
        let sdv = track.xyv_to_sdv(&Vector2::new(75.0, 1.0), &Vector2::new(20.0, -0.5));

        assert_abs_diff_eq!(sdv.s_m, 75.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sdv.d_m, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sdv.vs_ms, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sdv.vd_ms, 0.5, epsilon = 1e-9);

        // On the ring at s = 0 the direction of travel is +y and d is +x
        let track = ring();
        let sdv = track.xyv_to_sdv(&Vector2::new(302.0, 0.0), &Vector2::new(1.0, 15.0));
        assert_abs_diff_eq!(sdv.s_m, 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(sdv.d_m, 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(sdv.vs_ms, 15.0, epsilon = 1e-3);
        assert_abs_diff_eq!(sdv.vd_ms, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_non_finite_position() {
        let track = ring();
        let sd = track.xy_to_sd(&Vector2::new(f64::NAN, 10.0));
        assert!(sd.s_m.is_nan());
        assert!(sd.d_m.is_nan());
    }

    #[test]
    fn test_circular_detection() {
        let track = ring();
        assert!(track.is_circular());
        assert!(track.endpoint_distance_m() < CIRCULAR_THRESHOLD_M);

        // Dropping the last third of the ring opens it up
        let waypoints = ring_waypoints(300.0, 60);
        let open = Track::from_waypoints(&waypoints[..40]).unwrap();
        assert!(!open.is_circular());
        assert_eq!(open.normalise_s(5000.0), 5000.0);
    }

    #[test]
    fn test_normalise_s() {
        let track = ring();
        let lap = track.lap_length_m();

        assert_abs_diff_eq!(lap, std::f64::consts::TAU * 300.0, epsilon = 0.1);
        assert_abs_diff_eq!(track.normalise_s(lap + 12.0), 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(track.normalise_s(-12.0), lap - 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(track.normalise_s(345.0), 345.0, epsilon = 1e-9);
    }

    #[test]
    fn test_custom_curve() {
        let track = Track::from_curve(Circle);
        assert!(!track.is_circular());

        let sd = track.xy_to_sd(&track.sd_to_xy(400.0, 0.0));
        assert_abs_diff_eq!(sd.s_m, 400.0, epsilon = 1e-6);
        assert_abs_diff_eq!(sd.d_m, 0.0, epsilon = 1e-6);

        let sd = track.xy_to_sd(&Vector2::new(0.0, 203.0));
        assert_abs_diff_eq!(sd.s_m, 100.0 * std::f64::consts::PI, epsilon = 1e-3);
        assert_abs_diff_eq!(sd.d_m, 3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_rejects_bad_waypoints() {
        let mut waypoints = ring_waypoints(300.0, 10);
        waypoints[4].s_m = waypoints[3].s_m;

        match Track::from_waypoints(&waypoints) {
            Err(TrackError::CurveFitError(CurveError::NotStrictlyIncreasing { index, .. })) => {
                assert_eq!(index, 4)
            }
            other => panic!("Expected a curve fit error, got {:?}", other.map(|_| ())),
        }

        match Track::from_waypoints(&waypoints[..1]) {
            Err(TrackError::NotEnoughWaypoints(1)) => (),
            other => panic!("Expected not enough waypoints, got {:?}", other.map(|_| ())),
        }
    }
}
