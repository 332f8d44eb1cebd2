//! Spline backed arc-length curve

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;

use super::{TrackError, Waypoint};
use crate::curve::{ArcCurve, CubicSpline};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Track centreline represented by four cubic splines over `s`: the position
/// components `x(s)`, `y(s)` and the lateral normal components `dx(s)`,
/// `dy(s)`.
#[derive(Debug, Clone)]
pub struct SplineCurve {
    s_x: CubicSpline,
    s_y: CubicSpline,
    s_dx: CubicSpline,
    s_dy: CubicSpline,
    min_s: f64,
    max_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SplineCurve {
    /// Fit the curve to the given waypoints.
    ///
    /// The waypoints must be ordered by strictly increasing `s`.
    pub fn new(waypoints: &[Waypoint]) -> Result<Self, TrackError> {
        if waypoints.len() < 2 {
            return Err(TrackError::NotEnoughWaypoints(waypoints.len()));
        }

        let s: Vec<f64> = waypoints.iter().map(|w| w.s_m).collect();
        let x: Vec<f64> = waypoints.iter().map(|w| w.position_m[0]).collect();
        let y: Vec<f64> = waypoints.iter().map(|w| w.position_m[1]).collect();
        let dx: Vec<f64> = waypoints.iter().map(|w| w.normal[0]).collect();
        let dy: Vec<f64> = waypoints.iter().map(|w| w.normal[1]).collect();

        Ok(Self {
            s_x: CubicSpline::new(&s, &x)?,
            s_y: CubicSpline::new(&s, &y)?,
            s_dx: CubicSpline::new(&s, &dx)?,
            s_dy: CubicSpline::new(&s, &dy)?,
            min_s: s[0],
            max_s: s[s.len() - 1],
        })
    }
}

impl ArcCurve for SplineCurve {
    fn position(&self, s: f64) -> Vector2<f64> {
        Vector2::new(self.s_x.eval(s), self.s_y.eval(s))
    }

    fn normal(&self, s: f64) -> Vector2<f64> {
        Vector2::new(self.s_dx.eval(s), self.s_dy.eval(s))
    }

    fn s_bounds(&self) -> (f64, f64) {
        (self.min_s, self.max_s)
    }
}
