//! Frenet (s, d) conversions against an arc-length curve
//!
//! The inverse conversion is a one dimensional Gauss-Newton projection of the
//! point onto the curve, seeded by a coarse search. It converges to a local
//! nearest point only, on tight or self-intersecting curves it can settle on
//! the wrong branch.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use nalgebra::Vector2;

use super::{FrenetPoint, FrenetState};
use crate::curve::ArcCurve;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of evenly spaced samples (ends included) in the seed search.
pub const SEED_SAMPLES: usize = 21;

/// Maximum number of projection refinement iterations.
pub const REFINE_ITERATIONS: usize = 20;

/// Refinement stops once an update to `s` is smaller than this.
///
/// Units: meters
pub const REFINE_TOLERANCE_M: f64 = 0.01;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Position at curvilinear coordinates `(s, d)`.
pub fn sd_to_xy<C: ArcCurve>(curve: &C, s_m: f64, d_m: f64) -> Vector2<f64> {
    curve.position(s_m) + d_m * curve.normal(s_m)
}

/// Approximate curvilinear coordinates of a position.
pub fn xy_to_sd<C: ArcCurve>(curve: &C, position_m: &Vector2<f64>) -> FrenetPoint {
    let mut s_est = seed_s(curve, position_m);

    for _ in 0..REFINE_ITERATIONS {
        let residual = position_m - curve.position(s_est);
        let delta_s = residual.dot(&unit_tangent(curve, s_est));
        s_est += delta_s;

        if delta_s.abs() < REFINE_TOLERANCE_M {
            break;
        }
    }

    let residual = position_m - curve.position(s_est);

    FrenetPoint {
        s_m: s_est,
        d_m: residual.dot(&unit_normal(curve, s_est)),
    }
}

/// Approximate curvilinear position and velocity of a moving point.
pub fn xyv_to_sdv<C: ArcCurve>(
    curve: &C,
    position_m: &Vector2<f64>,
    velocity_ms: &Vector2<f64>,
) -> FrenetState {
    let sd = xy_to_sd(curve, position_m);

    FrenetState {
        s_m: sd.s_m,
        d_m: sd.d_m,
        vs_ms: velocity_ms.dot(&unit_tangent(curve, sd.s_m)),
        vd_ms: velocity_ms.dot(&unit_normal(curve, sd.s_m)),
    }
}

/// Unit vector in the direction of increasing `s`, the lateral normal rotated
/// 90 degrees anticlockwise.
pub fn unit_tangent<C: ArcCurve>(curve: &C, s_m: f64) -> Vector2<f64> {
    let n = curve.normal(s_m);
    Vector2::new(-n[1], n[0]).normalize()
}

/// Unit lateral normal at `s`.
pub fn unit_normal<C: ArcCurve>(curve: &C, s_m: f64) -> Vector2<f64> {
    curve.normal(s_m).normalize()
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Coarse search for the sample of `s` closest to the position.
fn seed_s<C: ArcCurve>(curve: &C, position_m: &Vector2<f64>) -> f64 {
    let (min_s, max_s) = curve.s_bounds();
    let step = (max_s - min_s) / (SEED_SAMPLES - 1) as f64;

    let mut s_est = min_s;
    let mut dist2_est = (curve.position(min_s) - position_m).norm_squared();

    for i in 1..SEED_SAMPLES {
        let s = min_s + i as f64 * step;
        let dist2 = (curve.position(s) - position_m).norm_squared();
        if dist2 < dist2_est {
            dist2_est = dist2;
            s_est = s;
        }
    }

    trace!("Seed s for {:?}: {:.3} (dist^2 {:.3})", position_m, s_est, dist2_est);

    s_est
}
