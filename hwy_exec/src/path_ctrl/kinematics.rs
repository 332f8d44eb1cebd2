//! Kinematic samples and differentiation of sampled positions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Position, velocity and acceleration at one path point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicSample {
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// Units: meters/second
    pub velocity_ms: Vector2<f64>,

    /// Units: meters/second^2
    pub accel_mss: Vector2<f64>,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Estimate velocity and acceleration at each of a sequence of positions
/// sampled every `dt_s`.
///
/// The first sample takes the forward difference to the second, every other
/// sample takes the backward difference to its predecessor. With a single
/// position the velocity and acceleration are zero.
pub fn differentiate(positions_m: &[Vector2<f64>], dt_s: f64) -> Vec<KinematicSample> {
    let velocities_ms = finite_difference(positions_m, dt_s);
    let accels_mss = finite_difference(&velocities_ms, dt_s);

    positions_m
        .iter()
        .zip(velocities_ms.iter())
        .zip(accels_mss.iter())
        .map(|((p, v), a)| KinematicSample {
            position_m: *p,
            velocity_ms: *v,
            accel_mss: *a,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn finite_difference(values: &[Vector2<f64>], dt_s: f64) -> Vec<Vector2<f64>> {
    if values.len() < 2 {
        return vec![Vector2::zeros(); values.len()];
    }

    let mut diffs = Vec::with_capacity(values.len());
    diffs.push((values[1] - values[0]) / dt_s);
    diffs.extend(values.windows(2).map(|w| (w[1] - w[0]) / dt_s));

    diffs
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
