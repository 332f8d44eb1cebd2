//! # Curve module
//!
//! Scalar interpolants over an ordered parameter, and the arc-length
//! parameterised curve capability the track frame converter is written
//! against.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod spline;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;

pub use spline::CubicSpline;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A planar curve parameterised by arc-length `s`.
///
/// The curve carries a lateral normal at every `s`, which defines the sense of
/// the lateral offset `d`. The normal does not have to be unit length, users
/// normalise it where required.
pub trait ArcCurve {
    /// Position of the curve at `s`.
    fn position(&self, s: f64) -> Vector2<f64>;

    /// Lateral normal of the curve at `s`.
    fn normal(&self, s: f64) -> Vector2<f64>;

    /// The range of `s` covered by the samples the curve was built from, as
    /// `(min_s, max_s)`.
    fn s_bounds(&self) -> (f64, f64);
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while fitting a curve.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("At least 2 samples are required to fit a curve, found {0}")]
    NotEnoughSamples(usize),

    #[error("Expected the same number of parameters and values, found {params} and {values}")]
    LengthMismatch {
        params: usize,
        values: usize
    },

    #[error("Parameters must be strictly increasing, but sample {index} ({param}) does not exceed the previous ({prev_param})")]
    NotStrictlyIncreasing {
        index: usize,
        prev_param: f64,
        param: f64
    },

    #[error("Sample {0} is not finite")]
    NonFiniteSample(usize)
}
