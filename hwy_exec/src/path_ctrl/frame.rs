//! Local frame used during path extension

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Rotation2, Vector2};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A Cartesian frame translated to a reference position and rotated so that
/// its x axis points along a reference heading.
#[derive(Debug, Clone, Copy)]
pub struct LocalFrame {
    origin_m: Vector2<f64>,
    heading_rad: f64,
    rotation: Rotation2<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LocalFrame {
    pub fn new(origin_m: Vector2<f64>, heading_rad: f64) -> Self {
        Self {
            origin_m,
            heading_rad,
            rotation: Rotation2::new(heading_rad),
        }
    }

    /// Frame anchored on `last_m` and pointing away from `prev_m`.
    pub fn from_segment(prev_m: &Vector2<f64>, last_m: &Vector2<f64>) -> Self {
        let delta = last_m - prev_m;
        Self::new(*last_m, delta[1].atan2(delta[0]))
    }

    /// Express a map frame point in this frame.
    pub fn to_local(&self, point_m: &Vector2<f64>) -> Vector2<f64> {
        self.rotation.inverse_transform_vector(&(point_m - self.origin_m))
    }

    /// Express a point in this frame in the map frame.
    pub fn to_global(&self, point_m: &Vector2<f64>) -> Vector2<f64> {
        self.rotation * point_m + self.origin_m
    }

    pub fn origin_m(&self) -> &Vector2<f64> {
        &self.origin_m
    }

    pub fn heading_rad(&self) -> f64 {
        self.heading_rad
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
