//! Simulated vehicle

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use nalgebra::Vector2;

use crate::path_ctrl::DELTA_T_S;
use crate::pose::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A vehicle which follows dispatched paths exactly, consuming a fixed number
/// of points per cycle.
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pose: Pose,
    points_per_cycle: usize,

    /// Unconsumed points of the last dispatched path
    previous_path: Vec<Vector2<f64>>,

    /// Speed between the last two consumed points
    ///
    /// Units: meters/second
    speed_ms: f64,

    /// Total distance travelled
    ///
    /// Units: meters
    distance_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimVehicle {
    /// Create a stationary vehicle at the given pose.
    pub fn new(pose: Pose, points_per_cycle: usize) -> Self {
        Self {
            pose,
            points_per_cycle,
            previous_path: Vec::new(),
            speed_ms: 0.0,
            distance_m: 0.0,
        }
    }

    /// Follow the start of a path for one cycle.
    ///
    /// Up to `points_per_cycle` points are consumed, the pose is moved to the
    /// last of them and the rest of the path is kept as the previous path.
    /// Returns the number of points consumed.
    pub fn dispatch(&mut self, path_m: &[Vector2<f64>]) -> usize {
        let num_consumed = self.points_per_cycle.min(path_m.len());
        let mut position_m = self.pose.position_m;

        for point in path_m[..num_consumed].iter() {
            let step_m = point - position_m;
            self.distance_m += step_m.norm();
            self.speed_ms = step_m.norm() / DELTA_T_S;

            if step_m.norm() > 0.0 {
                self.pose.heading_rad = step_m[1].atan2(step_m[0]);
            }

            position_m = *point;
        }

        self.pose.position_m = position_m;
        self.previous_path = path_m[num_consumed..].to_vec();

        trace!(
            "Vehicle consumed {} points, now at ({:.3}, {:.3}) at {:.3} m/s",
            num_consumed,
            position_m[0],
            position_m[1],
            self.speed_ms
        );

        num_consumed
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// The part of the last dispatched path not yet driven.
    pub fn previous_path(&self) -> &[Vector2<f64>] {
        &self.previous_path
    }

    pub fn speed_ms(&self) -> f64 {
        self.speed_ms
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_dispatch() {
        let mut vehicle = SimVehicle::new(Pose::default(), 3);
        assert!(vehicle.previous_path().is_empty());

        let path: Vec<Vector2<f64>> = (1..=5)
            .map(|i| Vector2::new(0.0, 0.2 * i as f64))
            .collect();

        assert_eq!(vehicle.dispatch(&path), 3);
        assert_eq!(vehicle.pose().position_m, path[2]);
        assert_abs_diff_eq!(vehicle.pose().heading_rad, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(vehicle.speed_ms(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(vehicle.distance_m(), 0.6, epsilon = 1e-12);
        assert_eq!(vehicle.previous_path(), &path[3..]);

        // Running out of path leaves the vehicle at its end
        let remaining = vehicle.previous_path().to_vec();
        assert_eq!(vehicle.dispatch(&remaining), 2);
        assert_eq!(vehicle.pose().position_m, path[4]);
        assert!(vehicle.previous_path().is_empty());

        assert_eq!(vehicle.dispatch(&[]), 0);
        assert_eq!(vehicle.pose().position_m, path[4]);
    }
}
