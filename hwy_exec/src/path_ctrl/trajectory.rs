//! Desired trajectory supplied by the planner

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::iter::FromIterator;

use nalgebra::Vector2;

use super::PathCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A point the planner would like the vehicle to pass through, and the speed
/// it would like it to have there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    /// Position in the map frame
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// Units: meters/second
    pub speed_ms: f64,
}

/// Ordered sequence of desired trajectory points.
///
/// The points must be ordered along the direction of travel, once expressed
/// in the path control local frame their `x` coordinates have to be strictly
/// increasing or the recalculation rejects the trajectory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesiredTrajectory {
    points: Vec<TrajectoryPoint>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DesiredTrajectory {
    pub fn new(points: Vec<TrajectoryPoint>) -> Self {
        Self { points }
    }

    /// Build from separate x, y and speed sequences, which must all be the
    /// same length.
    pub fn from_components(
        x_m: &[f64],
        y_m: &[f64],
        speed_ms: &[f64],
    ) -> Result<Self, PathCtrlError> {
        if x_m.len() != y_m.len() || x_m.len() != speed_ms.len() {
            return Err(PathCtrlError::TrajectoryLengthMismatch {
                x_len: x_m.len(),
                y_len: y_m.len(),
                speed_len: speed_ms.len(),
            });
        }

        Ok(x_m
            .iter()
            .zip(y_m.iter())
            .zip(speed_ms.iter())
            .map(|((&x, &y), &speed)| TrajectoryPoint {
                position_m: Vector2::new(x, y),
                speed_ms: speed,
            })
            .collect())
    }

    pub fn push(&mut self, point: TrajectoryPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<TrajectoryPoint> for DesiredTrajectory {
    fn from_iter<I: IntoIterator<Item = TrajectoryPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_components() {
        let traj =
            DesiredTrajectory::from_components(&[0.0, 10.0], &[1.0, 2.0], &[20.0, 21.0]).unwrap();

        assert_eq!(traj.len(), 2);
        assert_eq!(traj.points()[1].position_m, Vector2::new(10.0, 2.0));
        assert_eq!(traj.points()[1].speed_ms, 21.0);

        assert_eq!(
            DesiredTrajectory::from_components(&[0.0, 10.0], &[1.0], &[20.0, 21.0]),
            Err(PathCtrlError::TrajectoryLengthMismatch {
                x_len: 2,
                y_len: 1,
                speed_len: 2
            })
        );
    }
}
