//! Synthesis of a single new path point

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use nalgebra::Vector2;

use super::*;
use crate::curve::CubicSpline;
use util::maths::clamp_preserving_sign;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Fraction of the acceleration limit available for lateral acceleration.
const LAT_ACCEL_MARGIN: f64 = 0.9;

/// Fraction of the jerk limit available for changes in lateral acceleration.
const LAT_JERK_MARGIN: f64 = 0.9;

/// Fraction of the squared limits allowed for the combined acceleration and
/// the combined change in acceleration.
const COMBINED_MARGIN: f64 = 0.98;

/// Fraction of the jerk limit above which the combined change in
/// acceleration is cut back.
const JERK_TRIGGER_MARGIN: f64 = 0.99;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<'t, C> PathCtrl<'t, C> {
    /// Calculate the next sample of the path from the last one.
    ///
    /// Lateral acceleration is chosen first, as the average of the
    /// acceleration that would put the vehicle on the desired lateral position
    /// at the end of the lookahead and the one that would give it the lateral
    /// velocity needed to get there. It is then limited in magnitude and rate.
    ///
    /// Longitudinal acceleration takes the vehicle towards the desired speed
    /// less whatever the lateral motion needs, and gets whatever is left of
    /// the acceleration and jerk budgets.
    ///
    /// All quantities are in the local frame.
    pub(crate) fn calc_next_sample(
        &self,
        last: &KinematicSample,
        y_spline: &CubicSpline,
        speed_spline: &CubicSpline,
        report: &mut StatusReport,
    ) -> Result<KinematicSample, NumericalFault> {
        let accel_limit = self.limits.accel_limit_mss;
        let jerk_limit = self.limits.jerk_limit_msss;
        let t = LOOKAHEAD_S;

        let last_x = last.position_m[0];
        let last_y = last.position_m[1];
        let last_vx = last.velocity_ms[0];
        let last_vy = last.velocity_ms[1];
        let last_ax = last.accel_mss[0];
        let last_ay = last.accel_mss[1];

        // Where the current motion would take the vehicle over the lookahead
        let future_m = last.position_m + last.velocity_ms * t + 0.5 * last.accel_mss * t.powi(2);
        let future_x = future_m[0];
        let future_y = future_m[1];

        // ---- LATERAL ----

        let future_des_y = y_spline.eval(future_x);

        // Average lateral velocity to the target, then the final velocity
        // which gives that average from the current one
        let mut future_des_vy = (future_des_y - last_y) / t;
        future_des_vy += future_des_vy - last_vy;

        let ay_for_des_y = 2.0 * (future_des_y - future_y) / t.powi(2);
        let ay_for_des_vy = (future_des_vy - last_vy) / t;
        let mut ay = 0.5 * (ay_for_des_y + ay_for_des_vy);

        let ay_limited = clamp_preserving_sign(ay, LAT_ACCEL_MARGIN * accel_limit);
        if ay_limited != ay {
            trace!("Lateral acceleration limited from {:.4} to {:.4}", ay, ay_limited);
            report.num_lat_accel_limited += 1;
            ay = ay_limited;
        }

        let ay_step = ay - last_ay;
        let ay_step_limited =
            clamp_preserving_sign(ay_step, LAT_JERK_MARGIN * jerk_limit * DELTA_T_S);
        if ay_step_limited != ay_step {
            trace!(
                "Lateral acceleration change limited from {:.4} to {:.4}",
                ay_step,
                ay_step_limited
            );
            report.num_lat_jerk_limited += 1;
            ay = last_ay + ay_step_limited;
        }

        // ---- LONGITUDINAL ----

        let future_des_speed = self.limits.speed_limit_ms.max(speed_spline.eval(future_x));
        let future_des_vx = (future_des_speed.powi(2)
            - 2.0 * last_vy.powi(2).max(future_des_vy.powi(2)))
        .sqrt();
        let mut ax = (future_des_vx - last_vx) / t;

        let accel_sq_limit = COMBINED_MARGIN * accel_limit.powi(2);
        if ax.powi(2) + ay.powi(2) > accel_sq_limit {
            let ax_max = (accel_sq_limit - ay.powi(2)).max(0.0).sqrt();
            let ax_limited = clamp_preserving_sign(ax, ax_max);

            if ax_limited.is_nan() {
                return Err(NumericalFault::AccelLimitedAx {
                    ax,
                    ay,
                    accel_limit_mss: accel_limit,
                });
            }

            trace!("Acceleration limited, ax from {:.4} to {:.4}", ax, ax_limited);
            report.num_accel_limited += 1;
            ax = ax_limited;
        }

        let jerk_step = jerk_limit * DELTA_T_S;
        let ay_step = ay - last_ay;
        if (ax - last_ax).hypot(ay_step) > JERK_TRIGGER_MARGIN * jerk_step {
            let ax_step_max = (COMBINED_MARGIN * jerk_step.powi(2) - ay_step.powi(2))
                .max(0.0)
                .sqrt();
            let ax_limited = last_ax + clamp_preserving_sign(ax - last_ax, ax_step_max);

            if ax_limited.is_nan() {
                return Err(NumericalFault::JerkLimitedAx {
                    last_ax,
                    ay,
                    last_ay,
                    jerk_limit_msss: jerk_limit,
                });
            }

            trace!("Jerk limited, ax from {:.4} to {:.4}", ax, ax_limited);
            report.num_jerk_limited += 1;
            ax = ax_limited;
        }

        // ---- INTEGRATION ----

        let accel_mss = Vector2::new(ax, ay);
        let velocity_ms = last.velocity_ms + accel_mss * DELTA_T_S;
        let position_m = last.position_m + velocity_ms * DELTA_T_S;

        if position_m[0].is_nan() {
            return Err(NumericalFault::PositionX {
                last_x,
                vx: velocity_ms[0],
                ax,
            });
        }
        if position_m[1].is_nan() {
            return Err(NumericalFault::PositionY {
                last_y,
                vy: velocity_ms[1],
                ay,
            });
        }

        Ok(KinematicSample {
            position_m,
            velocity_ms,
            accel_mss,
        })
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::pose::Pose;
    use crate::track::test_tracks::straight;
    use approx::assert_abs_diff_eq;

    fn flat_splines(lateral_m: f64, speed_ms: f64) -> (CubicSpline, CubicSpline) {
        let x = [0.0, 50.0, 100.0];
        (
            CubicSpline::new(&x, &[lateral_m; 3]).unwrap(),
            CubicSpline::new(&x, &[speed_ms; 3]).unwrap(),
        )
    }

    #[test]
    fn test_cruise_at_limit() {
        let track = straight();
        let limits = KinematicLimits {
            speed_limit_ms: 20.0,
            accel_limit_mss: 10.0,
            jerk_limit_msss: 10.0,
        };
        let ctrl = PathCtrl::new(&track, &Pose::default(), limits);
        let (y_spline, speed_spline) = flat_splines(0.0, 20.0);
        let mut report = StatusReport::default();

        let last = KinematicSample {
            position_m: Vector2::zeros(),
            velocity_ms: Vector2::new(20.0, 0.0),
            accel_mss: Vector2::zeros(),
        };
        let next = ctrl
            .calc_next_sample(&last, &y_spline, &speed_spline, &mut report)
            .unwrap();

        assert_abs_diff_eq!(next.accel_mss[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(next.accel_mss[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(next.position_m[0], 20.0 * DELTA_T_S, epsilon = 1e-12);
        assert_eq!(report, StatusReport::default());
    }

    #[test]
    fn test_negative_lateral_accel_limited() {
        let track = straight();
        let limits = KinematicLimits {
            speed_limit_ms: 20.0,
            accel_limit_mss: 10.0,
            jerk_limit_msss: 10.0,
        };
        let ctrl = PathCtrl::new(&track, &Pose::default(), limits);
        let (y_spline, speed_spline) = flat_splines(-5.0, 20.0);
        let mut report = StatusReport::default();

        // Drifting left while already turning right at the lateral limit. The
        // longitudinal speed already matches what the lateral motion leaves.
        let last = KinematicSample {
            position_m: Vector2::zeros(),
            velocity_ms: Vector2::new(200f64.sqrt(), 5.0),
            accel_mss: Vector2::new(0.0, -9.0),
        };
        let next = ctrl
            .calc_next_sample(&last, &y_spline, &speed_spline, &mut report)
            .unwrap();

        assert_eq!(next.accel_mss[1], -9.0);
        assert_abs_diff_eq!(next.accel_mss[0], 0.0, epsilon = 1e-9);

        assert_eq!(report.num_lat_accel_limited, 1);
        assert_eq!(report.num_lat_jerk_limited, 0);
        assert_eq!(report.num_accel_limited, 0);
        assert_eq!(report.num_jerk_limited, 0);
    }

    #[test]
    fn test_limits_enforced() {
        let track = straight();
        let limits = KinematicLimits {
            speed_limit_ms: 20.0,
            accel_limit_mss: 10.0,
            jerk_limit_msss: 10.0,
        };
        let ctrl = PathCtrl::new(&track, &Pose::default(), limits);
        let (y_spline, speed_spline) = flat_splines(3.0, 20.0);
        let mut report = StatusReport::default();

        // Already turning and accelerating hard, well below the desired speed
        let last = KinematicSample {
            position_m: Vector2::zeros(),
            velocity_ms: Vector2::new(5.0, 0.0),
            accel_mss: Vector2::new(8.0, 8.9),
        };
        let next = ctrl
            .calc_next_sample(&last, &y_spline, &speed_spline, &mut report)
            .unwrap();

        // The lateral change is cut to 0.9 of the jerk step, the longitudinal
        // change gets what is left of 0.98 of the squared step
        assert_abs_diff_eq!(next.accel_mss[1], 8.72, epsilon = 1e-9);
        assert_abs_diff_eq!(
            next.accel_mss[0],
            8.0 - (0.98f64 * 0.04 - 0.0324).sqrt(),
            epsilon = 1e-9
        );
        assert!((next.accel_mss - last.accel_mss).norm() <= 0.198 + 1e-12);

        assert_eq!(report.num_lat_accel_limited, 0);
        assert_eq!(report.num_lat_jerk_limited, 1);
        assert_eq!(report.num_accel_limited, 1);
        assert_eq!(report.num_jerk_limited, 1);
    }
}
