//! Natural cubic spline interpolant

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::CurveError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A natural cubic spline through a set of `(param, value)` samples.
///
/// On each interval `[t_i, t_{i+1})` the spline is
/// `a_i + b_i·h + c_i·h² + d_i·h³` with `h = t - t_i`. Both ends have zero
/// second derivative, and outside the sample range the spline continues as the
/// straight line tangent to the end point.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    params: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CubicSpline {
    /// Fit a spline through the given samples.
    ///
    /// The parameters must be finite and strictly increasing, and there must
    /// be at least two samples.
    pub fn new(params: &[f64], values: &[f64]) -> Result<Self, CurveError> {
        if params.len() != values.len() {
            return Err(CurveError::LengthMismatch {
                params: params.len(),
                values: values.len()
            });
        }

        let n = params.len();
        if n < 2 {
            return Err(CurveError::NotEnoughSamples(n));
        }

        for i in 0..n {
            if !params[i].is_finite() || !values[i].is_finite() {
                return Err(CurveError::NonFiniteSample(i));
            }
            if i > 0 && params[i] <= params[i - 1] {
                return Err(CurveError::NotStrictlyIncreasing {
                    index: i,
                    prev_param: params[i - 1],
                    param: params[i]
                });
            }
        }

        let a = values.to_vec();
        let mut b = vec![0.0; n];
        let mut c = vec![0.0; n];
        let mut d = vec![0.0; n];

        let h: Vec<f64> = params.windows(2).map(|w| w[1] - w[0]).collect();

        // Solve the tridiagonal system for the second order coefficients. The
        // natural boundary fixes c[0] and c[n-1] at zero.
        let mut alpha = vec![0.0; n];
        for i in 1..n - 1 {
            alpha[i] = 3.0 / h[i] * (a[i + 1] - a[i]) - 3.0 / h[i - 1] * (a[i] - a[i - 1]);
        }

        let mut l = vec![1.0; n];
        let mut mu = vec![0.0; n];
        let mut z = vec![0.0; n];

        for i in 1..n - 1 {
            l[i] = 2.0 * (params[i + 1] - params[i - 1]) - h[i - 1] * mu[i - 1];
            mu[i] = h[i] / l[i];
            z[i] = (alpha[i] - h[i - 1] * z[i - 1]) / l[i];
        }

        // Back substitution
        for j in (0..n - 1).rev() {
            c[j] = z[j] - mu[j] * c[j + 1];
            b[j] = (a[j + 1] - a[j]) / h[j] - h[j] * (c[j + 1] + 2.0 * c[j]) / 3.0;
            d[j] = (c[j + 1] - c[j]) / (3.0 * h[j]);
        }

        // Slope at the final sample, used for extrapolation past the end
        let last = n - 2;
        b[n - 1] = b[last] + 2.0 * c[last] * h[last] + 3.0 * d[last] * h[last].powi(2);

        Ok(Self {
            params: params.to_vec(),
            a,
            b,
            c,
            d
        })
    }

    /// Evaluate the spline at `t`. A NaN `t` gives NaN.
    pub fn eval(&self, t: f64) -> f64 {
        if t.is_nan() {
            return f64::NAN;
        }
        let (i, h) = self.locate(t);
        if self.is_outside(t) {
            return self.a[i] + self.b[i] * h;
        }
        self.a[i] + self.b[i] * h + self.c[i] * h.powi(2) + self.d[i] * h.powi(3)
    }

    /// Evaluate the first derivative of the spline at `t`.
    pub fn eval_deriv(&self, t: f64) -> f64 {
        if t.is_nan() {
            return f64::NAN;
        }
        let (i, h) = self.locate(t);
        if self.is_outside(t) {
            return self.b[i];
        }
        self.b[i] + 2.0 * self.c[i] * h + 3.0 * self.d[i] * h.powi(2)
    }

    /// The range of parameters covered by the samples.
    pub fn param_bounds(&self) -> (f64, f64) {
        (self.params[0], self.params[self.params.len() - 1])
    }

    /// Number of samples the spline was fitted to.
    pub fn num_samples(&self) -> usize {
        self.params.len()
    }

    /// Find the index of the sample whose segment contains `t` and the offset
    /// of `t` from that sample.
    ///
    /// Before the first sample this is the first sample, at or after the last
    /// sample this is the last sample.
    fn locate(&self, t: f64) -> (usize, f64) {
        let n = self.params.len();
        let i = if t < self.params[0] {
            0
        }
        else if t >= self.params[n - 1] {
            n - 1
        }
        else {
            // Index of the first parameter greater than t, minus one
            self.params.partition_point(|&p| p <= t) - 1
        };

        (i, t - self.params[i])
    }

    fn is_outside(&self, t: f64) -> bool {
        t < self.params[0] || t >= self.params[self.params.len() - 1]
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
    fn test_interpolates_samples() {
        let t = [0.0, 1.0, 2.5, 4.0, 7.0];
        let v = [1.0, -2.0, 0.5, 3.0, 3.5];
        let spline = CubicSpline::new(&t, &v).unwrap();

        for (ti, vi) in t.iter().zip(v.iter()) {
            assert_abs_diff_eq!(spline.eval(*ti), *vi, epsilon = 1e-12);
        }
        assert_eq!(spline.param_bounds(), (0.0, 7.0));
        assert_eq!(spline.num_samples(), 5);
    }

    #[test]
    fn test_linear_data_is_exact() {
        let t = [0.0, 100.0, 200.0, 300.0];
        let v = [0.0, 50.0, 100.0, 150.0];
        let spline = CubicSpline::new(&t, &v).unwrap();

        for x in [-40.0, 12.5, 150.0, 299.9, 340.0].iter() {
            assert_abs_diff_eq!(spline.eval(*x), 0.5 * x, epsilon = 1e-9);
            assert_abs_diff_eq!(spline.eval_deriv(*x), 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_continuous_derivative() {
        let t = [0.0, 1.0, 3.0, 4.0];
        let v = [0.0, 2.0, 1.0, 5.0];
        let spline = CubicSpline::new(&t, &v).unwrap();

        // Value and slope must match either side of each interior knot
        for knot in [1.0, 3.0].iter() {
            let eps = 1e-7;
            assert_abs_diff_eq!(spline.eval(knot - eps), spline.eval(knot + eps), epsilon = 1e-5);
            assert_abs_diff_eq!(
                spline.eval_deriv(knot - eps),
                spline.eval_deriv(knot + eps),
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn test_linear_extrapolation() {
        let t = [0.0, 1.0, 2.0, 3.0];
        let v = [0.0, 1.0, 4.0, 9.0];
        let spline = CubicSpline::new(&t, &v).unwrap();

        let end_slope = spline.eval_deriv(3.0);
        assert_abs_diff_eq!(spline.eval(5.0), 9.0 + 2.0 * end_slope, epsilon = 1e-9);

        let start_slope = spline.eval_deriv(0.0);
        assert_abs_diff_eq!(spline.eval(-1.0), -start_slope, epsilon = 1e-9);
    }

    #[test]
    fn test_nan_parameter() {
        let spline = CubicSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();
        assert!(spline.eval(f64::NAN).is_nan());
        assert!(spline.eval_deriv(f64::NAN).is_nan());
        assert_abs_diff_eq!(spline.eval(1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_two_samples() {
        let spline = CubicSpline::new(&[1.0, 3.0], &[2.0, 6.0]).unwrap();
        assert_abs_diff_eq!(spline.eval(2.0), 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(spline.eval(0.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_invalid_samples() {
        assert_eq!(
            CubicSpline::new(&[0.0], &[1.0]).unwrap_err(),
            CurveError::NotEnoughSamples(1)
        );
        assert_eq!(
            CubicSpline::new(&[0.0, 1.0], &[1.0]).unwrap_err(),
            CurveError::LengthMismatch { params: 2, values: 1 }
        );
        assert_eq!(
            CubicSpline::new(&[0.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).unwrap_err(),
            CurveError::NotStrictlyIncreasing { index: 2, prev_param: 1.0, param: 1.0 }
        );
        assert_eq!(
            CubicSpline::new(&[0.0, 2.0, 1.0], &[1.0, 2.0, 3.0]).unwrap_err(),
            CurveError::NotStrictlyIncreasing { index: 2, prev_param: 2.0, param: 1.0 }
        );
        assert_eq!(
            CubicSpline::new(&[0.0, f64::NAN], &[1.0, 2.0]).unwrap_err(),
            CurveError::NonFiniteSample(1)
        );
    }
}
