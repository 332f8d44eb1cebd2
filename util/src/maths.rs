//! Scalar helpers shared by the executables

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Euclidean distance between two points given as slices.
///
/// `None` if the points have different dimensions.
pub fn norm<T: Float>(point_a: &[T], point_b: &[T]) -> Option<T> {
    if point_a.len() != point_b.len() {
        return None;
    }

    let sum_sq = point_a
        .iter()
        .zip(point_b)
        .fold(T::zero(), |acc, (&a, &b)| acc + (a - b).powi(2));

    Some(sum_sq.sqrt())
}

/// Limit the magnitude of `value` to `max_magnitude` while keeping its sign.
///
/// Values already within the bound are returned untouched, so a `NaN` value
/// passes straight through for the caller to detect.
pub fn clamp_preserving_sign<T: Float>(value: T, max_magnitude: T) -> T {
    if value.abs() > max_magnitude {
        max_magnitude.copysign(value)
    } else {
        value
    }
}

/// Wrap `value` into `[0, period)`.
///
/// Round-off can give exactly `period` for tiny negative inputs.
pub fn rem_euclid<T: Float>(value: T, period: T) -> T {
    let r = value % period;
    if r < T::zero() {
        r + period.abs()
    } else {
        r
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_norm() {
        assert_eq!(norm(&[1f64, 1f64], &[4f64, 5f64]), Some(5f64));
        assert_eq!(norm::<f64>(&[], &[]), Some(0f64));
        assert_eq!(norm(&[0f64, 0f64], &[3f64]), None);
    }

    #[test]
    fn test_clamp_preserving_sign() {
        assert_eq!(clamp_preserving_sign(12f64, 9f64), 9f64);
        assert_eq!(clamp_preserving_sign(-12f64, 9f64), -9f64);
        assert_eq!(clamp_preserving_sign(-3f64, 9f64), -3f64);
        assert_eq!(clamp_preserving_sign(0.5f64, 0f64), 0f64);
        assert!(clamp_preserving_sign(-0.5f64, 0f64).is_sign_negative());
        assert!(clamp_preserving_sign(f64::NAN, 9f64).is_nan());
    }

    #[test]
    fn test_rem_euclid() {
        assert_eq!(rem_euclid(1207f64, 1200f64), 7f64);
        assert_eq!(rem_euclid(-10f64, 1200f64), 1190f64);
        assert_eq!(rem_euclid(1200f64, 1200f64), 0f64);
    }
}
