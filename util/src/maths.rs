//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Wrap an angle into the range [-pi, pi].
///
/// Non-finite angles are returned unchanged so that callers can still detect
/// them.
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float
{
    if !angle.is_finite() {
        return angle;
    }

    let pi_t = T::from(std::f64::consts::PI).unwrap();
    let tau_t = T::from(std::f64::consts::TAU).unwrap();

    let wrapped = rem_euclid(angle + pi_t, tau_t) - pi_t;

    // Keep +pi as +pi rather than folding it to -pi
    if wrapped == -pi_t && angle > T::zero() {
        pi_t
    }
    else {
        wrapped
    }
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()` if `self` is much smaller than `rhs.abs()` in
/// magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}
