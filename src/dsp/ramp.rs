//! Gradual approach and crossfade helpers.

/// Move `current` a `fraction` of the way toward `target`.
///
/// Called repeatedly this gives an exponential glide whose time constant is
/// `1 / fraction` steps. The fraction is clamped to `[0, 1]`, so the result
/// never overshoots the target.
#[inline]
pub fn approach(current: f64, target: f64, fraction: f64) -> f64 {
    current + (target - current) * fraction.clamp(0.0, 1.0)
}

/// Weighted average: `weight` 0.0 is all of `from`, 1.0 is all of `to`.
#[inline]
pub fn crossfade(from: f64, to: f64, weight: f64) -> f64 {
    from + (to - from) * weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_moves_by_fraction() {
        assert_eq!(approach(0.0, 10.0, 0.5), 5.0);
        assert_eq!(approach(10.0, 0.0, 0.25), 7.5);
    }

    #[test]
    fn test_approach_never_overshoots() {
        assert_eq!(approach(0.0, 1.0, 3.0), 1.0);
        assert_eq!(approach(1.0, -1.0, 2.0), -1.0);
        assert_eq!(approach(0.3, 0.8, -1.0), 0.3);
    }

    #[test]
    fn test_crossfade_endpoints_and_identity() {
        assert_eq!(crossfade(2.0, 6.0, 0.0), 2.0);
        assert_eq!(crossfade(2.0, 6.0, 1.0), 6.0);
        assert_eq!(crossfade(2.0, 6.0, 0.5), 4.0);
        // Blending a value with itself must be exact
        assert_eq!(crossfade(-1234.5, -1234.5, 0.37), -1234.5);
    }
}
