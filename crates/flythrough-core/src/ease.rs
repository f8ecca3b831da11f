//! Easing applied to path progress.

/// Cubic smoothstep: `t²(3 − 2t)`.
///
/// Maps `[0, 1]` onto itself with zero slope at both ends, so a camera
/// moving along eased progress accelerates out of the start pose and
/// decelerates into the end pose. Inputs outside `[0, 1]` are clamped.
#[must_use]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn endpoints_are_stable() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(0.5), 0.5);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(smoothstep(-2.0), 0.0);
        assert_eq!(smoothstep(3.0), 1.0);
    }

    #[test]
    fn slope_vanishes_at_endpoints() {
        let h = 1e-3;
        assert!(smoothstep(h) / h < 1e-2);
        assert!((1.0 - smoothstep(1.0 - h)) / h < 1e-2);
    }

    proptest! {
        #[test]
        fn monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(smoothstep(lo) <= smoothstep(hi) + 1e-6);
        }

        #[test]
        fn symmetric_about_midpoint(t in 0.0f32..=1.0) {
            prop_assert!((smoothstep(t) + smoothstep(1.0 - t) - 1.0).abs() < 2e-6);
        }
    }
}
