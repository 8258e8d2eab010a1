//! Exponential smoothing toward externally set targets.

/// Per-frame fraction of the remaining gap closed at a steady 60 Hz.
pub const NOMINAL_FRAME_FACTOR: f32 = 0.9;
/// Nominal frame rate the smoothing constant is tuned for.
pub const NOMINAL_FPS: f32 = 60.0;
/// Snap limit used when no explicit limit is given.
pub const DEFAULT_SNAP_LIMIT: f32 = 0.001;

/// Smoothing factor `k = exp(60 * ln(0.9) * delta)` for a frame of `delta` seconds.
pub fn smoothing_factor(delta: f32) -> f32 {
    (NOMINAL_FPS * NOMINAL_FRAME_FACTOR.ln() * delta).exp()
}

/// Change to apply to `current` to move it toward `target`.
///
/// Returns `(target - current) * factor`, or the whole remaining gap when that
/// step would be smaller than `limit`, so the value lands on the target
/// instead of creeping toward it forever.
pub fn lerp_step(current: f32, target: f32, factor: f32, limit: f32) -> f32 {
    let change = (target - current) * factor;
    if change.abs() < limit {
        target - current
    } else {
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_frame_factor() {
        let k = smoothing_factor(1.0 / 60.0);
        assert!((k - 0.9).abs() < 1e-5, "k = {k}");
    }

    #[test]
    fn zero_delta_factor_is_finite() {
        assert_eq!(smoothing_factor(0.0), 1.0);
    }

    #[test]
    fn snaps_inside_limit() {
        let current = 9.999_999;
        let step = lerp_step(current, 10.0, 0.9, 1e-5);
        assert_eq!(current + step, 10.0);
    }

    #[test]
    fn proportional_outside_limit() {
        assert_eq!(lerp_step(0.0, 10.0, 0.5, 1e-5), 5.0);
        assert_eq!(lerp_step(10.0, 0.0, 0.5, 1e-5), -5.0);
    }

    #[test]
    fn converges_without_overshoot() {
        let k = smoothing_factor(1.0 / 60.0);
        let mut v = 0.0_f32;
        let mut steps = 0;
        while v != 3.0 {
            v += lerp_step(v, 3.0, k, 1e-5);
            assert!(v <= 3.0, "overshot to {v}");
            steps += 1;
            assert!(steps < 100, "did not converge");
        }
    }
}
