use crate::smoothing::{DEFAULT_SNAP_LIMIT, lerp_step, smoothing_factor};

/// Snap limit for speed: small enough that the tail is invisible.
pub const SPEED_SNAP_LIMIT: f32 = 1e-5;
/// Field of view eases at this multiple of the base smoothing.
pub const FOV_RATE: f32 = 6.0;

/// Mutable per-frame animation state.
///
/// Owned by exactly one frame loop and mutated only through [`advance`].
/// Targets are set from outside; the current values chase them.
///
/// [`advance`]: AnimationState::advance
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    speed: f32,
    speed_target: f32,
    fov: f32,
    fov_target: f32,
    /// Virtual time contributed by speed-up. Never decreases.
    time_offset: f64,
}

/// Result of one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameAdvance {
    /// Virtual time: wall-clock elapsed plus accumulated offset.
    pub time: f64,
    pub fov: f32,
}

impl AnimationState {
    /// State at rest with the camera at `fov` degrees.
    pub fn new(fov: f32) -> Self {
        Self {
            speed: 0.0,
            speed_target: 0.0,
            fov,
            fov_target: fov,
            time_offset: 0.0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn speed_target(&self) -> f32 {
        self.speed_target
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn fov_target(&self) -> f32 {
        self.fov_target
    }

    pub fn time_offset(&self) -> f64 {
        self.time_offset
    }

    /// Set the speed to chase. Negative targets are clamped to zero so the
    /// time offset keeps moving forward.
    pub fn set_speed_target(&mut self, target: f32) {
        self.speed_target = if target.is_finite() { target.max(0.0) } else { 0.0 };
    }

    pub fn set_fov_target(&mut self, target: f32) {
        if target.is_finite() {
            self.fov_target = target;
        }
    }

    /// Integrate one frame of `delta` seconds at wall-clock time `elapsed`.
    ///
    /// A zero, negative or non-finite delta leaves the state untouched.
    pub fn advance(&mut self, delta: f32, elapsed: f64) -> FrameAdvance {
        if !(delta.is_finite() && delta > 0.0) {
            return FrameAdvance {
                time: elapsed + self.time_offset,
                fov: self.fov,
            };
        }

        let k = smoothing_factor(delta);
        self.speed += lerp_step(self.speed, self.speed_target, k, SPEED_SNAP_LIMIT);
        self.time_offset += f64::from(self.speed) * f64::from(delta);
        let time = elapsed + self.time_offset;

        let fov_change = lerp_step(self.fov, self.fov_target, k, DEFAULT_SNAP_LIMIT);
        self.fov += fov_change * delta * FOV_RATE;

        tracing::trace!(
            speed = self.speed,
            fov = self.fov,
            time_offset = self.time_offset,
            "animation advanced"
        );

        FrameAdvance {
            time,
            fov: self.fov,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn speed_reaches_target_in_five_seconds() {
        let mut s = AnimationState::new(90.0);
        s.set_speed_target(10.0);
        for i in 0..300 {
            s.advance(DT, f64::from(i as f32 * DT));
        }
        assert!((s.speed() - 10.0).abs() < 1e-3, "speed = {}", s.speed());
    }

    #[test]
    fn speed_snaps_exactly() {
        let mut s = AnimationState::new(90.0);
        s.set_speed_target(2.0);
        let mut frames = 0;
        while s.speed() != 2.0 {
            s.advance(DT, 0.0);
            assert!(s.speed() <= 2.0);
            frames += 1;
            assert!(frames < 60);
        }
        s.advance(DT, 0.0);
        assert_eq!(s.speed(), 2.0);
    }

    #[test]
    fn zero_delta_changes_nothing() {
        let mut s = AnimationState::new(90.0);
        s.set_speed_target(5.0);
        s.set_fov_target(150.0);
        let before = s.clone();
        let frame = s.advance(0.0, 4.0);
        assert_eq!(s, before);
        assert_eq!(frame.time, 4.0);
    }

    #[test]
    fn time_offset_never_decreases() {
        let mut s = AnimationState::new(90.0);
        s.set_speed_target(-3.0);
        assert_eq!(s.speed_target(), 0.0);
        s.set_speed_target(2.0);
        let mut last = 0.0;
        for i in 0..120 {
            if i == 60 {
                s.set_speed_target(0.0);
            }
            s.advance(DT, 0.0);
            assert!(s.time_offset() >= last);
            last = s.time_offset();
        }
        assert!(last > 0.0);
    }

    #[test]
    fn virtual_time_includes_offset() {
        let mut s = AnimationState::new(90.0);
        s.set_speed_target(1.0);
        let frame = s.advance(DT, 10.0);
        assert_eq!(frame.time, 10.0 + s.time_offset());
    }

    #[test]
    fn fov_moves_toward_target() {
        let mut s = AnimationState::new(90.0);
        s.set_fov_target(150.0);
        let frame = s.advance(DT, 0.0);
        assert!(frame.fov > 90.0 && frame.fov < 150.0);
        // 60 degrees * 0.9 * (6 / 60)
        assert!((frame.fov - 95.4).abs() < 1e-3, "fov = {}", frame.fov);

        let mut prev = frame.fov;
        for _ in 0..600 {
            let f = s.advance(DT, 0.0).fov;
            assert!(f >= prev && f <= 150.0);
            prev = f;
        }
        assert!(150.0 - prev < 0.01);
    }

    #[test]
    fn fov_at_target_is_stable() {
        let mut s = AnimationState::new(90.0);
        let frame = s.advance(DT, 0.0);
        assert_eq!(frame.fov, 90.0);
        assert_eq!(s.fov(), 90.0);
    }

    #[test]
    fn time_offset_grows_over_a_week() {
        let mut s = AnimationState::new(90.0);
        s.set_speed_target(2.0);
        let frames = 7 * 24 * 3600 * 60;
        let mut last = 0.0;
        for i in 0..frames {
            s.advance(DT, 0.0);
            if i % 1_000_000 == 999_999 {
                assert!(s.time_offset() > last);
                last = s.time_offset();
            }
        }
        let expected = 2.0 * 7.0 * 24.0 * 3600.0;
        assert!(
            (s.time_offset() - expected).abs() < 10.0,
            "time_offset = {}",
            s.time_offset()
        );
    }
}
