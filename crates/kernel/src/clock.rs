use std::time::Instant;

/// Source of frame deltas and total elapsed time, in seconds.
///
/// Elapsed time is `f64` so the animation keeps moving on long sessions;
/// single-frame deltas fit comfortably in `f32`.
pub trait Clock {
    /// Seconds since the previous call. The first call returns 0.
    fn delta(&mut self) -> f32;

    /// Seconds since the first `delta` call, as of the latest one.
    fn elapsed(&self) -> f64;
}

/// Monotonic wall clock. Starts on the first `delta` call.
#[derive(Debug, Default)]
pub struct SystemClock {
    start: Option<Instant>,
    last: Option<Instant>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let delta = match self.last {
            Some(last) => (now - last).as_secs_f32(),
            None => 0.0,
        };
        self.start.get_or_insert(now);
        self.last = Some(now);
        delta
    }

    fn elapsed(&self) -> f64 {
        match (self.start, self.last) {
            (Some(start), Some(last)) => (last - start).as_secs_f64(),
            _ => 0.0,
        }
    }
}

/// Clock that advances by a fixed step per call, for deterministic stepping.
#[derive(Debug, Clone)]
pub struct ManualClock {
    step: f32,
    elapsed: f64,
}

impl ManualClock {
    pub fn new(step: f32) -> Self {
        Self { step, elapsed: 0.0 }
    }

    /// A clock stepping at `fps` frames per second.
    pub fn at_fps(fps: f32) -> Self {
        Self::new(1.0 / fps)
    }

    pub fn set_step(&mut self, step: f32) {
        self.step = step;
    }
}

impl Clock for ManualClock {
    fn delta(&mut self) -> f32 {
        self.elapsed += f64::from(self.step);
        self.step
    }

    fn elapsed(&self) -> f64 {
        self.elapsed
    }
}
