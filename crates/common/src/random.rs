use rand::rngs::ThreadRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform random draws for procedural generation.
///
/// Generators take `&mut dyn RandomSource` so tests can pin the sequence.
pub trait RandomSource {
    /// A value between the bounds that may equal `min` but never `max`, or
    /// exactly `min` when the bounds coincide.
    ///
    /// With descending bounds this is `(max, min]`, matching
    /// `min + u * (max - min)` for `u` in `[0, 1)`.
    fn uniform(&mut self, min: f32, max: f32) -> f32;

    /// Pick an index in `[0, len)`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        let i = self.uniform(0.0, len as f32) as usize;
        i.min(len.saturating_sub(1))
    }
}

fn uniform_with<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min == max || !(min.is_finite() && max.is_finite()) {
        return min;
    }
    let u: f32 = rng.random();
    let v = min + u * (max - min);
    // Rounding can land on or past `max` when the span is a few ulps wide.
    let overshoot = if min < max { v >= max } else { v <= max };
    if overshoot { step_toward(max, min) } else { v }
}

/// The neighbouring float of `from` in the direction of `to`.
fn step_toward(from: f32, to: f32) -> f32 {
    if from == to {
        return from;
    }
    if from == 0.0 {
        let tiny = f32::from_bits(1);
        return if to > 0.0 { tiny } else { -tiny };
    }
    let bits = from.to_bits();
    let away_from_zero = (to > from) == (from > 0.0);
    f32::from_bits(if away_from_zero { bits + 1 } else { bits - 1 })
}

/// Unseeded source backed by the thread-local generator.
pub struct ThreadRandom(ThreadRng);

impl ThreadRandom {
    pub fn new() -> Self {
        Self(rand::rng())
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        uniform_with(&mut self.0, min, max)
    }
}

/// Reproducible source (ChaCha8) for tests and offline generation.
#[derive(Debug, Clone)]
pub struct SeededRandom(ChaCha8Rng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        uniform_with(&mut self.0, min, max)
    }
}
