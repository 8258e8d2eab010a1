//! Shared types for the hyperspeed tunnel.
//!
//! # Invariants
//! - Every random draw goes through a [`RandomSource`]; nothing reads a global RNG.
//! - [`Sample`] bounds are the single description of a sampled parameter.

mod random;
mod sample;
mod types;

pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use sample::Sample;
pub use types::{Rgb, Transform};

pub fn crate_info() -> &'static str {
    "hyperspeed-common v0.1.0"
}
