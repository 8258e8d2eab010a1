//! Animation kernel: the numeric core driven once per frame.
//!
//! # Invariants
//! - Distortion sampling is pure: same `(progress, time)` gives the same vector.
//! - Smoothing is frame-rate independent; a zero delta changes nothing.
//! - `time_offset` never decreases.

pub mod animation;
pub mod clock;
pub mod distortion;
pub mod smoothing;

pub use animation::{AnimationState, FrameAdvance};
pub use clock::{Clock, ManualClock, SystemClock};
pub use distortion::{Distortion, distort};
pub use smoothing::{lerp_step, smoothing_factor};
