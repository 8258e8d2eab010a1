//! Light tunnel: lifecycle and per-frame animation loop.
//!
//! # Invariants
//! - The loop is the only writer of its animation state.
//! - Every iteration checks the disposed flag before touching the scene.
//! - Scheduling, clock and randomness are injected; nothing reads globals.

mod error;
mod host;
mod tunnel;

pub use error::TunnelError;
pub use host::{FrameRequest, Host, ManualHost};
pub use tunnel::{Phase, Tunnel};

pub fn crate_info() -> &'static str {
    "hyperspeed-tunnel v0.1.0"
}
