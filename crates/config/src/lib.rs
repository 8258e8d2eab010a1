//! Tunnel configuration: every tunable of the light tunnel in one typed struct.
//!
//! # Invariants
//! - A [`TunnelConfig`] is immutable once handed to a tunnel.
//! - Overrides are field-by-field; a supplied palette replaces the default wholesale.

mod config;
mod error;

pub use config::{CameraConfig, DistortionConfig, Palette, TunnelConfig};
pub use error::ConfigError;

pub fn crate_info() -> &'static str {
    "hyperspeed-config v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("config"));
    }
}
