//! wgpu render backend for the light tunnel.
//!
//! Draws the three road surfaces with simple point lighting, then every car
//! light and side stick as instances of two shared base meshes.
//!
//! # Invariants
//! - Instance data is uploaded once; frames only rewrite the globals uniform.
//! - After `release` no GPU object is alive and every call is a no-op.

mod backend;
mod gpu;
mod overlay;
mod raw;
mod shaders;

pub use backend::WgpuBackend;
pub use overlay::{OverlayPass, OverlayTarget};
pub use raw::{Globals, InstanceRaw, SurfaceUniform, car_light_instances, side_stick_instances};
