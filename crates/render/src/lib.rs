//! Scene assembly: renderer-agnostic camera, lights and backend contract.
//!
//! # Invariants
//! - One [`SceneAssembly`] owns one backend; disposal releases it exactly once.
//! - After disposal every entry point is a silent no-op.
//! - Backends read scene content; they never mutate it.

mod backend;
mod camera;
mod headless;
mod light;
mod scene;

pub use backend::{FrameView, RenderBackend, RenderError};
pub use camera::PerspectiveCamera;
pub use headless::HeadlessBackend;
pub use light::{AmbientLight, Lights, PointLight};
pub use scene::SceneAssembly;

pub fn crate_info() -> &'static str {
    "hyperspeed-render v0.1.0"
}
