use glam::{Mat4, Vec3};
use hyperspeed_common::Rgb;
use hyperspeed_geometry::TunnelGeometry;

use crate::light::Lights;

/// Errors a rendering backend can report.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no compatible GPU adapter available")]
    AdapterUnavailable,
    #[error("failed to create rendering context: {0}")]
    Context(String),
    #[error("surface error: {0}")]
    Surface(String),
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub view_projection: Mat4,
    pub camera_position: Vec3,
    pub lights: &'a Lights,
    pub clear_color: Rgb,
    /// Tunnel length, for distance-based fading.
    pub tunnel_length: f32,
}

/// Contract of a rendering backend.
///
/// A backend owns the drawable surface and every GPU-side resource. The scene
/// assembly guarantees `render`, `resize` and `upload` are never called after
/// `release`.
pub trait RenderBackend {
    /// Current drawable size in device pixels.
    fn surface_size(&self) -> (u32, u32);

    /// Resize the drawable. Sizes are at least one pixel.
    fn resize(&mut self, width: u32, height: u32);

    /// Upload static meshes and instance buffers.
    fn upload(&mut self, geometry: &TunnelGeometry) -> Result<(), RenderError>;

    /// Draw one frame.
    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), RenderError>;

    /// Free every GPU-side resource.
    fn release(&mut self);
}
