use glam::{Mat4, Vec3};
use hyperspeed_geometry::TunnelGeometry;

use crate::backend::{FrameView, RenderBackend, RenderError};

/// Backend without a GPU.
///
/// Records what it was asked to do; used by tests and the CLI.
#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    size: (u32, u32),
    uploads: usize,
    instance_count: usize,
    surface_count: usize,
    frames: u64,
    resizes: Vec<(u32, u32)>,
    releases: usize,
    last_view_projection: Option<Mat4>,
    last_camera_position: Option<Vec3>,
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width.max(1), height.max(1)),
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> usize {
        self.uploads
    }

    pub fn instance_count(&self) -> usize {
        self.instance_count
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn resizes(&self) -> &[(u32, u32)] {
        &self.resizes
    }

    pub fn releases(&self) -> usize {
        self.releases
    }

    pub fn last_view_projection(&self) -> Option<Mat4> {
        self.last_view_projection
    }

    /// Human-readable summary of everything recorded so far.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Headless backend ({}x{}) ===\n",
            self.size.0, self.size.1
        ));
        out.push_str(&format!(
            "Uploads: {} ({} instances, {} surfaces)\n",
            self.uploads, self.instance_count, self.surface_count
        ));
        out.push_str(&format!(
            "Frames: {}  Resizes: {}  Released: {}\n",
            self.frames,
            self.resizes.len(),
            self.releases > 0
        ));
        if let Some(p) = self.last_camera_position {
            out.push_str(&format!("Camera: ({:.1}, {:.1}, {:.1})\n", p.x, p.y, p.z));
        }
        out
    }
}

impl RenderBackend for HeadlessBackend {
    fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.resizes.push((width, height));
    }

    fn upload(&mut self, geometry: &TunnelGeometry) -> Result<(), RenderError> {
        self.uploads += 1;
        self.instance_count = geometry.instance_count();
        self.surface_count = geometry.road.iter().count();
        Ok(())
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), RenderError> {
        self.frames += 1;
        self.last_view_projection = Some(frame.view_projection);
        self.last_camera_position = Some(frame.camera_position);
        Ok(())
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}
