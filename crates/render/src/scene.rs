use hyperspeed_common::Rgb;
use hyperspeed_config::TunnelConfig;
use hyperspeed_geometry::TunnelGeometry;

use crate::backend::{FrameView, RenderBackend, RenderError};
use crate::camera::PerspectiveCamera;
use crate::light::Lights;

/// Owns the camera, lights, generated geometry and the rendering backend.
///
/// Exactly one assembly is live per mounted surface. `dispose` releases the
/// backend once; every later call is a no-op.
pub struct SceneAssembly<B: RenderBackend> {
    backend: B,
    camera: PerspectiveCamera,
    lights: Lights,
    geometry: Option<TunnelGeometry>,
    clear_color: Rgb,
    tunnel_length: f32,
    disposed: bool,
}

impl<B: RenderBackend> SceneAssembly<B> {
    pub fn new(backend: B, config: &TunnelConfig) -> Self {
        let (width, height) = backend.surface_size();
        let mut camera = PerspectiveCamera::from_config(&config.camera, config.fov, 1.0);
        camera.set_viewport(width, height);
        camera.update_projection_matrix();
        Self {
            backend,
            camera,
            lights: Lights::default(),
            geometry: None,
            clear_color: Rgb::from_hex(config.colors.background),
            tunnel_length: config.length,
            disposed: false,
        }
    }

    /// Upload generated geometry and keep it for the lifetime of the scene.
    pub fn populate(&mut self, geometry: TunnelGeometry) -> Result<(), RenderError> {
        if self.disposed {
            return Ok(());
        }
        self.backend.upload(&geometry)?;
        self.geometry = Some(geometry);
        Ok(())
    }

    /// Match the projection aspect and drawable size to `width` x `height`.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.disposed {
            return;
        }
        let (width, height) = (width.max(1), height.max(1));
        self.backend.resize(width, height);
        self.camera.set_viewport(width, height);
        self.camera.update_projection_matrix();
        tracing::debug!(width, height, "scene resized");
    }

    /// Draw the current scene from the camera. Backend failures are logged.
    pub fn render(&mut self) {
        if self.disposed {
            return;
        }
        let frame = FrameView {
            view_projection: self.camera.view_projection(),
            camera_position: self.camera.position,
            lights: &self.lights,
            clear_color: self.clear_color,
            tunnel_length: self.tunnel_length,
        };
        if let Err(e) = self.backend.render(&frame) {
            tracing::warn!("frame skipped: {e}");
        }
    }

    /// Release GPU resources and drop generated geometry.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.backend.release();
        self.geometry = None;
        tracing::info!("scene disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Drawable size, or `None` once disposed.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        (!self.disposed).then(|| self.backend.surface_size())
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    pub fn lights(&self) -> &Lights {
        &self.lights
    }

    pub fn geometry(&self) -> Option<&TunnelGeometry> {
        self.geometry.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeadlessBackend;
    use hyperspeed_common::SeededRandom;

    fn scene() -> SceneAssembly<HeadlessBackend> {
        SceneAssembly::new(HeadlessBackend::new(1280, 720), &TunnelConfig::default())
    }

    #[test]
    fn camera_matches_surface() {
        let scene = scene();
        assert!((scene.camera().aspect() - 1280.0 / 720.0).abs() < 1e-6);
        assert_eq!(scene.camera().fov(), 90.0);
    }

    #[test]
    fn populate_uploads_once() {
        let config = TunnelConfig::default();
        let mut scene = scene();
        let geometry = TunnelGeometry::generate(&config, &mut SeededRandom::new(3));
        scene.populate(geometry).unwrap();
        assert_eq!(scene.backend().uploads(), 1);
        assert_eq!(scene.backend().instance_count(), 180);
        assert!(scene.geometry().is_some());
    }

    #[test]
    fn resize_is_idempotent() {
        let mut scene = scene();
        scene.resize(800, 600);
        let projection = scene.camera().projection_matrix();
        scene.resize(800, 600);
        assert_eq!(scene.camera().projection_matrix(), projection);
        assert_eq!(scene.surface_size(), Some((800, 600)));
    }

    #[test]
    fn render_reaches_backend() {
        let mut scene = scene();
        scene.render();
        scene.render();
        assert_eq!(scene.backend().frames(), 2);
    }

    #[test]
    fn dispose_twice_releases_once() {
        let mut scene = scene();
        scene.dispose();
        scene.dispose();
        assert!(scene.is_disposed());
        assert_eq!(scene.backend().releases(), 1);
        assert_eq!(scene.surface_size(), None);
    }

    #[test]
    fn calls_after_dispose_are_noops() {
        let config = TunnelConfig::default();
        let mut scene = scene();
        scene.dispose();
        scene.render();
        scene.resize(1024, 768);
        scene
            .populate(TunnelGeometry::generate(&config, &mut SeededRandom::new(1)))
            .unwrap();
        let backend = scene.backend();
        assert_eq!(backend.frames(), 0);
        assert!(backend.resizes().is_empty());
        assert_eq!(backend.uploads(), 0);
        assert!(scene.geometry().is_none());
    }
}
