use glam::{Mat4, Vec3};
use hyperspeed_config::CameraConfig;

/// Perspective camera with a mutable field of view and look-at target.
///
/// The projection matrix is cached; call [`update_projection_matrix`] after
/// changing fov, aspect or clip planes.
///
/// [`update_projection_matrix`]: PerspectiveCamera::update_projection_matrix
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub up: Vec3,
    target: Vec3,
    /// Vertical field of view in degrees.
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    projection: Mat4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 90.0, 16.0 / 9.0)
    }
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            up: Vec3::Y,
            target: Vec3::NEG_Z,
            fov,
            aspect,
            near,
            far,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn from_config(config: &CameraConfig, fov: f32, aspect: f32) -> Self {
        let mut camera = Self::new(fov, aspect, config.near, config.far);
        camera.position = Vec3::from_array(config.position);
        camera.target = camera.position + Vec3::NEG_Z;
        camera
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
    }

    /// Aspect from a viewport size; a zero height is treated as one pixel.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Orient the camera toward `target`. A target at the camera position is ignored.
    pub fn look_at(&mut self, target: Vec3) {
        if (target - self.position).length_squared() > f32::EPSILON {
            self.target = target;
        }
    }

    pub fn forward(&self) -> Vec3 {
        let dir = (self.target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO { Vec3::NEG_Z } else { dir }
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov.clamp(1.0, 179.0).to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }
}
