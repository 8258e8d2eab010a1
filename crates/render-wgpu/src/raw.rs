use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use hyperspeed_geometry::{CarLights, RoadSurface, SideSticks};
use hyperspeed_render::FrameView;

/// Globals uniform, rewritten every frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub ambient: [f32; 4],
    pub light_position: [[f32; 4]; 2],
    pub light_color: [[f32; 4]; 2],
    pub params: [f32; 4],
}

impl Globals {
    pub fn from_frame(frame: &FrameView<'_>) -> Self {
        let ambient = frame.lights.ambient;
        let [a, b] = frame.lights.points;
        Self {
            view_proj: frame.view_projection.to_cols_array_2d(),
            camera_pos: frame.camera_position.extend(1.0).to_array(),
            ambient: ambient.color.scaled4(ambient.intensity, 1.0),
            light_position: [
                a.position.extend(a.distance).to_array(),
                b.position.extend(b.distance).to_array(),
            ],
            light_color: [
                a.color.scaled4(a.intensity, 1.0),
                b.color.scaled4(b.intensity, 1.0),
            ],
            params: [frame.tunnel_length, 0.0, 0.0, 0.0],
        }
    }
}

/// Per-surface uniform of the road pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SurfaceUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub emissive: [f32; 4],
}

impl SurfaceUniform {
    pub fn from_surface(surface: &RoadSurface) -> Self {
        Self {
            model: surface.transform.to_matrix().to_cols_array_2d(),
            color: surface.material.color.scaled4(1.0, 1.0),
            emissive: surface.material.emissive.scaled4(1.0, 1.0),
        }
    }
}

/// One instanced draw: base mesh scaled, then moved to `offset`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub offset: [f32; 3],
    pub scale: [f32; 3],
    pub color: [f32; 3],
    /// Fraction of the tunnel over which the instance fades. Zero disables.
    pub fade: f32,
}

/// Car lights of one road way, with the road way translation folded in.
///
/// The unit tube is stretched to `(radius, radius, length)`.
pub fn car_light_instances(lights: &CarLights) -> Vec<InstanceRaw> {
    lights
        .instances
        .iter()
        .map(|inst| {
            let [radius, length, _speed] = inst.metrics.to_array();
            InstanceRaw {
                offset: (inst.offset + lights.translation).to_array(),
                scale: [radius, radius, length],
                color: inst.color.to_array(),
                fade: lights.fade,
            }
        })
        .collect()
}

/// Side sticks as unit boxes of `(width, height, width)`.
pub fn side_stick_instances(sticks: &SideSticks) -> Vec<InstanceRaw> {
    sticks
        .instances
        .iter()
        .map(|inst| {
            let (width, height) = (inst.metrics.x, inst.metrics.y);
            InstanceRaw {
                offset: (inst.offset + sticks.translation).to_array(),
                scale: Vec3::new(width, height, width).to_array(),
                color: inst.color.to_array(),
                fade: 0.0,
            }
        })
        .collect()
}
