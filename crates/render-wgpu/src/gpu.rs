use hyperspeed_geometry::{MeshData, TunnelGeometry, Vertex};
use hyperspeed_render::FrameView;
use wgpu::util::DeviceExt;

use crate::raw::{
    Globals, InstanceRaw, SurfaceUniform, car_light_instances, side_stick_instances,
};
use crate::shaders;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn new(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(format!("{label}_vertices").as_str()),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(format!("{label}_indices").as_str()),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: mesh.indices.len() as u32,
        }
    }

    fn destroy(&self) {
        self.vertex.destroy();
        self.index.destroy();
    }
}

struct SurfaceDraw {
    mesh: MeshBuffers,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct InstancedDraw {
    mesh: MeshBuffers,
    instances: Option<wgpu::Buffer>,
    count: u32,
}

impl InstancedDraw {
    fn new(device: &wgpu::Device, label: &str, mesh: &MeshData, instances: &[InstanceRaw]) -> Self {
        // wgpu rejects zero-sized buffers.
        let buffer = (!instances.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(format!("{label}_instances").as_str()),
                contents: bytemuck::cast_slice(instances),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
        Self {
            mesh: MeshBuffers::new(device, label, mesh),
            instances: buffer,
            count: instances.len() as u32,
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(instances) = &self.instances else {
            return;
        };
        pass.set_vertex_buffer(0, self.mesh.vertex.slice(..));
        pass.set_vertex_buffer(1, instances.slice(..));
        pass.set_index_buffer(self.mesh.index.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.mesh.index_count, 0, 0..self.count);
    }

    fn destroy(&self) {
        self.mesh.destroy();
        if let Some(instances) = &self.instances {
            instances.destroy();
        }
    }
}

/// Uploaded tunnel: road surfaces plus instanced lights and sticks.
struct Uploaded {
    surfaces: Vec<SurfaceDraw>,
    car_lights: InstancedDraw,
    side_sticks: InstancedDraw,
}

/// Pipelines and GPU resources of the tunnel scene.
pub(crate) struct TunnelRenderer {
    road_pipeline: wgpu::RenderPipeline,
    instanced_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    surface_layout: wgpu::BindGroupLayout,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    uploaded: Option<Uploaded>,
}

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        2 => Float32x3,
        3 => Float32x3,
        4 => Float32x3,
        5 => Float32,
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<InstanceRaw>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &ATTRIBUTES,
    }
}

fn uniform_layout_entry(visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    source: String,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            // Flat planes and open tubes are seen from both sides.
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

impl TunnelRenderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_layout"),
            entries: &[uniform_layout_entry(
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let surface_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("surface_layout"),
            entries: &[uniform_layout_entry(
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });

        let road_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("road_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &surface_layout],
            push_constant_ranges: &[],
        });
        let instanced_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("instanced_pipeline_layout"),
            bind_group_layouts: &[&globals_layout],
            push_constant_ranges: &[],
        });

        let road_pipeline = create_pipeline(
            device,
            "road_pipeline",
            &road_layout,
            shaders::road_shader(),
            &[vertex_layout()],
            format,
        );
        let instanced_pipeline = create_pipeline(
            device,
            "instanced_pipeline",
            &instanced_layout,
            shaders::instanced_shader(),
            &[vertex_layout(), instance_layout()],
            format,
        );

        let (depth_texture, depth_view) = create_depth_texture(device, width, height);

        Self {
            road_pipeline,
            instanced_pipeline,
            globals_buffer,
            globals_bind_group,
            surface_layout,
            depth_texture,
            depth_view,
            uploaded: None,
        }
    }

    /// Upload meshes and instances. Replaces anything uploaded before.
    pub fn upload(&mut self, device: &wgpu::Device, geometry: &TunnelGeometry) {
        if let Some(old) = self.uploaded.take() {
            destroy_uploaded(&old);
        }

        let surfaces = geometry
            .road
            .iter()
            .map(|surface| {
                let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("surface_uniform"),
                    contents: bytemuck::bytes_of(&SurfaceUniform::from_surface(surface)),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("surface_bind_group"),
                    layout: &self.surface_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform.as_entire_binding(),
                    }],
                });
                SurfaceDraw {
                    mesh: MeshBuffers::new(device, "surface", &surface.mesh),
                    uniform,
                    bind_group,
                }
            })
            .collect();

        let mut lights = car_light_instances(&geometry.moving_away);
        lights.extend(car_light_instances(&geometry.moving_closer));
        let car_lights = InstancedDraw::new(device, "car_lights", &geometry.light_mesh, &lights);
        let side_sticks = InstancedDraw::new(
            device,
            "side_sticks",
            &geometry.stick_mesh,
            &side_stick_instances(&geometry.side_sticks),
        );

        tracing::debug!(
            car_lights = car_lights.count,
            side_sticks = side_sticks.count,
            "tunnel geometry uploaded"
        );
        self.uploaded = Some(Uploaded {
            surfaces,
            car_lights,
            side_sticks,
        });
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture.destroy();
        let (texture, view) = create_depth_texture(device, width, height);
        self.depth_texture = texture;
        self.depth_view = view;
    }

    /// Record the scene into `encoder`: clear, road, then instanced streaks.
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        frame: &FrameView<'_>,
    ) {
        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals::from_frame(frame)),
        );

        let [r, g, b] = frame.clear_color.to_array();
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tunnel_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        let Some(uploaded) = &self.uploaded else {
            return;
        };

        pass.set_pipeline(&self.road_pipeline);
        pass.set_bind_group(0, &self.globals_bind_group, &[]);
        for surface in &uploaded.surfaces {
            pass.set_bind_group(1, &surface.bind_group, &[]);
            pass.set_vertex_buffer(0, surface.mesh.vertex.slice(..));
            pass.set_index_buffer(surface.mesh.index.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..surface.mesh.index_count, 0, 0..1);
        }

        pass.set_pipeline(&self.instanced_pipeline);
        pass.set_bind_group(0, &self.globals_bind_group, &[]);
        uploaded.car_lights.draw(&mut pass);
        uploaded.side_sticks.draw(&mut pass);
    }

    /// Destroy every buffer and texture this renderer created.
    pub fn destroy(&mut self) {
        if let Some(uploaded) = self.uploaded.take() {
            destroy_uploaded(&uploaded);
        }
        self.globals_buffer.destroy();
        self.depth_texture.destroy();
    }
}

fn destroy_uploaded(uploaded: &Uploaded) {
    for surface in &uploaded.surfaces {
        surface.mesh.destroy();
        surface.uniform.destroy();
    }
    uploaded.car_lights.destroy();
    uploaded.side_sticks.destroy();
}

fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&Default::default());
    (texture, view)
}
