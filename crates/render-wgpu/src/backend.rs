use hyperspeed_geometry::TunnelGeometry;
use hyperspeed_render::{FrameView, RenderBackend, RenderError};

use crate::gpu::TunnelRenderer;
use crate::overlay::{OverlayPass, OverlayTarget};

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: TunnelRenderer,
}

/// Rendering backend drawing into a window surface through wgpu.
pub struct WgpuBackend {
    size: (u32, u32),
    gpu: Option<Gpu>,
    overlay: Option<Box<dyn OverlayPass>>,
}

impl WgpuBackend {
    /// Create a device for `target` and configure its surface.
    ///
    /// Fails when no adapter can present to the surface or the device is
    /// refused.
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(target)
            .map_err(|e| RenderError::Context(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::AdapterUnavailable)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("hyperspeed_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::Context(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Surface("surface supports no formats".into()))?;

        let (width, height) = (width.max(1), height.max(1));
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = TunnelRenderer::new(&device, format, width, height);
        tracing::info!(
            adapter = %adapter.get_info().name,
            ?format,
            width,
            height,
            "wgpu backend ready"
        );

        Ok(Self {
            size: (width, height),
            gpu: Some(Gpu {
                surface,
                device,
                queue,
                config,
                renderer,
            }),
            overlay: None,
        })
    }

    /// Draw `overlay` after every scene frame, in the same submission.
    pub fn set_overlay(&mut self, overlay: Box<dyn OverlayPass>) {
        self.overlay = Some(overlay);
    }
}

impl RenderBackend for WgpuBackend {
    fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        gpu.config.width = width;
        gpu.config.height = height;
        gpu.surface.configure(&gpu.device, &gpu.config);
        gpu.renderer.resize(&gpu.device, width, height);
    }

    fn upload(&mut self, geometry: &TunnelGeometry) -> Result<(), RenderError> {
        let gpu = self
            .gpu
            .as_mut()
            .ok_or_else(|| RenderError::Context("backend already released".into()))?;
        gpu.renderer.upload(&gpu.device, geometry);
        Ok(())
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), RenderError> {
        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                tracing::debug!("surface reconfigured");
                return Ok(());
            }
            Err(e) => return Err(RenderError::Surface(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        gpu.renderer.render(&gpu.queue, &mut encoder, &view, frame);

        if let Some(overlay) = &mut self.overlay {
            overlay.draw(OverlayTarget {
                device: &gpu.device,
                queue: &gpu.queue,
                encoder: &mut encoder,
                view: &view,
                format: gpu.config.format,
                size: [gpu.config.width, gpu.config.height],
            });
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        self.overlay = None;
        if let Some(mut gpu) = self.gpu.take() {
            gpu.renderer.destroy();
            tracing::debug!("gpu resources released");
        }
    }
}
