use std::cell::RefCell;
use std::rc::Rc;

use hyperspeed_kernel::AnimationState;
use hyperspeed_render_wgpu::{OverlayPass, OverlayTarget};

/// Tessellated HUD waiting to be painted by the next frame.
#[derive(Default)]
pub struct HudFrame {
    renderer: Option<egui_wgpu::Renderer>,
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures: egui::TexturesDelta,
    pixels_per_point: f32,
}

impl HudFrame {
    /// Queue the output of one egui pass.
    pub fn submit(&mut self, ctx: &egui::Context, output: egui::FullOutput) {
        self.paint_jobs = ctx.tessellate(output.shapes, output.pixels_per_point);
        self.pixels_per_point = output.pixels_per_point;
        self.textures.append(output.textures_delta);
    }

    pub fn clear(&mut self) {
        self.paint_jobs.clear();
    }
}

/// Paints the shared [`HudFrame`] over the tunnel.
pub struct HudOverlay(pub Rc<RefCell<HudFrame>>);

impl OverlayPass for HudOverlay {
    fn draw(&mut self, target: OverlayTarget<'_>) {
        let mut frame = self.0.borrow_mut();
        let HudFrame {
            renderer,
            paint_jobs,
            textures,
            pixels_per_point,
        } = &mut *frame;
        let renderer = renderer.get_or_insert_with(|| {
            egui_wgpu::Renderer::new(target.device, target.format, None, 1, false)
        });

        for (id, image_delta) in &textures.set {
            renderer.update_texture(target.device, target.queue, *id, image_delta);
        }
        textures.set.clear();

        if !paint_jobs.is_empty() {
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: target.size,
                pixels_per_point: *pixels_per_point,
            };
            renderer.update_buffers(
                target.device,
                target.queue,
                target.encoder,
                paint_jobs,
                &screen_descriptor,
            );
            let mut pass = target
                .encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("hud_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            renderer.render(&mut pass, paint_jobs, &screen_descriptor);
        }

        for id in textures.free.drain(..) {
            renderer.free_texture(&id);
        }
    }
}

/// Speed, field of view and virtual time of the running tunnel.
pub fn draw_hud(ctx: &egui::Context, state: &AnimationState, instances: usize) {
    egui::Window::new("Hyperspeed")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("Speed: {:.3} / {:.1}", state.speed(), state.speed_target()));
            ui.label(format!("FOV: {:.2} / {:.0}", state.fov(), state.fov_target()));
            ui.label(format!("Time offset: {:.2}s", state.time_offset()));
            ui.label(format!("Instances: {instances}"));
            ui.separator();
            ui.small("Hold LMB or Space: speed up | F1: HUD | Esc: quit");
        });
}
