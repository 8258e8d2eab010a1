mod hud;
mod window_host;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use hyperspeed_config::TunnelConfig;
use hyperspeed_kernel::SystemClock;
use hyperspeed_render_wgpu::WgpuBackend;
use hyperspeed_tunnel::Tunnel;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::hud::{HudFrame, HudOverlay, draw_hud};
use crate::window_host::WindowHost;

#[derive(Parser)]
#[command(name = "hyperspeed-desktop", about = "Light tunnel in a desktop window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Tunnel configuration file (YAML, or JSON by extension)
    #[arg(long)]
    config: Option<PathBuf>,
}

type WindowTunnel = Tunnel<WgpuBackend, WindowHost, SystemClock>;

struct App {
    config: TunnelConfig,
    window: Option<Arc<Window>>,
    tunnel: Option<WindowTunnel>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    hud: Rc<RefCell<HudFrame>>,
    show_hud: bool,
    pointer_held: bool,
    space_held: bool,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: TunnelConfig) -> Self {
        Self {
            config,
            window: None,
            tunnel: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            hud: Rc::default(),
            show_hud: true,
            pointer_held: false,
            space_held: false,
            failure: None,
        }
    }

    fn start(&mut self, window: Arc<Window>) -> Result<WindowTunnel> {
        let size = window.inner_size();
        let mut backend = WgpuBackend::new(window.clone(), size.width, size.height)?;
        backend.set_overlay(Box::new(HudOverlay(self.hud.clone())));

        let mut tunnel = Tunnel::new(
            self.config.clone(),
            backend,
            WindowHost::new(window),
            SystemClock::new(),
        )?;
        tunnel.init()?;
        Ok(tunnel)
    }

    fn update_speed_up(&mut self) {
        let active = self.pointer_held || self.space_held;
        if let Some(tunnel) = &mut self.tunnel {
            tunnel.set_speed_up(active);
        }
    }

    fn shut_down(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(tunnel) = &mut self.tunnel {
            tunnel.dispose();
        }
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::Space => {
                self.space_held = pressed;
                self.update_speed_up();
            }
            KeyCode::F1 if pressed => {
                self.show_hud = !self.show_hud;
            }
            KeyCode::Escape if pressed => self.shut_down(event_loop),
            _ => {}
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(tunnel)) = (&self.window, &mut self.tunnel) else {
            return;
        };

        if self.show_hud {
            if let Some(egui_winit) = &mut self.egui_winit {
                let raw_input = egui_winit.take_egui_input(window);
                let instances = tunnel
                    .scene()
                    .geometry()
                    .map_or(0, |geometry| geometry.instance_count());
                let state = tunnel.state();
                let output = self.egui_ctx.run(raw_input, |ctx| {
                    draw_hud(ctx, state, instances);
                });
                egui_winit.handle_platform_output(window, output.platform_output.clone());
                self.hud.borrow_mut().submit(&self.egui_ctx, output);
            }
        } else {
            self.hud.borrow_mut().clear();
        }

        tunnel.tick();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Hyperspeed")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.failure = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        self.egui_winit = Some(egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        ));

        match self.start(window.clone()) {
            Ok(tunnel) => {
                self.tunnel = Some(tunnel);
                self.window = Some(window);
            }
            Err(e) => {
                tracing::error!("failed to start tunnel: {e:#}");
                self.failure = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            if self.show_hud && egui_winit.on_window_event(window, &event).consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => self.shut_down(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(tunnel) = &mut self.tunnel {
                    if tunnel.host().resize_subscribed() {
                        tunnel.resize(size.width, size.height);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key, state == ElementState::Pressed),
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.pointer_held = state == ElementState::Pressed;
                self.update_speed_up();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => TunnelConfig::load(path)?,
        None => TunnelConfig::default(),
    };
    tracing::info!("hyperspeed-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(e) => Err(e.context("hyperspeed-desktop stopped")),
        None => Ok(()),
    }
}
