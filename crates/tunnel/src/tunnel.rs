use hyperspeed_common::{RandomSource, ThreadRandom};
use hyperspeed_config::TunnelConfig;
use hyperspeed_geometry::TunnelGeometry;
use hyperspeed_kernel::{AnimationState, Clock, Distortion, SystemClock};
use hyperspeed_render::{RenderBackend, SceneAssembly};
use tracing::{info, info_span, warn};

use crate::error::TunnelError;
use crate::host::{FrameRequest, Host};

/// Lifecycle of a tunnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built but not started.
    Constructed,
    /// Frames are scheduled.
    Running,
    /// Resources released. Terminal.
    Disposed,
}

/// A mounted light tunnel and its frame loop.
///
/// The host fires frames by calling [`tick`](Self::tick) after each
/// [`Host::request_frame`]. Only the loop writes the animation state; the
/// public setters change targets.
pub struct Tunnel<B: RenderBackend, H: Host, C: Clock = SystemClock> {
    config: TunnelConfig,
    scene: SceneAssembly<B>,
    state: AnimationState,
    distortion: Distortion,
    host: H,
    clock: C,
    pending: Option<FrameRequest>,
    phase: Phase,
}

impl<B: RenderBackend, H: Host, C: Clock> Tunnel<B, H, C> {
    /// Validate `config`, build the scene around `backend` and subscribe to
    /// container resizes. Nothing is drawn until [`init`](Self::init).
    pub fn new(config: TunnelConfig, backend: B, mut host: H, clock: C) -> Result<Self, TunnelError> {
        config.validate()?;
        let scene = SceneAssembly::new(backend, &config);
        host.subscribe_resize();
        Ok(Self {
            state: AnimationState::new(config.fov),
            distortion: Distortion::from_config(&config.distortion),
            config,
            scene,
            host,
            clock,
            pending: None,
            phase: Phase::Constructed,
        })
    }

    /// Generate geometry with thread-local randomness and start the loop.
    pub fn init(&mut self) -> Result<(), TunnelError> {
        self.init_with(&mut ThreadRandom::new())
    }

    /// Generate geometry from `rng`, populate the scene and run the first
    /// frame. Calling it again is a no-op.
    pub fn init_with(&mut self, rng: &mut dyn RandomSource) -> Result<(), TunnelError> {
        match self.phase {
            Phase::Constructed => {}
            Phase::Running => {
                warn!("tunnel already initialized");
                return Ok(());
            }
            Phase::Disposed => return Ok(()),
        }

        {
            let _span = info_span!("tunnel_init").entered();
            let geometry = TunnelGeometry::generate(&self.config, rng);
            let instances = geometry.instance_count();
            if let Err(e) = self.scene.populate(geometry) {
                self.dispose();
                return Err(e.into());
            }
            self.phase = Phase::Running;
            info!(instances, "tunnel initialized");
        }

        self.tick();
        Ok(())
    }

    /// Run one frame: integrate, aim the camera, match the container, draw
    /// and schedule the next frame.
    pub fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.pending = None;

        let delta = self.clock.delta();
        let elapsed = self.clock.elapsed();
        let frame = self.state.advance(delta, elapsed);

        let look = self
            .distortion
            .sample(self.config.distortion.look_at_progress, frame.time);
        let camera = self.scene.camera_mut();
        camera.set_fov(frame.fov);
        let target = camera.position + look;
        camera.look_at(target);
        camera.update_projection_matrix();

        let (width, height) = self.host.container_size();
        let container = (width.max(1), height.max(1));
        if self.scene.surface_size() != Some(container) {
            self.scene.resize(container.0, container.1);
        }

        self.scene.render();
        self.pending = Some(self.host.request_frame());
    }

    /// Forward a container resize. Ignored once disposed.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.phase == Phase::Disposed {
            return;
        }
        self.scene.resize(width, height);
    }

    /// Switch between cruising and speed-up targets.
    pub fn set_speed_up(&mut self, active: bool) {
        if self.phase == Phase::Disposed {
            return;
        }
        let (speed, fov) = if active {
            (self.config.speed_up, self.config.fov_speed_up)
        } else {
            (0.0, self.config.fov)
        };
        self.state.set_speed_target(speed);
        self.state.set_fov_target(fov);
    }

    /// Stop the loop and release everything. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.phase == Phase::Disposed {
            return;
        }
        let _span = info_span!("tunnel_dispose").entered();
        self.phase = Phase::Disposed;
        if let Some(request) = self.pending.take() {
            self.host.cancel_frame(request);
        }
        self.scene.dispose();
        self.host.unsubscribe_resize();
        info!("tunnel disposed");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_disposed(&self) -> bool {
        self.phase == Phase::Disposed
    }

    pub fn config(&self) -> &TunnelConfig {
        &self.config
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn scene(&self) -> &SceneAssembly<B> {
        &self.scene
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Frame requested by the last tick and not yet fired.
    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ManualHost;
    use hyperspeed_common::SeededRandom;
    use hyperspeed_kernel::ManualClock;
    use hyperspeed_render::HeadlessBackend;

    type TestTunnel = Tunnel<HeadlessBackend, ManualHost, ManualClock>;

    fn tunnel() -> TestTunnel {
        Tunnel::new(
            TunnelConfig::default(),
            HeadlessBackend::new(640, 360),
            ManualHost::new(640, 360),
            ManualClock::at_fps(60.0),
        )
        .unwrap()
    }

    #[test]
    fn new_subscribes_but_does_not_draw() {
        let t = tunnel();
        assert_eq!(t.phase(), Phase::Constructed);
        assert!(t.host().resize_subscribed());
        assert_eq!(t.scene().backend().frames(), 0);
        assert!(!t.host().has_pending());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = TunnelConfig {
            length: -1.0,
            ..TunnelConfig::default()
        };
        let result = Tunnel::new(
            config,
            HeadlessBackend::new(1, 1),
            ManualHost::new(1, 1),
            ManualClock::at_fps(60.0),
        );
        assert!(matches!(result, Err(TunnelError::Config(_))));
    }

    #[test]
    fn init_runs_first_frame_and_schedules_next() {
        let mut t = tunnel();
        t.init_with(&mut SeededRandom::new(1)).unwrap();
        assert_eq!(t.phase(), Phase::Running);
        assert_eq!(t.scene().backend().uploads(), 1);
        assert_eq!(t.scene().backend().frames(), 1);
        assert!(t.host().has_pending());
        assert_eq!(t.pending_frame(), Some(FrameRequest(1)));
    }

    #[test]
    fn second_init_is_ignored() {
        let mut t = tunnel();
        t.init_with(&mut SeededRandom::new(1)).unwrap();
        t.init_with(&mut SeededRandom::new(2)).unwrap();
        assert_eq!(t.scene().backend().uploads(), 1);
        assert_eq!(t.scene().backend().frames(), 1);
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut t = tunnel();
        t.tick();
        assert_eq!(t.scene().backend().frames(), 0);
        assert_eq!(t.state().time_offset(), 0.0);
    }

    #[test]
    fn speed_up_sets_both_targets() {
        let mut t = tunnel();
        t.set_speed_up(true);
        assert_eq!(t.state().speed_target(), 2.0);
        assert_eq!(t.state().fov_target(), 150.0);
        t.set_speed_up(false);
        assert_eq!(t.state().speed_target(), 0.0);
        assert_eq!(t.state().fov_target(), 90.0);
    }

    #[test]
    fn dispose_cancels_pending_frame() {
        let mut t = tunnel();
        t.init_with(&mut SeededRandom::new(1)).unwrap();
        t.dispose();
        assert!(!t.host().has_pending());
        assert_eq!(t.host().cancelled(), 1);
        assert_eq!(t.pending_frame(), None);
    }
}
