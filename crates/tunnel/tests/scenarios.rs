use hyperspeed_common::{Sample, SeededRandom};
use hyperspeed_config::TunnelConfig;
use hyperspeed_geometry::TunnelGeometry;
use hyperspeed_kernel::{ManualClock, distort};
use hyperspeed_render::{FrameView, HeadlessBackend, RenderBackend, RenderError};
use hyperspeed_tunnel::{Host, ManualHost, Phase, Tunnel, TunnelError};

type Headless = Tunnel<HeadlessBackend, ManualHost, ManualClock>;

fn started(config: TunnelConfig, seed: u64) -> Headless {
    let mut tunnel = Tunnel::new(
        config,
        HeadlessBackend::new(1280, 720),
        ManualHost::new(1280, 720),
        ManualClock::at_fps(60.0),
    )
    .unwrap();
    tunnel.init_with(&mut SeededRandom::new(seed)).unwrap();
    tunnel
}

/// Fire pending frames until `frames` have run or none is scheduled.
fn run<B: RenderBackend>(tunnel: &mut Tunnel<B, ManualHost, ManualClock>, frames: usize) {
    for _ in 0..frames {
        if tunnel.host_mut().take_pending().is_none() {
            break;
        }
        tunnel.tick();
    }
}

#[test]
fn degenerate_radius_range_yields_exact_radius() {
    let config = TunnelConfig {
        lanes_per_road: 4,
        light_pairs_per_road_way: 1,
        car_lights_radius: Sample::range(0.05, 0.05),
        ..TunnelConfig::default()
    };
    let tunnel = started(config, 3);
    let geometry = tunnel.scene().geometry().unwrap();
    let metrics = geometry.moving_away.instances.metrics();
    assert_eq!(metrics.len(), 2);
    assert!(metrics.iter().all(|m| m[0] == 0.05));
}

#[test]
fn speed_settles_on_target_after_five_seconds() {
    let config = TunnelConfig {
        speed_up: 10.0,
        ..TunnelConfig::default()
    };
    let mut tunnel = started(config, 1);
    tunnel.set_speed_up(true);
    run(&mut tunnel, 300);
    let speed = tunnel.state().speed();
    assert!((speed - 10.0).abs() < 1e-3, "speed = {speed}");
    assert!(tunnel.state().time_offset() > 0.0);
}

#[test]
fn resize_after_dispose_is_ignored() {
    let mut tunnel = started(TunnelConfig::default(), 1);
    tunnel.resize(800, 600);
    tunnel.dispose();
    tunnel.resize(1024, 768);
    assert_eq!(tunnel.scene().backend().resizes(), &[(800, 600)]);
    assert!(tunnel.scene().surface_size().is_none());
}

#[test]
fn dispose_twice_releases_once() {
    let mut tunnel = started(TunnelConfig::default(), 1);
    tunnel.dispose();
    tunnel.dispose();
    assert_eq!(tunnel.phase(), Phase::Disposed);
    assert_eq!(tunnel.scene().backend().releases(), 1);
    assert_eq!(tunnel.host().unsubscribe_calls(), 1);
    assert_eq!(tunnel.host().spurious_unsubscribes(), 0);
    assert_eq!(tunnel.host().cancelled(), 1);
}

#[test]
fn dispose_before_init_is_clean() {
    let mut tunnel = Tunnel::new(
        TunnelConfig::default(),
        HeadlessBackend::new(64, 64),
        ManualHost::new(64, 64),
        ManualClock::at_fps(60.0),
    )
    .unwrap();
    tunnel.dispose();
    tunnel.init_with(&mut SeededRandom::new(0)).unwrap();
    assert_eq!(tunnel.scene().backend().uploads(), 0);
    assert_eq!(tunnel.scene().backend().releases(), 1);
    assert_eq!(tunnel.host().cancelled(), 0);
}

#[test]
fn residual_frame_after_dispose_draws_nothing() {
    let mut tunnel = started(TunnelConfig::default(), 1);
    run(&mut tunnel, 5);
    let frames = tunnel.scene().backend().frames();
    let requested = tunnel.host().requested();

    tunnel.dispose();
    // A host that already dequeued the callback still fires it once.
    tunnel.tick();
    tunnel.set_speed_up(true);

    assert_eq!(tunnel.scene().backend().frames(), frames);
    assert_eq!(tunnel.host().requested(), requested);
    assert_eq!(tunnel.state().speed_target(), 0.0);
}

#[test]
fn each_frame_schedules_exactly_one_more() {
    let mut tunnel = started(TunnelConfig::default(), 1);
    run(&mut tunnel, 10);
    assert_eq!(tunnel.scene().backend().frames(), 11);
    assert_eq!(tunnel.host().requested(), 11);
    assert!(tunnel.host().has_pending());
}

#[test]
fn container_mismatch_triggers_resize() {
    let mut tunnel = started(TunnelConfig::default(), 1);
    assert!(tunnel.scene().backend().resizes().is_empty());

    tunnel.host_mut().set_container_size(1024, 768);
    run(&mut tunnel, 1);
    assert_eq!(tunnel.scene().backend().resizes(), &[(1024, 768)]);
    let aspect = tunnel.scene().camera().aspect();
    assert!((aspect - 1024.0 / 768.0).abs() < 1e-6);

    run(&mut tunnel, 3);
    assert_eq!(tunnel.scene().backend().resizes().len(), 1);
}

#[test]
fn zero_sized_container_does_not_thrash() {
    let mut tunnel = started(TunnelConfig::default(), 1);
    tunnel.host_mut().set_container_size(0, 0);
    run(&mut tunnel, 4);
    assert_eq!(tunnel.scene().backend().resizes(), &[(1, 1)]);
}

#[test]
fn camera_follows_distorted_path() {
    let mut tunnel = started(TunnelConfig::default(), 1);
    run(&mut tunnel, 29);
    // 30 frames at 60 fps with no speed-up.
    let time = 30.0 / 60.0;
    let camera = tunnel.scene().camera();
    let expected = camera.position + distort(0.025, time);
    assert!((camera.target() - expected).length() < 1e-3);
}

#[test]
fn speed_up_widens_field_of_view() {
    let mut tunnel = started(TunnelConfig::default(), 1);
    tunnel.set_speed_up(true);
    run(&mut tunnel, 60);
    let fov = tunnel.scene().camera().fov();
    assert!(fov > 90.0 && fov <= 150.0, "fov = {fov}");

    tunnel.set_speed_up(false);
    run(&mut tunnel, 600);
    assert!((tunnel.scene().camera().fov() - 90.0).abs() < 0.5);
}

#[test]
fn zero_delta_leaves_state_unchanged() {
    let mut tunnel = Tunnel::new(
        TunnelConfig::default(),
        HeadlessBackend::new(64, 64),
        ManualHost::new(64, 64),
        ManualClock::new(0.0),
    )
    .unwrap();
    tunnel.set_speed_up(true);
    tunnel.init_with(&mut SeededRandom::new(0)).unwrap();
    run(&mut tunnel, 10);
    assert_eq!(tunnel.state().speed(), 0.0);
    assert_eq!(tunnel.state().fov(), 90.0);
    assert_eq!(tunnel.state().time_offset(), 0.0);
    assert_eq!(tunnel.scene().backend().frames(), 11);
}

struct RejectingBackend {
    inner: HeadlessBackend,
}

impl RenderBackend for RejectingBackend {
    fn surface_size(&self) -> (u32, u32) {
        self.inner.surface_size()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.inner.resize(width, height);
    }

    fn upload(&mut self, _geometry: &TunnelGeometry) -> Result<(), RenderError> {
        Err(RenderError::Context("out of memory".into()))
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), RenderError> {
        self.inner.render(frame)
    }

    fn release(&mut self) {
        self.inner.release();
    }
}

#[test]
fn failed_upload_disposes_scene() {
    let mut tunnel = Tunnel::new(
        TunnelConfig::default(),
        RejectingBackend {
            inner: HeadlessBackend::new(64, 64),
        },
        ManualHost::new(64, 64),
        ManualClock::at_fps(60.0),
    )
    .unwrap();
    let result = tunnel.init_with(&mut SeededRandom::new(0));
    assert!(matches!(result, Err(TunnelError::Render(_))));
    assert!(tunnel.is_disposed());
    assert_eq!(tunnel.scene().backend().inner.releases(), 1);
    assert_eq!(tunnel.scene().backend().inner.frames(), 0);
    assert!(!tunnel.host().resize_subscribed());
    assert!(!tunnel.host().has_pending());
}

#[test]
fn host_trait_is_object_safe() {
    let mut host = ManualHost::new(2, 2);
    let dyn_host: &mut dyn Host = &mut host;
    dyn_host.request_frame();
    assert_eq!(dyn_host.container_size(), (2, 2));
}
