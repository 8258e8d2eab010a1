use glam::Vec3;
use hyperspeed_common::{RandomSource, Rgb, Sample};
use hyperspeed_config::TunnelConfig;

use crate::Side;
use crate::instances::InstanceBuffer;

/// Height of a light above its floor separation, in light radii.
const RADIUS_LIFT: f32 = 1.3;

/// Sampled parameters of one simulated vehicle: the twin lights it emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightPair {
    pub lane: u32,
    pub radius: f32,
    pub length: f32,
    pub speed: f32,
    /// Car width as a fraction of the lane width.
    pub width_fraction: f32,
    /// Lateral shift as a fraction of the lane width.
    pub shift_fraction: f32,
    pub floor_separation: f32,
    /// Distance ahead of the origin along the tunnel, in `[0, length)`.
    pub depth: f32,
    pub color: Rgb,
}

impl LightPair {
    /// Center of the pair across the road way, after the lateral shift.
    pub fn center_x(&self, config: &TunnelConfig) -> f32 {
        let lane_width = config.lane_width();
        let lane_x = self.lane as f32 * lane_width - config.road_width / 2.0 + lane_width / 2.0;
        lane_x + self.shift_fraction * lane_width
    }

    pub fn car_width(&self, config: &TunnelConfig) -> f32 {
        self.width_fraction * config.lane_width()
    }

    /// Offsets of the left and right light of the pair.
    pub fn offsets(&self, config: &TunnelConfig) -> [Vec3; 2] {
        let x = self.center_x(config);
        let half = self.car_width(config) / 2.0;
        let y = self.floor_separation + self.radius * RADIUS_LIFT;
        let z = -self.depth;
        [Vec3::new(x - half, y, z), Vec3::new(x + half, y, z)]
    }

    pub fn metrics(&self) -> Vec3 {
        Vec3::new(self.radius, self.length, self.speed)
    }
}

/// Sample the `index`-th pair of a road way.
pub fn sample_light_pair(
    config: &TunnelConfig,
    index: u32,
    colors: &[Rgb],
    speed: Sample,
    rng: &mut dyn RandomSource,
) -> LightPair {
    let radius = config.car_lights_radius.sample(rng);
    let length = config.car_lights_length.sample(rng);
    let speed = speed.sample(rng);
    let width_fraction = config.car_width_percentage.sample(rng);
    let shift_fraction = config.car_shift_x.sample(rng);
    let floor_separation = config.car_floor_separation.sample(rng);
    let depth = Sample::Scalar(config.length).sample(rng);
    let color = if colors.is_empty() {
        Rgb::WHITE
    } else {
        colors[rng.pick(colors.len())]
    };

    LightPair {
        lane: index % config.lanes_per_road.max(1),
        radius,
        length,
        speed,
        width_fraction,
        shift_fraction,
        floor_separation,
        depth,
        color,
    }
}

/// Build the instance buffer of one road way: two instances per pair.
///
/// Instances `2k` and `2k + 1` are the left and right light of pair `k` and
/// share metrics and color.
pub fn generate_car_lights(
    config: &TunnelConfig,
    colors: &[Rgb],
    speed: Sample,
    rng: &mut dyn RandomSource,
) -> InstanceBuffer {
    let pairs = config.light_pairs_per_road_way;
    let mut buffer = InstanceBuffer::with_capacity(pairs as usize * 2);
    for i in 0..pairs {
        let pair = sample_light_pair(config, i, colors, speed, rng);
        let metrics = pair.metrics();
        for offset in pair.offsets(config) {
            buffer.push(offset, metrics, pair.color);
        }
    }
    buffer
}

/// Light sticks of one road way, positioned in the tunnel.
#[derive(Debug, Clone, PartialEq)]
pub struct CarLights {
    pub side: Side,
    /// Translation of the whole road way from the tunnel axis.
    pub translation: Vec3,
    /// Fraction of the tunnel over which the lights fade out.
    pub fade: f32,
    pub instances: InstanceBuffer,
}

impl CarLights {
    /// Traffic moving away from the viewer, left of the island.
    pub fn moving_away(config: &TunnelConfig, rng: &mut dyn RandomSource) -> Self {
        Self::generate(
            config,
            Side::Left,
            &config.colors.left_cars_rgb(),
            config.moving_away_speed,
            rng,
        )
    }

    /// Oncoming traffic, right of the island.
    pub fn moving_closer(config: &TunnelConfig, rng: &mut dyn RandomSource) -> Self {
        Self::generate(
            config,
            Side::Right,
            &config.colors.right_cars_rgb(),
            config.moving_closer_speed,
            rng,
        )
    }

    pub fn generate(
        config: &TunnelConfig,
        side: Side,
        colors: &[Rgb],
        speed: Sample,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let instances = generate_car_lights(config, colors, speed, rng);
        tracing::debug!(?side, instances = instances.len(), "generated car lights");
        Self {
            side,
            translation: Vec3::new(side.sign() * config.road_way_center(), 0.0, 0.0),
            fade: config.car_lights_fade,
            instances,
        }
    }

    /// Replace every instance with a freshly sampled set.
    pub fn regenerate(&mut self, config: &TunnelConfig, rng: &mut dyn RandomSource) {
        let (colors, speed) = match self.side {
            Side::Right => (config.colors.right_cars_rgb(), config.moving_closer_speed),
            _ => (config.colors.left_cars_rgb(), config.moving_away_speed),
        };
        self.instances = generate_car_lights(config, &colors, speed, rng);
    }
}
