use hyperspeed_common::RandomSource;
use hyperspeed_config::TunnelConfig;

use crate::car_lights::CarLights;
use crate::mesh::{MeshData, box_mesh, tube_mesh};
use crate::road::{RoadSurfaces, build_road};
use crate::side_sticks::{SideSticks, generate_side_sticks};

/// Everything the scene draws, generated once at initialization.
#[derive(Debug, Clone, PartialEq)]
pub struct TunnelGeometry {
    pub road: RoadSurfaces,
    pub moving_away: CarLights,
    pub moving_closer: CarLights,
    pub side_sticks: SideSticks,
    /// Base mesh instanced for every car light.
    pub light_mesh: MeshData,
    /// Base mesh instanced for every side stick.
    pub stick_mesh: MeshData,
}

impl TunnelGeometry {
    pub fn generate(config: &TunnelConfig, rng: &mut dyn RandomSource) -> Self {
        let _span = tracing::debug_span!("generate_geometry").entered();
        Self {
            road: build_road(config),
            moving_away: CarLights::moving_away(config, rng),
            moving_closer: CarLights::moving_closer(config, rng),
            side_sticks: generate_side_sticks(config, rng),
            light_mesh: tube_mesh(40, 8),
            stick_mesh: box_mesh(),
        }
    }

    /// Total number of instanced draws across all instance buffers.
    pub fn instance_count(&self) -> usize {
        self.moving_away.instances.len()
            + self.moving_closer.instances.len()
            + self.side_sticks.instances.len()
    }
}
