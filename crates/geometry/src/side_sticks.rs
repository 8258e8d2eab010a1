use glam::Vec3;
use hyperspeed_common::{RandomSource, Rgb};
use hyperspeed_config::TunnelConfig;

use crate::instances::InstanceBuffer;

/// Structural sticks standing along the outer edge of the left road way.
#[derive(Debug, Clone, PartialEq)]
pub struct SideSticks {
    pub translation: Vec3,
    /// Offsets place each stick on the ground; metrics are `(width, height, 0)`.
    pub instances: InstanceBuffer,
}

/// Spread `total_side_light_sticks` sticks over the tunnel, one per slot of
/// `length / total`, jittered inside its slot.
pub fn generate_side_sticks(config: &TunnelConfig, rng: &mut dyn RandomSource) -> SideSticks {
    let total = config.total_side_light_sticks;
    let color = Rgb::from_hex(config.colors.sticks);
    let spacing = if total == 0 {
        0.0
    } else {
        config.length / total as f32
    };

    let mut instances = InstanceBuffer::with_capacity(total as usize);
    for i in 0..total {
        let width = config.light_stick_width.sample(rng);
        let height = config.light_stick_height.sample(rng);
        let depth = i as f32 * spacing + rng.uniform(0.0, spacing);
        instances.push(
            Vec3::new(0.0, height / 2.0, -depth),
            Vec3::new(width, height, 0.0),
            color,
        );
    }

    tracing::debug!(instances = instances.len(), "generated side sticks");
    SideSticks {
        translation: Vec3::new(-(config.road_width + config.island_width / 2.0), 0.0, 0.0),
        instances,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyperspeed_common::SeededRandom;

    #[test]
    fn sticks_stay_inside_tunnel() {
        let config = TunnelConfig::default();
        let mut rng = SeededRandom::new(12);
        let sticks = generate_side_sticks(&config, &mut rng);
        assert_eq!(sticks.instances.len(), 20);
        assert_eq!(sticks.translation.x, -11.0);
        let mut last_z = f32::MAX;
        for inst in sticks.instances.iter() {
            assert!(inst.offset.z <= 0.0 && inst.offset.z >= -config.length);
            assert!(inst.offset.z <= last_z, "sticks are ordered along the tunnel");
            last_z = inst.offset.z;
            assert!(config.light_stick_width.contains(inst.metrics.x));
            assert!(config.light_stick_height.contains(inst.metrics.y));
            assert_eq!(inst.offset.y, inst.metrics.y / 2.0);
        }
    }

    #[test]
    fn no_sticks_configured() {
        let config = TunnelConfig {
            total_side_light_sticks: 0,
            ..TunnelConfig::default()
        };
        let mut rng = SeededRandom::new(0);
        assert!(generate_side_sticks(&config, &mut rng).instances.is_empty());
    }
}
