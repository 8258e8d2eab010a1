use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use hyperspeed_common::{Rgb, Transform};
use hyperspeed_config::TunnelConfig;

use crate::Side;
use crate::mesh::{MeshData, plane_mesh};

/// Grid resolution of each surface, kept for per-vertex bending.
pub const SURFACE_SEGMENTS: (u32, u32) = (20, 100);

/// Standard material with a faint emissive tint so surfaces read without lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    pub color: Rgb,
    pub emissive: Rgb,
    pub metalness: f32,
    pub roughness: f32,
}

/// One flat ground surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSurface {
    pub side: Side,
    pub is_road: bool,
    pub mesh: MeshData,
    pub transform: Transform,
    pub material: SurfaceMaterial,
}

/// Build one surface: a road way (`is_road`) or the center island.
///
/// The plane is laid flat, spans `z` in `[-length, 0]` and is shifted by
/// `side * (island_width / 2 + road_width / 2)`.
pub fn build_lane(config: &TunnelConfig, side: Side, is_road: bool) -> RoadSurface {
    let width = if is_road {
        config.road_width
    } else {
        config.island_width
    };
    let (segments_x, segments_z) = SURFACE_SEGMENTS;
    let mesh = plane_mesh(width, config.length, segments_x, segments_z);

    let transform = Transform {
        position: Vec3::new(side.sign() * config.road_way_center(), 0.0, -config.length / 2.0),
        rotation: Quat::from_rotation_x(-FRAC_PI_2),
        scale: Vec3::ONE,
    };

    let material = if is_road {
        SurfaceMaterial {
            color: Rgb::from_hex(config.colors.road_color),
            emissive: Rgb::from_hex(0x1a1a1a),
            metalness: 0.3,
            roughness: 0.8,
        }
    } else {
        SurfaceMaterial {
            color: Rgb::from_hex(config.colors.island_color),
            emissive: Rgb::from_hex(0x0a0a0a),
            metalness: 0.3,
            roughness: 0.8,
        }
    };

    RoadSurface {
        side,
        is_road,
        mesh,
        transform,
        material,
    }
}

/// The three ground surfaces of the tunnel.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSurfaces {
    pub left: RoadSurface,
    pub right: RoadSurface,
    pub island: RoadSurface,
}

impl RoadSurfaces {
    pub fn iter(&self) -> impl Iterator<Item = &RoadSurface> {
        [&self.left, &self.right, &self.island].into_iter()
    }
}

pub fn build_road(config: &TunnelConfig) -> RoadSurfaces {
    RoadSurfaces {
        left: build_lane(config, Side::Left, true),
        right: build_lane(config, Side::Right, true),
        island: build_lane(config, Side::Center, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_x_extent(surface: &RoadSurface) -> (f32, f32) {
        let m = surface.transform.to_matrix();
        surface
            .mesh
            .vertices
            .iter()
            .map(|v| m.transform_point3(Vec3::from_array(v.position)).x)
            .fold((f32::MAX, f32::MIN), |(lo, hi), x| (lo.min(x), hi.max(x)))
    }

    #[test]
    fn surfaces_lie_flat_along_tunnel() {
        let config = TunnelConfig::default();
        let lane = build_lane(&config, Side::Left, true);
        let m = lane.transform.to_matrix();
        for v in &lane.mesh.vertices {
            let p = m.transform_point3(Vec3::from_array(v.position));
            assert!(p.y.abs() < 1e-3);
            assert!(p.z <= 1e-3 && p.z >= -config.length - 1e-3);
        }
        let up = m.transform_vector3(Vec3::Z);
        assert!((up - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn lanes_flank_island_without_overlap() {
        let config = TunnelConfig::default();
        let road = build_road(&config);
        let (l_lo, l_hi) = world_x_extent(&road.left);
        let (i_lo, i_hi) = world_x_extent(&road.island);
        let (r_lo, r_hi) = world_x_extent(&road.right);
        assert!((l_lo + 11.0).abs() < 1e-4 && (l_hi + 1.0).abs() < 1e-4);
        assert!((i_lo + 1.0).abs() < 1e-4 && (i_hi - 1.0).abs() < 1e-4);
        assert!((r_lo - 1.0).abs() < 1e-4 && (r_hi - 11.0).abs() < 1e-4);
    }

    #[test]
    fn materials_per_surface() {
        let config = TunnelConfig::default();
        let road = build_road(&config);
        assert_eq!(road.left.material.color, Rgb::from_hex(0x080808));
        assert_eq!(road.island.material.color, Rgb::from_hex(0x0a0a0a));
        assert!(road.iter().all(|s| s.material.emissive != Rgb::BLACK));
        assert_eq!(road.iter().count(), 3);
    }
}
