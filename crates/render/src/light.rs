use glam::Vec3;
use hyperspeed_common::Rgb;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

/// Point light with linear falloff to zero at `distance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Rgb,
    pub intensity: f32,
    pub distance: f32,
    pub position: Vec3,
}

/// Scene lighting: one ambient term and two colored point lights.
#[derive(Debug, Clone, PartialEq)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub points: [PointLight; 2],
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: Rgb::from_hex(0xffffff),
                intensity: 0.8,
            },
            points: [
                PointLight {
                    color: Rgb::from_hex(0x49e2ff),
                    intensity: 1.5,
                    distance: 200.0,
                    position: Vec3::new(0.0, 15.0, -50.0),
                },
                PointLight {
                    color: Rgb::from_hex(0xc247ac),
                    intensity: 1.0,
                    distance: 150.0,
                    position: Vec3::new(-20.0, 10.0, -100.0),
                },
            ],
        }
    }
}
