use std::f32::consts::PI;
use std::f64::consts::TAU;

use glam::{Vec3, Vec4};
use hyperspeed_config::DistortionConfig;

/// Finite-difference step used to approximate the curve tangent.
pub const TANGENT_EPSILON: f32 = 0.007;

/// Normalized sine in `[0, 1]`.
fn nsin(v: f32) -> f32 {
    v.sin() * 0.5 + 0.5
}

/// `time * rate` wrapped to one turn before narrowing, so large times keep
/// their sub-second resolution.
fn phase(time: f64, rate: f32) -> f32 {
    (time * f64::from(rate)).rem_euclid(TAU) as f32
}

/// Turbulent distortion curve of the tunnel.
///
/// `sample` returns the difference between the curve at `progress` and at
/// `progress + TANGENT_EPSILON`, scaled by `look_at_amplitude` and offset by
/// `look_at_offset`. Added to the camera position it yields a weaving
/// look-at target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distortion {
    pub frequency: Vec4,
    pub amplitude: Vec4,
    pub look_at_amplitude: Vec3,
    pub look_at_offset: Vec3,
}

impl Default for Distortion {
    fn default() -> Self {
        Self::from_config(&DistortionConfig::default())
    }
}

impl Distortion {
    pub fn from_config(config: &DistortionConfig) -> Self {
        Self {
            frequency: Vec4::from_array(config.frequency),
            amplitude: Vec4::from_array(config.amplitude),
            look_at_amplitude: Vec3::from_array(config.look_at_amplitude),
            look_at_offset: Vec3::from_array(config.look_at_offset),
        }
    }

    fn curve_x(&self, p: f32, time: f64) -> f32 {
        let (f, a) = (self.frequency, self.amplitude);
        (PI * p * f.x + phase(time, 1.0)).cos() * a.x
            + (PI * p * f.y + phase(time, f.y / f.x)).cos().powi(2) * a.y
    }

    fn curve_y(&self, p: f32, time: f64) -> f32 {
        let (f, a) = (self.frequency, self.amplitude);
        -nsin(PI * p * f.z + phase(time, 1.0)) * a.z
            - nsin(PI * p * f.w + phase(time, f.w / f.z)).powi(5) * a.w
    }

    /// Look-at offset at `progress` along the tunnel, at virtual `time` seconds.
    pub fn sample(&self, progress: f32, time: f64) -> Vec3 {
        let next = progress + TANGENT_EPSILON;
        let tangent = Vec3::new(
            self.curve_x(progress, time) - self.curve_x(next, time),
            self.curve_y(progress, time) - self.curve_y(next, time),
            0.0,
        );
        tangent * self.look_at_amplitude + self.look_at_offset
    }
}

/// Sample the default turbulent distortion.
pub fn distort(progress: f32, time: f64) -> Vec3 {
    Distortion::default().sample(progress, time)
}
