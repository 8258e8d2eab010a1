//! Configuration structs with defaults matching the reference animation.

use std::path::Path;

use hyperspeed_common::{Rgb, Sample};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Complete tunnel configuration.
///
/// Missing fields in a loaded document take their defaults. Construct
/// overrides in code with struct-update syntax:
///
/// ```
/// use hyperspeed_config::TunnelConfig;
///
/// let config = TunnelConfig {
///     lanes_per_road: 3,
///     ..TunnelConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelConfig {
    /// Tunnel length along -Z.
    pub length: f32,
    /// Width of one road way (all its lanes).
    pub road_width: f32,
    /// Width of the center island between the two road ways.
    pub island_width: f32,
    pub lanes_per_road: u32,
    /// Base vertical field of view in degrees.
    pub fov: f32,
    /// Field of view targeted while speeding up.
    pub fov_speed_up: f32,
    /// Speed target while speeding up.
    pub speed_up: f32,
    /// Fraction of the tunnel length over which car lights fade out.
    pub car_lights_fade: f32,
    pub total_side_light_sticks: u32,
    pub light_pairs_per_road_way: u32,
    pub light_stick_width: Sample,
    pub light_stick_height: Sample,
    pub moving_away_speed: Sample,
    pub moving_closer_speed: Sample,
    pub car_lights_length: Sample,
    pub car_lights_radius: Sample,
    /// Car width as a fraction of the lane width.
    pub car_width_percentage: Sample,
    /// Lateral shift as a fraction of the lane width.
    pub car_shift_x: Sample,
    pub car_floor_separation: Sample,
    pub camera: CameraConfig,
    pub distortion: DistortionConfig,
    pub colors: Palette,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        let length = 400.0;
        Self {
            length,
            road_width: 10.0,
            island_width: 2.0,
            lanes_per_road: 4,
            fov: 90.0,
            fov_speed_up: 150.0,
            speed_up: 2.0,
            car_lights_fade: 0.4,
            total_side_light_sticks: 20,
            light_pairs_per_road_way: 40,
            light_stick_width: Sample::range(0.12, 0.5),
            light_stick_height: Sample::range(1.3, 1.7),
            moving_away_speed: Sample::range(60.0, 80.0),
            moving_closer_speed: Sample::range(-120.0, -160.0),
            car_lights_length: Sample::range(length * 0.03, length * 0.2),
            car_lights_radius: Sample::range(0.05, 0.14),
            car_width_percentage: Sample::range(0.3, 0.5),
            car_shift_x: Sample::range(-0.8, 0.8),
            car_floor_separation: Sample::range(0.0, 5.0),
            camera: CameraConfig::default(),
            distortion: DistortionConfig::default(),
            colors: Palette::default(),
        }
    }
}

/// Perspective camera placement and clip planes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 8.0, -5.0],
            near: 0.1,
            far: 10_000.0,
        }
    }
}

/// Constants of the turbulent distortion curve and the camera look-at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistortionConfig {
    pub frequency: [f32; 4],
    pub amplitude: [f32; 4],
    pub look_at_amplitude: [f32; 3],
    pub look_at_offset: [f32; 3],
    /// Progress along the tunnel sampled for the camera target.
    pub look_at_progress: f32,
}

impl Default for DistortionConfig {
    fn default() -> Self {
        Self {
            frequency: [4.0, 8.0, 8.0, 1.0],
            amplitude: [25.0, 5.0, 10.0, 10.0],
            look_at_amplitude: [-2.0, -5.0, 0.0],
            look_at_offset: [0.0, 0.0, -10.0],
            look_at_progress: 0.025,
        }
    }
}

/// Colors as `0xRRGGBB`. Replaced as a whole when overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub road_color: u32,
    pub island_color: u32,
    pub background: u32,
    /// Lights of traffic moving away (left road way).
    pub left_cars: Vec<u32>,
    /// Lights of oncoming traffic (right road way).
    pub right_cars: Vec<u32>,
    /// Structural side sticks.
    pub sticks: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            road_color: 0x080808,
            island_color: 0x0a0a0a,
            background: 0x000000,
            left_cars: vec![0xd856bf, 0x6750a2, 0xc247ac],
            right_cars: vec![0x03b3c3, 0x0e5ea5, 0x324555],
            sticks: 0x03b3c3,
        }
    }
}

impl DistortionConfig {
    /// Reject constants that would make the curve non-finite.
    ///
    /// `frequency[0]` and `frequency[2]` divide the secondary time rates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let all_finite = self
            .frequency
            .iter()
            .chain(&self.amplitude)
            .chain(&self.look_at_amplitude)
            .chain(&self.look_at_offset)
            .chain(std::iter::once(&self.look_at_progress))
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ConfigError::invalid(
                "distortion",
                "all constants must be finite",
            ));
        }
        if self.frequency[0] == 0.0 || self.frequency[2] == 0.0 {
            return Err(ConfigError::invalid(
                "distortion.frequency",
                format!(
                    "frequency[0] and frequency[2] must be non-zero, got {:?}",
                    self.frequency
                ),
            ));
        }
        Ok(())
    }
}

impl Palette {
    pub fn left_cars_rgb(&self) -> Vec<Rgb> {
        self.left_cars.iter().copied().map(Rgb::from_hex).collect()
    }

    pub fn right_cars_rgb(&self) -> Vec<Rgb> {
        self.right_cars.iter().copied().map(Rgb::from_hex).collect()
    }
}

impl TunnelConfig {
    /// Width of a single lane.
    pub fn lane_width(&self) -> f32 {
        self.road_width / self.lanes_per_road as f32
    }

    /// Lateral distance from the tunnel axis to the center of a road way.
    pub fn road_way_center(&self) -> f32 {
        self.road_width / 2.0 + self.island_width / 2.0
    }

    /// Parse a YAML document. Fields left out keep their defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document. Fields left out keep their defaults.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` file, or YAML for any other extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&contents)?
        } else {
            Self::from_yaml_str(&contents)?
        };
        tracing::info!("loaded tunnel config from {}", path.display());
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject configurations the generators cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("length", self.length)?;
        positive("road_width", self.road_width)?;
        non_negative("island_width", self.island_width)?;
        positive("fov", self.fov)?;
        positive("fov_speed_up", self.fov_speed_up)?;
        non_negative("speed_up", self.speed_up)?;
        if !(0.0..=1.0).contains(&self.car_lights_fade) {
            return Err(ConfigError::invalid(
                "car_lights_fade",
                format!("{} is outside [0, 1]", self.car_lights_fade),
            ));
        }
        if self.lanes_per_road == 0 {
            return Err(ConfigError::invalid("lanes_per_road", "must be at least 1"));
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(ConfigError::invalid(
                "camera",
                format!(
                    "clip planes must satisfy 0 < near < far, got {} / {}",
                    self.camera.near, self.camera.far
                ),
            ));
        }
        self.distortion.validate()?;

        let ranges = [
            ("light_stick_width", &self.light_stick_width),
            ("light_stick_height", &self.light_stick_height),
            ("moving_away_speed", &self.moving_away_speed),
            ("moving_closer_speed", &self.moving_closer_speed),
            ("car_lights_length", &self.car_lights_length),
            ("car_lights_radius", &self.car_lights_radius),
            ("car_width_percentage", &self.car_width_percentage),
            ("car_shift_x", &self.car_shift_x),
            ("car_floor_separation", &self.car_floor_separation),
        ];
        for (field, sample) in ranges {
            if !sample.is_finite() {
                return Err(ConfigError::invalid(field, "range bounds must be finite"));
            }
        }

        if self.colors.left_cars.is_empty() {
            return Err(ConfigError::invalid("colors.left_cars", "palette is empty"));
        }
        if self.colors.right_cars.is_empty() {
            return Err(ConfigError::invalid("colors.right_cars", "palette is empty"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be > 0")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be >= 0")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = TunnelConfig::default();
        config.validate().unwrap();
        assert_eq!(config.car_lights_length, Sample::range(12.0, 80.0));
        assert_eq!(config.lane_width(), 2.5);
        assert_eq!(config.road_way_center(), 6.0);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = TunnelConfig::from_yaml_str("lanes_per_road: 3\nspeed_up: 4.5\n").unwrap();
        assert_eq!(config.lanes_per_road, 3);
        assert_eq!(config.speed_up, 4.5);
        assert_eq!(config.road_width, 10.0);
        assert_eq!(config.colors, Palette::default());
    }

    #[test]
    fn scalar_and_range_overrides() {
        let yaml = "car_lights_radius: [0.05, 0.05]\ncar_floor_separation: 2.0\n";
        let config = TunnelConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.car_lights_radius, Sample::range(0.05, 0.05));
        assert_eq!(config.car_floor_separation, Sample::Scalar(2.0));
    }

    #[test]
    fn palette_override_is_wholesale() {
        // A partial palette is rejected instead of being merged field by field.
        let partial = r#"{ "colors": { "road_color": 1 } }"#;
        assert!(matches!(
            TunnelConfig::from_json_str(partial),
            Err(ConfigError::Json(_))
        ));

        let full = r#"{ "colors": {
            "road_color": 1, "island_color": 2, "background": 3,
            "left_cars": [16711680], "right_cars": [255], "sticks": 4
        } }"#;
        let config = TunnelConfig::from_json_str(full).unwrap();
        assert_eq!(config.colors.left_cars, vec![0xff0000]);
        assert_eq!(config.colors.right_cars_rgb(), vec![Rgb::new(0.0, 0.0, 1.0)]);
    }

    #[test]
    fn validation_rejects_zero_lanes() {
        let config = TunnelConfig {
            lanes_per_road: 0,
            ..TunnelConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "lanes_per_road",
                ..
            })
        ));
    }

    #[test]
    fn validation_rejects_empty_palette() {
        let mut config = TunnelConfig::default();
        config.colors.right_cars.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_bad_clip_planes() {
        let mut config = TunnelConfig::default();
        config.camera.far = 0.05;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_zero_frequency_divisors() {
        for index in [0, 2] {
            let mut config = TunnelConfig::default();
            config.distortion.frequency[index] = 0.0;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Invalid {
                    field: "distortion.frequency",
                    ..
                })
            ));
        }

        let mut config = TunnelConfig::default();
        config.distortion.frequency[3] = 0.0;
        config.validate().unwrap();
    }

    #[test]
    fn validation_rejects_non_finite_distortion() {
        let yaml = "distortion:\n  look_at_offset: [0.0, .nan, -10.0]\n";
        assert!(matches!(
            TunnelConfig::from_yaml_str(yaml),
            Err(ConfigError::Invalid {
                field: "distortion",
                ..
            })
        ));

        let mut config = TunnelConfig::default();
        config.distortion.amplitude[1] = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn yaml_round_trip_of_defaults() {
        let config = TunnelConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(TunnelConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn load_from_files() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("tunnel.yaml");
        let mut f = std::fs::File::create(&yaml_path).unwrap();
        writeln!(f, "length: 250.0").unwrap();
        assert_eq!(TunnelConfig::load(&yaml_path).unwrap().length, 250.0);

        let json_path = dir.path().join("tunnel.json");
        std::fs::write(&json_path, r#"{ "fov": 75.0 }"#).unwrap();
        assert_eq!(TunnelConfig::load(&json_path).unwrap().fov, 75.0);

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(
            TunnelConfig::load(&missing),
            Err(ConfigError::Io(_))
        ));
    }
}
