//! Procedural geometry for the light tunnel.
//!
//! Everything here runs once at initialization. Instance buffers are built
//! whole and never edited in place; regenerating a lane replaces its buffer.
//!
//! # Layout
//! - Tunnel axis is -Z, starting at the origin.
//! - The left road way sits at negative X, the right one at positive X,
//!   separated by the center island.

mod car_lights;
mod instances;
mod mesh;
mod road;
mod side_sticks;
mod tunnel;

pub use car_lights::{CarLights, LightPair, generate_car_lights, sample_light_pair};
pub use instances::{Instance, InstanceBuffer};
pub use mesh::{MeshData, Vertex, box_mesh, plane_mesh, tube_mesh};
pub use road::{RoadSurface, RoadSurfaces, SurfaceMaterial, build_lane, build_road};
pub use side_sticks::{SideSticks, generate_side_sticks};
pub use tunnel::TunnelGeometry;

/// Lateral placement relative to the tunnel axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Side {
    Left,
    Center,
    Right,
}

impl Side {
    /// `-1`, `0` or `+1`.
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Center => 0.0,
            Side::Right => 1.0,
        }
    }
}

pub fn crate_info() -> &'static str {
    "hyperspeed-geometry v0.1.0"
}
