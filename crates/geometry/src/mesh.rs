use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Open unit tube from `z = 0` to `z = -1` with radius 1.
///
/// Instances scale it by `(radius, radius, length)`.
pub fn tube_mesh(tubular_segments: u32, radial_segments: u32) -> MeshData {
    let tubular = tubular_segments.max(1);
    let radial = radial_segments.max(3);
    let ring = radial + 1;

    let mut vertices = Vec::with_capacity(((tubular + 1) * ring) as usize);
    for j in 0..=tubular {
        let z = -(j as f32) / tubular as f32;
        for i in 0..=radial {
            let angle = i as f32 / radial as f32 * TAU;
            let (sin, cos) = angle.sin_cos();
            vertices.push(Vertex::new([cos, sin, z], [cos, sin, 0.0]));
        }
    }

    let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = ring * (j - 1) + (i - 1);
            let b = ring * j + (i - 1);
            let c = ring * j + i;
            let d = ring * (j - 1) + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData { vertices, indices }
}

/// Flat grid in the XY plane centered on the origin, normal +Z.
pub fn plane_mesh(width: f32, height: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let gx = width_segments.max(1);
    let gy = height_segments.max(1);
    let (half_w, half_h) = (width / 2.0, height / 2.0);
    let (seg_w, seg_h) = (width / gx as f32, height / gy as f32);

    let mut vertices = Vec::with_capacity(((gx + 1) * (gy + 1)) as usize);
    for iy in 0..=gy {
        let y = half_h - iy as f32 * seg_h;
        for ix in 0..=gx {
            let x = ix as f32 * seg_w - half_w;
            vertices.push(Vertex::new([x, y, 0.0], [0.0, 0.0, 1.0]));
        }
    }

    let mut indices = Vec::with_capacity((gx * gy * 6) as usize);
    for iy in 0..gy {
        for ix in 0..gx {
            let a = ix + (gx + 1) * iy;
            let b = ix + (gx + 1) * (iy + 1);
            let c = (ix + 1) + (gx + 1) * (iy + 1);
            let d = (ix + 1) + (gx + 1) * iy;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData { vertices, indices }
}

/// Unit box centered on the origin.
pub fn box_mesh() -> MeshData {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex::new([-p, -p,  p], [0.0, 0.0, 1.0]),
        Vertex::new([ p, -p,  p], [0.0, 0.0, 1.0]),
        Vertex::new([ p,  p,  p], [0.0, 0.0, 1.0]),
        Vertex::new([-p,  p,  p], [0.0, 0.0, 1.0]),
        // -Z face
        Vertex::new([ p, -p, -p], [0.0, 0.0, -1.0]),
        Vertex::new([-p, -p, -p], [0.0, 0.0, -1.0]),
        Vertex::new([-p,  p, -p], [0.0, 0.0, -1.0]),
        Vertex::new([ p,  p, -p], [0.0, 0.0, -1.0]),
        // +X face
        Vertex::new([ p, -p,  p], [1.0, 0.0, 0.0]),
        Vertex::new([ p, -p, -p], [1.0, 0.0, 0.0]),
        Vertex::new([ p,  p, -p], [1.0, 0.0, 0.0]),
        Vertex::new([ p,  p,  p], [1.0, 0.0, 0.0]),
        // -X face
        Vertex::new([-p, -p, -p], [-1.0, 0.0, 0.0]),
        Vertex::new([-p, -p,  p], [-1.0, 0.0, 0.0]),
        Vertex::new([-p,  p,  p], [-1.0, 0.0, 0.0]),
        Vertex::new([-p,  p, -p], [-1.0, 0.0, 0.0]),
        // +Y face
        Vertex::new([-p,  p,  p], [0.0, 1.0, 0.0]),
        Vertex::new([ p,  p,  p], [0.0, 1.0, 0.0]),
        Vertex::new([ p,  p, -p], [0.0, 1.0, 0.0]),
        Vertex::new([-p,  p, -p], [0.0, 1.0, 0.0]),
        // -Y face
        Vertex::new([-p, -p, -p], [0.0, -1.0, 0.0]),
        Vertex::new([ p, -p, -p], [0.0, -1.0, 0.0]),
        Vertex::new([ p, -p,  p], [0.0, -1.0, 0.0]),
        Vertex::new([-p, -p,  p], [0.0, -1.0, 0.0]),
    ];
    let indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect();
    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices_in_range(mesh: &MeshData) -> bool {
        mesh.indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertices.len())
    }

    #[test]
    fn tube_dimensions() {
        let tube = tube_mesh(40, 8);
        assert_eq!(tube.vertex_count(), 41 * 9);
        assert_eq!(tube.triangle_count(), 40 * 8 * 2);
        assert!(indices_in_range(&tube));
        for v in &tube.vertices {
            let [x, y, z] = v.position;
            assert!(((x * x + y * y).sqrt() - 1.0).abs() < 1e-5);
            assert!((-1.0..=0.0).contains(&z));
        }
    }

    #[test]
    fn plane_dimensions() {
        let plane = plane_mesh(10.0, 400.0, 20, 100);
        assert_eq!(plane.vertex_count(), 21 * 101);
        assert_eq!(plane.triangle_count(), 20 * 100 * 2);
        assert!(indices_in_range(&plane));
        let max_x = plane
            .vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert!((max_x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn box_has_six_faces() {
        let cube = box_mesh();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert!(indices_in_range(&cube));
    }
}
