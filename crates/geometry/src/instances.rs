use glam::Vec3;
use hyperspeed_common::Rgb;
use serde::Serialize;

/// Parallel per-instance attribute arrays for instanced drawing.
///
/// The three arrays always have the same length. The buffer is built in one
/// go by a generator and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstanceBuffer {
    offsets: Vec<[f32; 3]>,
    metrics: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

/// One decoded instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub offset: Vec3,
    pub metrics: Vec3,
    pub color: Rgb,
}

impl InstanceBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            offsets: Vec::with_capacity(capacity),
            metrics: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, offset: Vec3, metrics: Vec3, color: Rgb) {
        self.offsets.push(offset.to_array());
        self.metrics.push(metrics.to_array());
        self.colors.push(color.to_array());
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn offsets(&self) -> &[[f32; 3]] {
        &self.offsets
    }

    pub fn metrics(&self) -> &[[f32; 3]] {
        &self.metrics
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn get(&self, index: usize) -> Option<Instance> {
        Some(Instance {
            offset: Vec3::from_array(*self.offsets.get(index)?),
            metrics: Vec3::from_array(*self.metrics.get(index)?),
            color: {
                let [r, g, b] = *self.colors.get(index)?;
                Rgb::new(r, g, b)
            },
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Instance> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}
