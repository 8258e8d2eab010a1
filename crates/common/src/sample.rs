use serde::{Deserialize, Serialize};

use crate::RandomSource;

/// A sampled parameter: either a scalar upper bound or an explicit range.
///
/// Serialized untagged, so `0.4` and `[0.05, 0.14]` are both accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sample {
    /// Uniform over `[0, max)`.
    Scalar(f32),
    /// Uniform between the two bounds. The first bound may exceed the second.
    Range([f32; 2]),
}

impl Sample {
    pub const fn range(min: f32, max: f32) -> Self {
        Self::Range([min, max])
    }

    /// Draw one value from the source.
    pub fn sample(&self, rng: &mut dyn RandomSource) -> f32 {
        match *self {
            Sample::Scalar(max) => rng.uniform(0.0, max),
            Sample::Range([min, max]) => rng.uniform(min, max),
        }
    }

    /// The bounds as written, `(0, max)` for a scalar.
    pub fn bounds(&self) -> (f32, f32) {
        match *self {
            Sample::Scalar(max) => (0.0, max),
            Sample::Range([min, max]) => (min, max),
        }
    }

    /// Whether `value` could have been produced by [`Sample::sample`].
    ///
    /// Includes the first bound and excludes the second, whichever order
    /// they are written in; a degenerate range only contains its bound.
    pub fn contains(&self, value: f32) -> bool {
        let (a, b) = self.bounds();
        if a == b {
            value == a
        } else if a < b {
            value >= a && value < b
        } else {
            value <= a && value > b
        }
    }

    pub fn is_finite(&self) -> bool {
        let (a, b) = self.bounds();
        a.is_finite() && b.is_finite()
    }
}

impl From<f32> for Sample {
    fn from(max: f32) -> Self {
        Sample::Scalar(max)
    }
}

impl From<[f32; 2]> for Sample {
    fn from(range: [f32; 2]) -> Self {
        Sample::Range(range)
    }
}
