use ndarray::Array4;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::error::Shape;

/// How the input feature map is filled. Values never change access counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum InputPattern {
    #[default]
    Zeros,
    /// standard normal samples, reproducible per seed
    Gaussian { seed: u64 },
    /// each element holds its row-major flat index
    Ramp,
}

/// (output channels, input channels, height, width)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputShape {
    pub out_channels: usize,
    pub in_channels: usize,
    pub height: usize,
    pub width: usize,
}

impl InputShape {
    pub fn new(out_channels: usize, in_channels: usize, height: usize, width: usize) -> Self {
        InputShape {
            out_channels,
            in_channels,
            height,
            width,
        }
    }

    pub fn dims(&self) -> (usize, usize, usize, usize) {
        (self.out_channels, self.in_channels, self.height, self.width)
    }

    pub fn to_shape(&self) -> Shape {
        Shape::from_slice(&[self.out_channels, self.in_channels, self.height, self.width])
    }
}

pub fn build_input(shape: InputShape, pattern: InputPattern) -> Array4<f64> {
    match pattern {
        InputPattern::Zeros => Array4::zeros(shape.dims()),
        InputPattern::Gaussian { seed } => {
            let mut rng = Pcg64::seed_from_u64(seed);
            Array4::from_shape_fn(shape.dims(), |_| {
                let v: f64 = StandardNormal.sample(&mut rng);
                v
            })
        }
        InputPattern::Ramp => {
            let (_, c, h, w) = shape.dims();
            Array4::from_shape_fn(shape.dims(), |(o, i, y, x)| (((o * c + i) * h + y) * w + x) as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_has_requested_shape() {
        let input = build_input(InputShape::new(2, 3, 4, 5), InputPattern::Zeros);
        assert_eq!(input.dim(), (2, 3, 4, 5));
        assert!(input.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn gaussian_is_reproducible_per_seed() {
        let shape = InputShape::new(1, 2, 4, 4);
        let a = build_input(shape, InputPattern::Gaussian { seed: 7 });
        let b = build_input(shape, InputPattern::Gaussian { seed: 7 });
        let c = build_input(shape, InputPattern::Gaussian { seed: 8 });
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ramp_holds_flat_index() {
        let input = build_input(InputShape::new(2, 2, 2, 3), InputPattern::Ramp);
        assert_eq!(input.as_slice().unwrap()[..], (0..24).map(|v| v as f64).collect::<Vec<_>>()[..]);
    }

    #[test]
    fn pattern_parses_from_toml_table() {
        let pattern: InputPattern = toml::from_str("pattern = \"gaussian\"\nseed = 3").unwrap();
        assert_eq!(pattern, InputPattern::Gaussian { seed: 3 });
    }
}
