//! Perlin-noise terrain, the default generator.

use cgmath::Point2;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::engine_state::voxels::block::block_type::BlockType;

use super::{ColumnGrid, ColumnSample, DensityField, HeightField, TerrainGenerator, WorldBounds};

/// Scaling factor applied to world coordinates when sampling terrain height.
pub const HEIGHT_SCALE_FACTOR: f64 = 0.005;
/// Scaling factor applied to world coordinates when sampling biomes.
pub const BIOME_SCALE_FACTOR: f64 = 0.002;
/// Scaling factor applied to world coordinates when sampling tree density.
pub const TREE_SCALE_FACTOR: f64 = 0.37;
/// Columns with a biome value below this get a sand surface.
pub const DESERT_BIOME_THRESHOLD: f32 = 0.4;

/// Fractal Perlin terrain generator.
///
/// Heights vary around `bounds.ground` by up to half the distance to
/// `bounds.max_height`, and never drop below `bedrock + 1` so every column has
/// a surface. Biome and tree density come from independent Perlin fields.
pub struct NoiseGenerator {
    seed: u64,
    bounds: WorldBounds,
    height: Fbm<Perlin>,
    biome: Perlin,
    trees: Perlin,
}

impl NoiseGenerator {
    pub fn new(seed: u64, bounds: WorldBounds) -> Self {
        let noise_seed = seed as u32;
        NoiseGenerator {
            seed,
            bounds,
            height: Fbm::<Perlin>::new(noise_seed)
                .set_octaves(5)
                .set_frequency(1.0),
            biome: Perlin::new(noise_seed ^ 0xB10E_B10E),
            trees: Perlin::new(noise_seed ^ 0x7EE5_7EE5),
        }
    }

    /// Maps a noise sample from roughly `[-1, 1]` onto `[0, 1]`.
    fn to_unit(sample: f64) -> f32 {
        ((sample + 1.0) / 2.0).clamp(0.0, 1.0) as f32
    }

    fn column_height(&self, x: i32, z: i32) -> i32 {
        let sample = self.height.get(Self::to_noise_pos(x, z, HEIGHT_SCALE_FACTOR));
        let amplitude = (self.bounds.max_height - self.bounds.ground) as f64 / 2.0;
        let height = self.bounds.ground + (sample * amplitude).round() as i32;
        height.clamp(self.bounds.bedrock + 1, self.bounds.max_height)
    }

    fn to_noise_pos(x: i32, z: i32, scale_factor: f64) -> [f64; 2] {
        [x as f64 * scale_factor, z as f64 * scale_factor]
    }
}

impl TerrainGenerator for NoiseGenerator {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn height_field(&self, origin: Point2<i32>) -> HeightField {
        ColumnGrid::from_fn(|x, z| {
            let (wx, wz) = (origin.x + x as i32, origin.y + z as i32);
            let material = if self.biome(Point2::new(wx, wz)) < DESERT_BIOME_THRESHOLD {
                BlockType::SAND
            } else {
                BlockType::GRASS
            };
            ColumnSample {
                height: self.column_height(wx, wz),
                material,
            }
        })
    }

    fn biome(&self, column: Point2<i32>) -> f32 {
        Self::to_unit(
            self.biome
                .get(Self::to_noise_pos(column.x, column.y, BIOME_SCALE_FACTOR)),
        )
    }

    fn tree_density(&self, origin: Point2<i32>) -> DensityField {
        ColumnGrid::from_fn(|x, z| {
            let (wx, wz) = (origin.x + x as i32, origin.y + z as i32);
            Self::to_unit(self.trees.get(Self::to_noise_pos(wx, wz, TREE_SCALE_FACTOR)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> WorldBounds {
        WorldBounds {
            bedrock: 0,
            ground: 100,
            max_height: 200,
        }
    }

    #[test]
    fn same_seed_generates_identical_terrain() {
        let a = NoiseGenerator::new(10, bounds());
        let b = NoiseGenerator::new(10, bounds());
        let origin = Point2::new(-32, 48);
        assert_eq!(a.height_field(origin), b.height_field(origin));
        assert_eq!(a.tree_density(origin), b.tree_density(origin));
        assert_eq!(a.biome(origin), b.biome(origin));
    }

    #[test]
    fn samples_stay_within_bounds() {
        let generator = NoiseGenerator::new(10, bounds());
        for origin in [Point2::new(0, 0), Point2::new(-160, 320), Point2::new(4096, -4096)] {
            let heights = generator.height_field(origin);
            let density = generator.tree_density(origin);
            for x in 0..16 {
                for z in 0..16 {
                    let sample = heights.get(x, z);
                    assert!(sample.height > 0 && sample.height <= 200);
                    assert!((0.0..=1.0).contains(&density.get(x, z)));
                }
            }
            let biome = generator.biome(origin);
            assert!((0.0..=1.0).contains(&biome));
        }
    }
}
