//! # Terrain Generation
//!
//! The world consumes terrain through the [`TerrainGenerator`] trait: per-chunk
//! height samples, per-column biome values and per-chunk tree density grids.
//! Every generator is a pure function of its seed and the world-space input, so
//! a chunk regenerated at the same origin comes out identical.
//!
//! Two generators are provided:
//! - [`NoiseGenerator`]: fractal Perlin terrain, the default
//! - [`FlatGenerator`]: constant terrain with hand-placed tree columns, for tests
//!   and debugging

use cgmath::Point2;

use super::block::block_type::BlockType;
use super::chunk::CHUNK_WIDTH;

mod flat_generator;
mod noise_generator;

pub use flat_generator::FlatGenerator;
pub use noise_generator::NoiseGenerator;

/// Vertical bounds of the world, in world-space voxel units.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorldBounds {
    /// Lowest solid layer.
    pub bedrock: i32,
    /// Base terrain level around which heights vary.
    pub ground: i32,
    /// No column rises above this height.
    pub max_height: i32,
}

impl WorldBounds {
    /// Clamps a raw column height into `[bedrock, max_height]`.
    pub fn clamp_height(&self, height: i32) -> i32 {
        height.clamp(self.bedrock, self.max_height)
    }
}

/// One terrain column: its surface height and surface material.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColumnSample {
    /// World y of the first empty voxel above the surface.
    pub height: i32,
    /// Material of the topmost solid voxel.
    pub material: BlockType,
}

/// A `CHUNK_WIDTH` x `CHUNK_WIDTH` grid of per-column values covering one chunk footprint.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnGrid<T> {
    values: Vec<T>,
}

/// Height samples for one chunk footprint.
pub type HeightField = ColumnGrid<ColumnSample>;

/// Tree density for one chunk footprint; each value lies in `[0, 1]`.
pub type DensityField = ColumnGrid<f32>;

impl<T: Copy> ColumnGrid<T> {
    /// Builds a grid by evaluating `sample` at every local column `(x, z)`.
    pub fn from_fn(mut sample: impl FnMut(usize, usize) -> T) -> Self {
        let width = CHUNK_WIDTH as usize;
        let mut values = Vec::with_capacity(width * width);
        for x in 0..width {
            for z in 0..width {
                values.push(sample(x, z));
            }
        }
        ColumnGrid { values }
    }

    /// Value at local column `(x, z)`.
    ///
    /// # Panics
    /// Panics if either coordinate is outside the chunk footprint.
    pub fn get(&self, x: usize, z: usize) -> T {
        self.values[x * CHUNK_WIDTH as usize + z]
    }
}

/// The external terrain generator the world samples from.
///
/// Implementations must be deterministic for a fixed seed.
pub trait TerrainGenerator {
    /// The seed the generator was constructed with.
    fn seed(&self) -> u64;

    /// Height samples for the chunk footprint whose minimum corner is `origin` (x, z).
    fn height_field(&self, origin: Point2<i32>) -> HeightField;

    /// Biome value in `[0, 1]` for a single world column; low values are desert.
    fn biome(&self, column: Point2<i32>) -> f32;

    /// Tree density for the chunk footprint whose minimum corner is `origin` (x, z).
    fn tree_density(&self, origin: Point2<i32>) -> DensityField;
}

impl<T: TerrainGenerator + ?Sized> TerrainGenerator for Box<T> {
    fn seed(&self) -> u64 {
        (**self).seed()
    }

    fn height_field(&self, origin: Point2<i32>) -> HeightField {
        (**self).height_field(origin)
    }

    fn biome(&self, column: Point2<i32>) -> f32 {
        (**self).biome(column)
    }

    fn tree_density(&self, origin: Point2<i32>) -> DensityField {
        (**self).tree_density(origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_grid_is_indexed_by_local_column() {
        let grid = ColumnGrid::from_fn(|x, z| (x * 100 + z) as f32);
        assert_eq!(grid.get(0, 0), 0.0);
        assert_eq!(grid.get(3, 7), 307.0);
        assert_eq!(grid.get(15, 15), 1515.0);
    }

    #[test]
    fn heights_clamp_to_world_bounds() {
        let bounds = WorldBounds {
            bedrock: 0,
            ground: 100,
            max_height: 200,
        };
        assert_eq!(bounds.clamp_height(-5), 0);
        assert_eq!(bounds.clamp_height(150), 150);
        assert_eq!(bounds.clamp_height(250), 200);
    }
}
