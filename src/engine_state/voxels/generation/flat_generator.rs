//! Constant terrain with hand-placed tree columns.

use cgmath::Point2;

use crate::engine_state::voxels::block::block_type::BlockType;

use super::{ColumnGrid, ColumnSample, DensityField, HeightField, TerrainGenerator};

/// A generator whose every column has the same height, material and biome.
///
/// Tree density is `tree_density` on the columns listed in `tree_columns` and
/// zero everywhere else, which makes tree placement fully predictable.
#[derive(Clone, Debug)]
pub struct FlatGenerator {
    pub seed: u64,
    pub column: ColumnSample,
    pub biome: f32,
    pub tree_density: f32,
    pub tree_columns: Vec<Point2<i32>>,
}

impl FlatGenerator {
    pub fn new(seed: u64, height: i32, material: BlockType) -> Self {
        FlatGenerator {
            seed,
            column: ColumnSample { height, material },
            biome: 1.0,
            tree_density: 0.0,
            tree_columns: Vec::new(),
        }
    }

    pub fn with_biome(mut self, biome: f32) -> Self {
        self.biome = biome;
        self
    }

    /// Places a tree candidate of the given density on a world column.
    pub fn with_tree(mut self, column: Point2<i32>, density: f32) -> Self {
        self.tree_columns.push(column);
        self.tree_density = density;
        self
    }
}

impl TerrainGenerator for FlatGenerator {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn height_field(&self, _origin: Point2<i32>) -> HeightField {
        ColumnGrid::from_fn(|_, _| self.column)
    }

    fn biome(&self, _column: Point2<i32>) -> f32 {
        self.biome
    }

    fn tree_density(&self, origin: Point2<i32>) -> DensityField {
        ColumnGrid::from_fn(|x, z| {
            let column = Point2::new(origin.x + x as i32, origin.y + z as i32);
            if self.tree_columns.contains(&column) {
                self.tree_density
            } else {
                0.0
            }
        })
    }
}
