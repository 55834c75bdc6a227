//! # Chunk Creation Module
//!
//! Fills a freshly allocated chunk from its footprint's height sample.
//!
//! Each column is stratified from the bottom up:
//! - the `bedrock` layer
//! - stone
//! - `SOIL_DEPTH` voxels of soil (dirt, or sand under a sand surface)
//! - the column's surface material as the topmost solid voxel
//!
//! Everything at or above the column height stays inactive air.

use cgmath::Point3;

use crate::engine_state::voxels::block::{block_type::BlockType, Block};
use crate::engine_state::voxels::generation::{ColumnSample, HeightField, WorldBounds};

use super::{Chunk, CHUNK_HEIGHT, CHUNK_WIDTH};

/// Number of soil voxels between the surface voxel and the stone below it.
pub const SOIL_DEPTH: i32 = 3;

/// Chooses the block for world height `y` in a column of the given sample.
fn stratum(y: i32, surface: i32, column: &ColumnSample, bounds: &WorldBounds) -> Block {
    if y < bounds.bedrock || y >= surface {
        return Block::default();
    }

    let block_type = if y == bounds.bedrock {
        BlockType::BEDROCK
    } else if y == surface - 1 {
        column.material
    } else if y >= surface - 1 - SOIL_DEPTH {
        match column.material {
            BlockType::SAND => BlockType::SAND,
            _ => BlockType::DIRT,
        }
    } else {
        BlockType::STONE
    };

    Block::new(block_type, true)
}

/// Populates every block's active flag and material by comparing its world y
/// to the terrain height of its column.
pub(super) fn fill_terrain(chunk: &mut Chunk, heights: &HeightField, bounds: &WorldBounds) {
    let origin = chunk.origin;
    for x in 0..CHUNK_WIDTH as usize {
        for z in 0..CHUNK_WIDTH as usize {
            let column = heights.get(x, z);
            let surface = bounds.clamp_height(column.height);
            for y in 0..CHUNK_HEIGHT as usize {
                let world_y = origin.y + y as i32;
                *chunk.block_mut(Point3::new(x, y, z)) = stratum(world_y, surface, &column, bounds);
            }
        }
    }
}
