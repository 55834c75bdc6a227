//! # Chunk Iteration Module
//!
//! This module provides an iterator over the active blocks of a chunk, in
//! storage order, together with their chunk-relative positions.

use cgmath::Point3;

use crate::engine_state::voxels::block::Block;

use super::{Chunk, CHUNK_HEIGHT, CHUNK_WIDTH};

/// An iterator over all active blocks in a chunk.
///
/// Positions advance x fastest, then z, then y, matching the chunk's storage
/// layout. Inactive blocks are skipped.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Current X position within the chunk
    local_x: usize,
    /// Current Y position within the chunk
    local_y: usize,
    /// Current Z position within the chunk
    local_z: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    /// Moves to the next slot; returns false once the whole chunk was visited.
    fn advance(&mut self) -> bool {
        self.local_x += 1;
        if self.local_x == CHUNK_WIDTH as usize {
            self.local_x = 0;
            self.local_z += 1;
            if self.local_z == CHUNK_WIDTH as usize {
                self.local_z = 0;
                self.local_y += 1;
            }
        }
        self.local_y < CHUNK_HEIGHT as usize
    }
}

impl<'a> Iterator for ChunkBlockIterator<'a> {
    type Item = (Point3<usize>, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        while self.local_y < CHUNK_HEIGHT as usize {
            let position = Point3::new(self.local_x, self.local_y, self.local_z);
            let block = self.chunk_ref.block(position);
            self.advance();
            if block.is_active() {
                return Some((position, block));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::headless::HeadlessRenderer;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn yields_only_active_blocks_in_storage_order() {
        let mut renderer = HeadlessRenderer::new();
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), &mut renderer);
        chunk.block_mut(Point3::new(3, 9, 1)).place(BlockType::WOOD);
        chunk.block_mut(Point3::new(15, 0, 15)).place(BlockType::STONE);
        chunk.block_mut(Point3::new(0, 255, 0)).place(BlockType::LEAVES);

        let found: Vec<_> = chunk
            .active_blocks()
            .map(|(position, block)| (position, block.block_type()))
            .collect();

        assert_eq!(
            found,
            vec![
                (Point3::new(15, 0, 15), BlockType::STONE),
                (Point3::new(3, 9, 1), BlockType::WOOD),
                (Point3::new(0, 255, 0), BlockType::LEAVES),
            ]
        );
    }

    #[test]
    fn empty_chunk_yields_nothing() {
        let mut renderer = HeadlessRenderer::new();
        let chunk = Chunk::new(Point3::new(16, 0, 0), &mut renderer);
        assert_eq!(chunk.active_blocks().count(), 0);
    }
}
