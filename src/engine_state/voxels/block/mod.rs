//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel world.
//! It includes block material definitions, block face handling, and the block
//! record stored in every chunk slot.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Maps each block type to its texture indices for each face.
///
/// The outer array is indexed by `BlockType` as a `usize`.
/// The inner array contains 6 texture indices, one for each face in the order:
/// [Front, Back, Bottom, Top, Left, Right]
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [[usize; 6]; BlockType::COUNT] = [
    [0, 0, 0, 0, 0, 0],       // AIR (never meshed)
    [1, 1, 1, 1, 1, 1],       // BEDROCK
    [2, 2, 2, 2, 2, 2],       // STONE
    [3, 3, 3, 3, 3, 3],       // DIRT
    [4, 4, 3, 5, 4, 4],       // GRASS (top: 5, bottom: dirt, sides: 4)
    [6, 6, 6, 6, 6, 6],       // SAND
    [7, 7, 8, 8, 7, 7],       // WOOD (rings on top and bottom)
    [9, 9, 10, 10, 9, 9],     // DARK_WOOD
    [11, 11, 12, 12, 11, 11], // WHITE_WOOD
    [13, 13, 14, 14, 13, 13], // CACTUS
    [15, 15, 15, 15, 15, 15], // LEAVES
];

/// Represents a single voxel block in the world.
///
/// Blocks are never allocated individually: they live in their chunk's dense
/// array and die with it. A block's world position is derived from its slot
/// and the owning chunk's origin, so it is not stored here.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute and byte-sized fields keep the block `Pod`, so a
/// chunk's block array can be handed to the GPU or hashed as raw bytes.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    block_type: BlockTypeSize,
    /// Non-zero when the block renders and collides.
    active: u8,
}

impl Default for Block {
    fn default() -> Self {
        Block::new(BlockType::AIR, false)
    }
}

impl Block {
    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType, active: bool) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
            active: active as u8,
        }
    }

    /// The material of this block.
    pub fn block_type(&self) -> BlockType {
        BlockType::get_block_type_from_int(self.block_type)
    }

    /// Changes the material without touching the active flag.
    pub fn set_block_type(&mut self, block_type: BlockType) {
        self.block_type = block_type as BlockTypeSize;
    }

    /// Whether the block renders and collides.
    pub fn is_active(&self) -> bool {
        self.active != 0
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active as u8;
    }

    /// Activates the block and assigns it a material in one step.
    pub fn place(&mut self, block_type: BlockType) {
        self.set_active(true);
        self.set_block_type(block_type);
    }

    /// Gets the texture indices for all faces of a block given its type as an integer.
    pub fn get_texture_indices_from_int(btype_int: BlockTypeSize) -> [usize; 6] {
        let block_type = BlockType::get_block_type_from_int(btype_int);
        BLOCK_TYPE_TO_TEXTURE_INDICES[block_type as usize]
    }

    /// Texture indices for all faces of this block.
    pub fn texture_indices(&self) -> [usize; 6] {
        Self::get_texture_indices_from_int(self.block_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_activates_and_sets_material() {
        let mut block = Block::default();
        assert!(!block.is_active());
        assert_eq!(block.block_type(), BlockType::AIR);

        block.place(BlockType::CACTUS);
        assert!(block.is_active());
        assert_eq!(block.block_type(), BlockType::CACTUS);
    }

    #[test]
    fn grass_uses_dirt_texture_underneath() {
        let grass = Block::new(BlockType::GRASS, true);
        let dirt = Block::new(BlockType::DIRT, true);
        assert_eq!(grass.texture_indices()[2], dirt.texture_indices()[2]);
        assert_ne!(grass.texture_indices()[3], dirt.texture_indices()[3]);
    }
}
