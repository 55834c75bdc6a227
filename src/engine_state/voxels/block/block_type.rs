//! # Block Type Module
//!
//! This module defines the closed set of materials a voxel can carry.
//! It provides conversion to and from the compact integer storage format and
//! to and from the human-readable material names used in configuration files.

use std::fmt;

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block materials in the voxel world.
///
/// Terrain materials are assigned when a chunk is initialised from its height
/// sample; the wood, cactus and leaves materials are only ever placed by tree
/// generation. The `FromPrimitive` derive allows conversion from integers,
/// which is how blocks store their material.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An air block, which is non-solid and transparent.
    AIR,

    /// The indestructible floor of the world.
    BEDROCK,

    /// Deep terrain fill.
    STONE,

    /// Sub-surface soil under grassland.
    DIRT,

    /// Grassland surface.
    GRASS,

    /// Desert surface and sub-surface.
    SAND,

    /// A plain wooden trunk.
    WOOD,

    /// A dark bark trunk.
    DARK_WOOD,

    /// A birch-like pale trunk.
    WHITE_WOOD,

    /// Desert "trunk" placed instead of wood in dry biomes.
    CACTUS,

    /// Canopy foliage.
    LEAVES,
}

/// Material names as they appear in configuration and logs.
static BLOCK_TYPE_NAMES: phf::Map<&'static str, BlockType> = phf::phf_map! {
    "air" => BlockType::AIR,
    "bedrock" => BlockType::BEDROCK,
    "stone" => BlockType::STONE,
    "dirt" => BlockType::DIRT,
    "grass" => BlockType::GRASS,
    "sand" => BlockType::SAND,
    "wood" => BlockType::WOOD,
    "dark-wood" => BlockType::DARK_WOOD,
    "white-wood" => BlockType::WHITE_WOOD,
    "cactus" => BlockType::CACTUS,
    "leaves" => BlockType::LEAVES,
};

impl BlockType {
    /// Number of block type variants.
    pub const COUNT: usize = 11;

    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// Values that do not name a material decode as `AIR`; blocks only ever
    /// store values produced from a `BlockType`, so this never happens in practice.
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Self {
        num::FromPrimitive::from_u8(btype).unwrap_or(BlockType::AIR)
    }

    /// Looks up a material by its configuration name, e.g. `"dark-wood"`.
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_TYPE_NAMES.get(name).copied()
    }

    /// Returns the configuration name of this material.
    pub fn name(&self) -> &'static str {
        match self {
            BlockType::AIR => "air",
            BlockType::BEDROCK => "bedrock",
            BlockType::STONE => "stone",
            BlockType::DIRT => "dirt",
            BlockType::GRASS => "grass",
            BlockType::SAND => "sand",
            BlockType::WOOD => "wood",
            BlockType::DARK_WOOD => "dark-wood",
            BlockType::WHITE_WOOD => "white-wood",
            BlockType::CACTUS => "cactus",
            BlockType::LEAVES => "leaves",
        }
    }

    /// Whether this material is produced by tree generation.
    pub fn is_tree_material(&self) -> bool {
        matches!(
            self,
            BlockType::WOOD
                | BlockType::DARK_WOOD
                | BlockType::WHITE_WOOD
                | BlockType::CACTUS
                | BlockType::LEAVES
        )
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_to_their_material() {
        for value in 0..BlockType::COUNT as BlockTypeSize {
            let block_type = BlockType::get_block_type_from_int(value);
            assert_eq!(BlockType::from_name(block_type.name()), Some(block_type));
        }
        assert_eq!(BlockType::from_name("dark-wood"), Some(BlockType::DARK_WOOD));
        assert_eq!(BlockType::from_name("obsidian"), None);
    }

    #[test]
    fn out_of_range_integers_decode_as_air() {
        assert_eq!(BlockType::get_block_type_from_int(200), BlockType::AIR);
        assert_eq!(
            BlockType::get_block_type_from_int(BlockType::LEAVES as BlockTypeSize),
            BlockType::LEAVES
        );
    }
}
