//! Tree placement, the deferred second pass of chunk generation.
//!
//! Every column of a chunk whose tree density exceeds `TREE_DENSITY_THRESHOLD`
//! grows a tree on its ground block: a trunk, then a stepped canopy unless the
//! column is desert. Canopies may overhang into neighbouring chunks, which are
//! spawned on demand.

use cgmath::{Point2, Point3, Vector3};

use crate::engine_state::rendering::ChunkRenderer;
use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::chunk::{Chunk, CHUNK_WIDTH};
use crate::engine_state::voxels::generation::TerrainGenerator;

use super::World;

/// Columns with a density at or below this grow nothing.
pub const TREE_DENSITY_THRESHOLD: f32 = 0.65;
/// Trunk voxels stacked on the ground block.
pub const TRUNK_HEIGHT: i32 = 7;
/// Columns with a biome value at or below this grow no canopy; below it, cactus.
pub const DESERT_BIOME: f32 = 0.4;
pub const LARGE_CANOPY_WIDTH: i32 = 5;
pub const SMALL_CANOPY_WIDTH: i32 = 3;
/// Most canopy layers a tree grows, each two voxels narrower than the one below.
pub const CANOPY_LAYERS: i32 = 3;

/// Trunk material for a tree of the given biome and density.
///
/// Deserts grow cactus. Elsewhere the parity of the density's leading decimal
/// digits picks the wood; `density * 100.0` and `density * 1000.0` are
/// truncated toward zero, not rounded, before the parity test.
pub fn trunk_material(biome: f32, density: f32) -> BlockType {
    if biome < DESERT_BIOME {
        BlockType::CACTUS
    } else if (density * 100.0) as i32 % 2 == 0 {
        BlockType::DARK_WOOD
    } else if (density * 1000.0) as i32 % 2 == 0 {
        BlockType::WHITE_WOOD
    } else {
        BlockType::WOOD
    }
}

/// The per-chunk source of the small/large tree draw; each non-desert tree
/// takes one `f64()` and is small when it exceeds 0.5.
pub fn small_tree_rng(seed: u64, origin: Point3<i32>) -> fastrand::Rng {
    fastrand::Rng::with_seed(seed.wrapping_add_signed(origin.x as i64))
}

impl<G: TerrainGenerator, R: ChunkRenderer> World<G, R> {
    /// Grows the trees of the chunk at `origin`.
    ///
    /// Returns the origins of every chunk a tree block was written to, the
    /// chunk itself first; those chunks need buffering again. Does nothing for
    /// a chunk that is not resident.
    pub fn spawn_trees(&mut self, origin: Point3<i32>) -> Vec<Point3<i32>> {
        if !self.chunks.contains(origin) {
            return Vec::new();
        }

        let density = self
            .generator
            .tree_density(Point2::new(origin.x, origin.z));
        let mut small_tree_rng = small_tree_rng(self.generator.seed(), origin);
        let mut touched = vec![origin];

        for x in 0..CHUNK_WIDTH as usize {
            for z in 0..CHUNK_WIDTH as usize {
                let probability = density.get(x, z);
                if probability <= TREE_DENSITY_THRESHOLD {
                    continue;
                }

                let (world_x, world_z) = (origin.x + x as i32, origin.z + z as i32);
                let Some(ground) = self.ground(world_x, world_z) else {
                    continue;
                };
                let base = ground.position;
                let biome = self.generator.biome(Point2::new(world_x, world_z));

                let trunk = trunk_material(biome, probability);
                for i in 1..=TRUNK_HEIGHT {
                    self.place_tree_block(base + Vector3::new(0, i, 0), trunk, &mut touched);
                }

                if biome <= DESERT_BIOME {
                    continue;
                }

                let small = small_tree_rng.f64() > 0.5;
                self.place_canopy(base, small, &mut touched);
            }
        }

        touched
    }

    /// Places a stepped canopy whose top layer sits on the trunk top.
    ///
    /// The top layer is always leaves and caps the trunk. Below it, a large
    /// tree's centre column stays wood; every other canopy voxel is leaves.
    fn place_canopy(&mut self, base: Point3<i32>, small: bool, touched: &mut Vec<Point3<i32>>) {
        let width = if small {
            SMALL_CANOPY_WIDTH
        } else {
            LARGE_CANOPY_WIDTH
        };
        // layers narrow by two until the width would reach zero
        let layers = ((width + 1) / 2).min(CANOPY_LAYERS);
        let bottom = base.y + TRUNK_HEIGHT - (layers - 1);

        for layer in 0..layers {
            let half = (width - 2 * layer) / 2;
            let y = bottom + layer;
            let top = layer == layers - 1;

            for dx in -half..=half {
                for dz in -half..=half {
                    let centre = dx == 0 && dz == 0;
                    let block_type = if centre && !small && !top {
                        BlockType::WOOD
                    } else {
                        BlockType::LEAVES
                    };
                    self.place_tree_block(
                        Point3::new(base.x + dx, y, base.z + dz),
                        block_type,
                        touched,
                    );
                }
            }
        }
    }

    fn place_tree_block(
        &mut self,
        voxel: Point3<i32>,
        block_type: BlockType,
        touched: &mut Vec<Point3<i32>>,
    ) {
        self.get_or_spawn_voxel(voxel).place(block_type);
        let (origin, _) = Chunk::locate(voxel);
        if !touched.contains(&origin) {
            touched.push(origin);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::engine_state::rendering::headless::HeadlessRenderer;
    use crate::engine_state::voxels::block::Block;
    use crate::engine_state::voxels::generation::FlatGenerator;

    fn forest(generator: FlatGenerator) -> World<FlatGenerator, HeadlessRenderer> {
        let mut world = World::new(WorldConfig::default(), generator, HeadlessRenderer::new());
        world.spawn_chunk(Point3::new(0, 0, 0));
        world
    }

    fn block_at(world: &mut World<FlatGenerator, HeadlessRenderer>, x: i32, y: i32, z: i32) -> Block {
        *world.get_or_spawn_voxel(Point3::new(x, y, z))
    }

    #[test]
    fn trunk_material_follows_biome_and_density() {
        assert_eq!(trunk_material(0.3, 0.9), BlockType::CACTUS);
        assert_eq!(trunk_material(0.9, 0.805), BlockType::DARK_WOOD);
        assert_eq!(trunk_material(0.9, 0.8125), BlockType::WHITE_WOOD);
        assert_eq!(trunk_material(0.9, 0.8135), BlockType::WOOD);
        assert_eq!(trunk_material(0.4, 0.8135), BlockType::WOOD);
    }

    /// Grows one tree on ground height 5 at local column (8, 8) of the first
    /// chunk along +X whose seeded draw gives the requested size.
    fn single_tree(small: bool) -> (World<FlatGenerator, HeadlessRenderer>, i32) {
        let origin = (0..64)
            .map(|i| Point3::new(i * CHUNK_WIDTH, 0, 0))
            .find(|&origin| (small_tree_rng(10, origin).f64() > 0.5) == small)
            .expect("seeded draws cover both sizes");
        let generator = FlatGenerator::new(10, 5, BlockType::GRASS)
            .with_tree(Point2::new(origin.x + 8, 8), 0.8125);
        let mut world = World::new(WorldConfig::default(), generator, HeadlessRenderer::new());
        world.spawn_chunk(origin);
        assert_eq!(world.spawn_trees(origin), vec![origin]);
        (world, origin.x + 8)
    }

    fn centre_column(world: &mut World<FlatGenerator, HeadlessRenderer>, x: i32) -> Vec<BlockType> {
        (5..=13).map(|y| block_at(world, x, y, 8).block_type()).collect()
    }

    #[test]
    fn small_tree_is_capped_by_leaves() {
        let (mut world, x) = single_tree(true);
        use BlockType::{AIR, LEAVES, WHITE_WOOD};
        assert_eq!(
            centre_column(&mut world, x),
            vec![WHITE_WOOD, WHITE_WOOD, WHITE_WOOD, WHITE_WOOD, WHITE_WOOD, LEAVES, LEAVES, AIR, AIR]
        );
        assert!(!block_at(&mut world, x, 12, 8).is_active());

        // bottom layer is 3 wide, top layer a single leaf
        assert_eq!(block_at(&mut world, x - 1, 10, 7).block_type(), LEAVES);
        assert!(!block_at(&mut world, x - 2, 10, 8).is_active());
        assert!(!block_at(&mut world, x - 1, 11, 8).is_active());
        assert!(!block_at(&mut world, x, 9, 9).is_active());
    }

    #[test]
    fn large_tree_keeps_a_wooden_core_under_its_cap() {
        let (mut world, x) = single_tree(false);
        use BlockType::{AIR, LEAVES, WHITE_WOOD, WOOD};
        assert_eq!(
            centre_column(&mut world, x),
            vec![WHITE_WOOD, WHITE_WOOD, WHITE_WOOD, WHITE_WOOD, WOOD, WOOD, LEAVES, AIR, AIR]
        );

        // layers are 5, 3 and 1 wide
        assert_eq!(block_at(&mut world, x - 2, 9, 6).block_type(), LEAVES);
        assert!(!block_at(&mut world, x - 3, 9, 8).is_active());
        assert_eq!(block_at(&mut world, x + 1, 10, 9).block_type(), LEAVES);
        assert!(!block_at(&mut world, x + 2, 10, 8).is_active());
        assert!(!block_at(&mut world, x + 1, 11, 8).is_active());
    }

    #[test]
    fn no_wood_above_the_top_canopy_layer() {
        for small in [true, false] {
            let (mut world, x) = single_tree(small);
            assert_eq!(block_at(&mut world, x, 11, 8).block_type(), BlockType::LEAVES);
            for y in 11..=20 {
                for dx in -2..=2 {
                    for dz in -2..=2 {
                        let block_type = block_at(&mut world, x + dx, y, 8 + dz).block_type();
                        assert!(
                            !matches!(
                                block_type,
                                BlockType::WOOD | BlockType::DARK_WOOD | BlockType::WHITE_WOOD
                            ),
                            "{:?} at ({}, {}, {})",
                            block_type,
                            x + dx,
                            y,
                            8 + dz
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn low_density_columns_stay_bare() {
        let generator =
            FlatGenerator::new(10, 5, BlockType::GRASS).with_tree(Point2::new(3, 3), 0.65);
        let mut world = forest(generator);
        world.spawn_trees(Point3::new(0, 0, 0));
        assert!(!block_at(&mut world, 3, 5, 3).is_active());
    }

    #[test]
    fn desert_trees_have_no_leaves() {
        for biome in [0.3, 0.4] {
            let generator = FlatGenerator::new(10, 5, BlockType::SAND)
                .with_biome(biome)
                .with_tree(Point2::new(8, 8), 0.9);
            let mut world = forest(generator);
            world.spawn_trees(Point3::new(0, 0, 0));

            let chunk = world.chunk(Point3::new(0, 0, 0)).expect("chunk is resident");
            assert!(chunk
                .active_blocks()
                .all(|(_, block)| block.block_type() != BlockType::LEAVES));
            let trunk = block_at(&mut world, 8, 5, 8).block_type();
            if biome < DESERT_BIOME {
                assert_eq!(trunk, BlockType::CACTUS);
            } else {
                assert_ne!(trunk, BlockType::CACTUS);
            }
        }
    }

    #[test]
    fn canopy_overhang_spawns_the_neighbour() {
        let generator =
            FlatGenerator::new(10, 5, BlockType::GRASS).with_tree(Point2::new(15, 8), 0.9);
        let mut world = forest(generator);
        let touched = world.spawn_trees(Point3::new(0, 0, 0));

        assert!(touched.contains(&Point3::new(16, 0, 0)));
        assert!(world.chunk(Point3::new(16, 0, 0)).is_some());
        assert_eq!(block_at(&mut world, 16, 10, 8).block_type(), BlockType::LEAVES);
    }

    #[test]
    fn stale_chunk_grows_nothing() {
        let mut world = forest(FlatGenerator::new(10, 5, BlockType::GRASS));
        assert!(world.spawn_trees(Point3::new(64, 0, 0)).is_empty());
        assert!(world.chunk(Point3::new(64, 0, 0)).is_none());
    }
}
