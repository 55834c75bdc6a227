//! # World Module
//!
//! This module provides the `World` struct which owns every resident chunk and
//! coordinates chunk spawning, despawning, block access and deferred generation.
//!
//! ## Architecture
//!
//! The world is sparse: only chunks that something asked for are resident.
//! Any block lookup through `get_or_spawn_*` may spawn the owning chunk, which is
//! why those methods take `&mut self` even when the caller only reads.
//!
//! ## Per-tick flow
//!
//! 1. `spawn_radius` makes sure chunks exist on a ring around the viewpoint
//! 2. `process_tasks` runs a bounded number of deferred tree placements
//! 3. `near_chunks` returns the drawable chunks and evicts distant ones
//!
//! ## Chunk lifecycle
//!
//! Spawning samples terrain, fills the chunk, uploads its mesh right away so it
//! is drawable, and queues a task that places its trees and uploads again.
//! Despawning releases the GPU resource and drops the chunk. Tasks that target a
//! chunk which is no longer resident are skipped.

use cgmath::{Point2, Point3};
use log::{debug, info, trace};

use crate::config::WorldConfig;
use crate::engine_state::camera_state::camera::Camera;
use crate::engine_state::rendering::{ChunkRenderer, Light, TargetBlock};
use crate::engine_state::task_management::{
    task::{ChunkTask, ChunkTaskKind},
    TaskQueue,
};

use super::block::Block;
use super::chunk::{Chunk, CHUNK_HEIGHT, CHUNK_WIDTH};
use super::generation::{TerrainGenerator, WorldBounds};

pub mod chunk_index;
mod streaming;
mod trees;

use chunk_index::ChunkIndex;

/// A block together with the world voxel it occupies.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LocatedBlock {
    pub position: Point3<i32>,
    pub block: Block,
}

/// Represents the streamed voxel world.
///
/// Generic over the terrain source and the render collaborator so tests can
/// plug in deterministic terrain and a recording renderer.
pub struct World<G, R> {
    config: WorldConfig,
    bounds: WorldBounds,
    generator: G,
    renderer: R,
    chunks: ChunkIndex,
    tasks: TaskQueue<ChunkTask>,
}

impl<G: TerrainGenerator, R: ChunkRenderer> World<G, R> {
    /// Creates an empty world.
    ///
    /// # Arguments
    /// * `config` - Radii, bounds and task budget; assumed validated
    /// * `generator` - Terrain source sampled when chunks spawn
    /// * `renderer` - Receives chunk uploads, draws and releases
    pub fn new(config: WorldConfig, generator: G, renderer: R) -> Self {
        World {
            bounds: config.bounds(),
            config,
            generator,
            renderer,
            chunks: ChunkIndex::new(),
            tasks: TaskQueue::new(),
        }
    }

    /// Eagerly spawns a `player_spawn_radius` x `player_spawn_radius` grid of
    /// chunks starting at the world origin.
    pub fn init(&mut self) {
        let radius = self.config.player_spawn_radius;
        for i in 0..radius {
            for j in 0..radius {
                self.spawn_chunk(Point3::new(CHUNK_WIDTH * i, 0, CHUNK_WIDTH * j));
            }
        }
        info!(
            "world initialised with {} chunks, {} tasks pending",
            self.chunks.len(),
            self.tasks.len()
        );
    }

    /// Spawns the chunk at `origin`, or returns it if it is already resident.
    ///
    /// A new chunk is filled from the generator's height sample and buffered
    /// immediately, and a deferred tree placement task is queued for it.
    ///
    /// # Panics
    /// Panics if `origin` is not a multiple of the chunk dimensions.
    pub fn spawn_chunk(&mut self, origin: Point3<i32>) -> &mut Chunk {
        assert!(
            Chunk::is_aligned(origin),
            "invalid chunk origin {:?}: not a multiple of ({}, {}, {})",
            origin,
            CHUNK_WIDTH,
            CHUNK_HEIGHT,
            CHUNK_WIDTH
        );

        let Self {
            chunks,
            generator,
            renderer,
            tasks,
            bounds,
            ..
        } = self;

        chunks.get_or_insert_with(origin, || {
            let mut chunk = Chunk::new(origin, &mut *renderer);
            let heights = generator.height_field(Point2::new(origin.x, origin.z));
            chunk.init(&heights, bounds);
            chunk.buffer(&mut *renderer);
            tasks.publish_task(ChunkTask::place_trees_and_buffer(origin));
            trace!("spawned chunk at {:?}", origin);
            chunk
        })
    }

    /// Removes the chunk at `origin` and releases its GPU resource.
    ///
    /// Returns `false` if no chunk was resident there. Tasks still queued for
    /// the chunk become no-ops.
    pub fn despawn_chunk(&mut self, origin: Point3<i32>) -> bool {
        match self.chunks.delete(origin) {
            Some(chunk) => {
                chunk.destroy(&mut self.renderer);
                debug!("despawned chunk at {:?}", origin);
                true
            }
            None => false,
        }
    }

    /// Returns the block at an integer voxel coordinate, spawning its chunk if needed.
    pub fn get_or_spawn_voxel(&mut self, voxel: Point3<i32>) -> &mut Block {
        let (origin, local) = Chunk::locate(voxel);
        self.spawn_chunk(origin).block_mut(local)
    }

    /// Returns the block occupying a world-space position, spawning its chunk if needed.
    ///
    /// Each component is floored, so `-0.5` belongs to voxel `-1`, not voxel `0`.
    pub fn get_or_spawn_block(&mut self, position: Point3<f32>) -> &mut Block {
        let voxel = Point3::new(
            position.x.floor() as i32,
            position.y.floor() as i32,
            position.z.floor() as i32,
        );
        self.get_or_spawn_voxel(voxel)
    }

    /// Finds the topmost active block of column `(x, z)`.
    ///
    /// Only the chunk at height zero is scanned, from `CHUNK_HEIGHT - 1` down to
    /// zero; a surface in a chunk stacked above or below is not found.
    /// Spawns the column's chunk if needed.
    pub fn ground(&mut self, x: i32, z: i32) -> Option<LocatedBlock> {
        let (origin, local) = Chunk::locate(Point3::new(x, 0, z));
        let chunk = self.spawn_chunk(origin);
        (0..CHUNK_HEIGHT as usize).rev().find_map(|y| {
            let block = *chunk.block(Point3::new(local.x, y, local.z));
            block.is_active().then(|| LocatedBlock {
                position: Point3::new(x, origin.y + y as i32, z),
                block,
            })
        })
    }

    /// Runs at most `tasks_per_frame` deferred tasks, oldest first.
    ///
    /// Returns how many tasks were popped, including stale ones that did nothing.
    pub fn process_tasks(&mut self) -> usize {
        let mut tasks_run = 0;
        while tasks_run < self.config.tasks_per_frame {
            let Some(task) = self.tasks.pop_task() else {
                break;
            };
            self.run_task(task);
            tasks_run += 1;
        }
        tasks_run
    }

    fn run_task(&mut self, task: ChunkTask) {
        if !self.chunks.contains(task.origin) {
            debug!("skipping {:?} for despawned chunk {:?}", task.kind, task.origin);
            return;
        }

        match task.kind {
            ChunkTaskKind::PlaceTreesAndBuffer => {
                let touched = self.spawn_trees(task.origin);
                for origin in touched {
                    if let Some(chunk) = self.chunks.get(origin) {
                        chunk.buffer(&mut self.renderer);
                    }
                }
            }
        }
    }

    /// Draws the chunk at `origin` if it is resident.
    ///
    /// `target` is forwarded only when it lies inside this chunk.
    pub fn draw_chunk(
        &mut self,
        origin: Point3<i32>,
        target: Option<&TargetBlock>,
        camera: &Camera,
        light: &Light,
    ) -> bool {
        let Some(chunk) = self.chunks.get(origin) else {
            return false;
        };
        let target = target.filter(|target| Chunk::locate(target.position).0 == origin);
        chunk.draw(&mut self.renderer, target, camera, light);
        true
    }

    pub fn chunk(&self, origin: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(origin)
    }

    /// Origins of every resident chunk, in unspecified order.
    pub fn chunk_origins(&self) -> Vec<Point3<i32>> {
        self.chunks.origins()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of deferred tasks waiting to run.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::headless::HeadlessRenderer;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::generation::FlatGenerator;

    fn flat_world(height: i32) -> World<FlatGenerator, HeadlessRenderer> {
        World::new(
            WorldConfig::default(),
            FlatGenerator::new(10, height, BlockType::GRASS),
            HeadlessRenderer::new(),
        )
    }

    #[test]
    fn spawn_buffers_immediately_and_queues_trees() {
        let mut world = flat_world(5);
        let handle = world.spawn_chunk(Point3::new(0, 0, 0)).gpu_handle();
        assert_eq!(world.renderer().uploads(handle), 1);
        assert_eq!(world.pending_tasks(), 1);

        world.spawn_chunk(Point3::new(0, 0, 0));
        assert_eq!(world.chunk_count(), 1);
        assert_eq!(world.pending_tasks(), 1);
    }

    #[test]
    fn despawn_releases_the_gpu_resource() {
        let mut world = flat_world(5);
        let handle = world.spawn_chunk(Point3::new(16, 0, 0)).gpu_handle();
        assert!(world.despawn_chunk(Point3::new(16, 0, 0)));
        assert!(!world.renderer().is_live(handle));
        assert!(!world.despawn_chunk(Point3::new(16, 0, 0)));
    }

    #[test]
    fn block_lookup_floors_fractional_positions() {
        let mut world = flat_world(5);
        world.get_or_spawn_block(Point3::new(-0.5, 3.9, 0.2));
        assert!(world.chunk(Point3::new(-16, 0, 0)).is_some());
        assert!(world.chunk(Point3::new(0, 0, 0)).is_none());
    }

    #[test]
    fn ground_reports_the_surface_voxel() {
        let mut world = flat_world(5);
        let ground = world.ground(-3, 40).expect("flat terrain has a surface");
        assert_eq!(ground.position, Point3::new(-3, 4, 40));
        assert_eq!(ground.block.block_type(), BlockType::GRASS);
    }

    #[test]
    fn ground_is_absent_for_empty_columns() {
        let mut world = World::new(
            WorldConfig::default(),
            FlatGenerator::new(10, 0, BlockType::GRASS),
            HeadlessRenderer::new(),
        );
        assert!(world.ground(1, 1).is_none());
    }

    #[test]
    fn init_spawns_the_start_grid() {
        let config = WorldConfig {
            player_spawn_radius: 3,
            ..WorldConfig::default()
        };
        let mut world = World::new(
            config,
            FlatGenerator::new(10, 5, BlockType::GRASS),
            HeadlessRenderer::new(),
        );
        world.init();
        assert_eq!(world.chunk_count(), 9);
        assert!(world.chunk(Point3::new(32, 0, 32)).is_some());
        assert!(world.chunk(Point3::new(48, 0, 0)).is_none());
    }

    #[test]
    fn tree_task_buffers_the_neighbour_its_canopy_reached() {
        let config = WorldConfig {
            tasks_per_frame: 1,
            ..WorldConfig::default()
        };
        let generator =
            FlatGenerator::new(10, 5, BlockType::GRASS).with_tree(Point2::new(15, 8), 0.9);
        let mut world = World::new(config, generator, HeadlessRenderer::new());
        let own = world.spawn_chunk(Point3::new(0, 0, 0)).gpu_handle();
        let neighbour = world.spawn_chunk(Point3::new(16, 0, 0)).gpu_handle();
        assert_eq!(world.renderer().uploads(neighbour), 1);

        // only the tree-bearing chunk's task runs
        assert_eq!(world.process_tasks(), 1);
        assert_eq!(world.renderer().uploads(own), 2);
        assert_eq!(world.renderer().uploads(neighbour), 2);
        assert_eq!(
            world.get_or_spawn_voxel(Point3::new(16, 10, 8)).block_type(),
            BlockType::LEAVES
        );
    }

    #[test]
    fn draw_forwards_target_only_to_its_chunk() {
        let mut world = flat_world(5);
        world.spawn_chunk(Point3::new(0, 0, 0));
        world.spawn_chunk(Point3::new(16, 0, 0));
        let target = TargetBlock {
            position: Point3::new(17, 4, 2),
        };
        let camera = Camera::default();
        let light = Light::default();

        assert!(world.draw_chunk(Point3::new(0, 0, 0), Some(&target), &camera, &light));
        assert!(world.draw_chunk(Point3::new(16, 0, 0), Some(&target), &camera, &light));
        assert!(!world.draw_chunk(Point3::new(32, 0, 0), Some(&target), &camera, &light));

        let draws = world.renderer().draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].target, None);
        assert_eq!(draws[1].target, Some(target));
    }
}
