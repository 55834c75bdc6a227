//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a dense `CHUNK_WIDTH` x `CHUNK_HEIGHT` x
//! `CHUNK_WIDTH` grid of blocks plus the handle of the GPU resource that draws it.
//!
//! ## Coordinates
//!
//! A chunk is identified by its origin, the world coordinate of its minimum
//! corner. Origins are always multiples of the chunk dimensions on every axis,
//! and any world voxel maps to exactly one (origin, local offset) pair with a
//! non-negative offset, see [`Chunk::locate`].
//!
//! ## Lifecycle
//!
//! 1. `Chunk::new` allocates an all-air grid and a GPU handle
//! 2. `init` fills terrain from a height sample
//! 3. `buffer` meshes the grid and uploads it; repeat after every mutation
//! 4. `destroy` releases the GPU handle and consumes the chunk

use cgmath::{Point3, Vector3};

use super::block::Block;
use super::generation::{HeightField, WorldBounds};
use crate::engine_state::camera_state::camera::Camera;
use crate::engine_state::rendering::{
    meshing::Mesh, ChunkRenderer, GpuHandle, Light, TargetBlock,
};

mod chunk_creation;
pub mod chunk_iteration;

use chunk_iteration::ChunkBlockIterator;

/// The horizontal (x and z) dimension of a chunk in blocks.
pub const CHUNK_WIDTH: i32 = 16;
/// The vertical dimension of a chunk in blocks.
pub const CHUNK_HEIGHT: i32 = 256;
/// The number of blocks in a single horizontal plane of a chunk.
pub const CHUNK_PLANE_SIZE: usize = (CHUNK_WIDTH * CHUNK_WIDTH) as usize;
/// The total number of blocks in a chunk.
pub const CHUNK_SIZE: usize = CHUNK_PLANE_SIZE * CHUNK_HEIGHT as usize;

/// Represents a fixed-size cuboid of voxel blocks in the world.
///
/// The chunk owns its block array exclusively. Blocks are stored in y-major
/// order (`y`, then `z`, then `x`) so a horizontal plane is contiguous.
pub struct Chunk {
    /// The world coordinate of this chunk's minimum corner.
    origin: Point3<i32>,

    /// Every block of the chunk, `CHUNK_SIZE` entries.
    blocks: Vec<Block>,

    /// The GPU resource that draws this chunk.
    gpu_handle: GpuHandle,
}

impl Chunk {
    /// Creates an all-air chunk at `origin` and allocates its GPU resource.
    ///
    /// # Panics
    /// Panics if `origin` is not aligned to the chunk grid.
    pub fn new<R: ChunkRenderer + ?Sized>(origin: Point3<i32>, renderer: &mut R) -> Self {
        assert!(
            Self::is_aligned(origin),
            "invalid chunk origin {:?}: not a multiple of ({}, {}, {})",
            origin,
            CHUNK_WIDTH,
            CHUNK_HEIGHT,
            CHUNK_WIDTH
        );

        Chunk {
            origin,
            blocks: vec![Block::default(); CHUNK_SIZE],
            gpu_handle: renderer.create(origin),
        }
    }

    /// Whether `origin` lies on the chunk grid.
    pub fn is_aligned(origin: Point3<i32>) -> bool {
        origin.x % CHUNK_WIDTH == 0 && origin.y % CHUNK_HEIGHT == 0 && origin.z % CHUNK_WIDTH == 0
    }

    /// Splits a world voxel coordinate into the origin of the chunk that owns
    /// it and the voxel's offset inside that chunk.
    ///
    /// The offset is always in `[0, dimension)`, so negative coordinates
    /// resolve to the chunk below them: `-1` lands at offset `CHUNK_WIDTH - 1`
    /// of the chunk whose origin is `-CHUNK_WIDTH`.
    pub fn locate(voxel: Point3<i32>) -> (Point3<i32>, Point3<usize>) {
        let offset = Vector3::new(
            voxel.x.rem_euclid(CHUNK_WIDTH),
            voxel.y.rem_euclid(CHUNK_HEIGHT),
            voxel.z.rem_euclid(CHUNK_WIDTH),
        );
        let origin = voxel - offset;
        (
            origin,
            Point3::new(offset.x as usize, offset.y as usize, offset.z as usize),
        )
    }

    /// The world coordinate of this chunk's minimum corner.
    pub fn origin(&self) -> Point3<i32> {
        self.origin
    }

    /// The handle of the GPU resource drawing this chunk.
    pub fn gpu_handle(&self) -> GpuHandle {
        self.gpu_handle
    }

    /// The volumetric center of the chunk in world space.
    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.origin.x + CHUNK_WIDTH / 2) as f32,
            (self.origin.y + CHUNK_HEIGHT / 2) as f32,
            (self.origin.z + CHUNK_WIDTH / 2) as f32,
        )
    }

    fn index(local: Point3<usize>) -> usize {
        (local.y * CHUNK_WIDTH as usize + local.z) * CHUNK_WIDTH as usize + local.x
    }

    /// Gets a reference to the block at the specified chunk-relative coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn block(&self, local: Point3<usize>) -> &Block {
        &self.blocks[Self::index(local)]
    }

    /// Gets a mutable reference to the block at the specified chunk-relative coordinates.
    ///
    /// Mutations are not visible on screen until the chunk is buffered again.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn block_mut(&mut self, local: Point3<usize>) -> &mut Block {
        &mut self.blocks[Self::index(local)]
    }

    /// Checks whether the block at the specified chunk-relative coordinates is active.
    ///
    /// Coordinates outside the chunk count as inactive.
    pub fn is_block_active(&self, x: i32, y: i32, z: i32) -> bool {
        if !(0..CHUNK_WIDTH).contains(&x)
            || !(0..CHUNK_HEIGHT).contains(&y)
            || !(0..CHUNK_WIDTH).contains(&z)
        {
            return false;
        }
        self.block(Point3::new(x as usize, y as usize, z as usize))
            .is_active()
    }

    /// Iterates over every active block together with its local position.
    pub fn active_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    /// Populates every block from the chunk footprint's height sample.
    pub fn init(&mut self, heights: &HeightField, bounds: &WorldBounds) {
        chunk_creation::fill_terrain(self, heights, bounds);
    }

    /// Meshes the current block grid and uploads it to the chunk's GPU resource.
    ///
    /// Writing a block does not re-buffer automatically; call this again to
    /// make mutations visible.
    pub fn buffer<R: ChunkRenderer + ?Sized>(&self, renderer: &mut R) {
        let mesh = Mesh::from_chunk(self);
        renderer.upload(self.gpu_handle, &mesh);
    }

    /// Issues the draw for this chunk.
    ///
    /// `target` is the highlighted block, passed only when it lies in this chunk.
    pub fn draw<R: ChunkRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        target: Option<&TargetBlock>,
        camera: &Camera,
        light: &Light,
    ) {
        renderer.draw(self.gpu_handle, target, camera, light);
    }

    /// Releases the GPU resource. Consuming `self` makes a second release impossible.
    pub fn destroy<R: ChunkRenderer + ?Sized>(self, renderer: &mut R) {
        renderer.release(self.gpu_handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::headless::HeadlessRenderer;

    #[test]
    fn locate_keeps_offsets_non_negative() {
        let (origin, local) = Chunk::locate(Point3::new(-1, 0, -1));
        assert_eq!(origin, Point3::new(-CHUNK_WIDTH, 0, -CHUNK_WIDTH));
        assert_eq!(
            local,
            Point3::new(CHUNK_WIDTH as usize - 1, 0, CHUNK_WIDTH as usize - 1)
        );

        let (origin, local) = Chunk::locate(Point3::new(17, 300, -16));
        assert_eq!(origin, Point3::new(16, CHUNK_HEIGHT, -16));
        assert_eq!(local, Point3::new(1, 300 - CHUNK_HEIGHT as usize, 0));
    }

    #[test]
    fn located_origins_are_aligned() {
        for voxel in [
            Point3::new(0, 0, 0),
            Point3::new(-33, -1, 47),
            Point3::new(i32::MIN / 2, 5, 1023),
        ] {
            let (origin, local) = Chunk::locate(voxel);
            assert!(Chunk::is_aligned(origin));
            assert_eq!(
                origin + Vector3::new(local.x as i32, local.y as i32, local.z as i32),
                voxel
            );
        }
    }

    #[test]
    #[should_panic(expected = "invalid chunk origin")]
    fn new_rejects_misaligned_origin() {
        let mut renderer = HeadlessRenderer::new();
        let _ = Chunk::new(Point3::new(3, 0, 0), &mut renderer);
    }

    #[test]
    fn destroy_releases_the_gpu_handle() {
        let mut renderer = HeadlessRenderer::new();
        let chunk = Chunk::new(Point3::new(0, 0, 16), &mut renderer);
        let handle = chunk.gpu_handle();
        chunk.buffer(&mut renderer);
        assert!(renderer.is_live(handle));

        chunk.destroy(&mut renderer);
        assert!(!renderer.is_live(handle));
        assert_eq!(renderer.live_count(), 0);
    }
}
