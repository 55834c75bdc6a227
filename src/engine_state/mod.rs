//! # Engine State Module
//!
//! Drives the streamed world one tick at a time.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the world, camera and light and runs the per-tick flow
//! * `camera_state` - The camera that follows the viewpoint
//! * `rendering` - The render collaborator interface, renderers and meshing
//! * `task_management` - The deferred task queue
//! * `voxels` - Blocks, chunks, terrain generation and the world
//!
//! ## Tick
//!
//! Each tick spawns chunks around the viewpoint, runs a bounded batch of
//! deferred tasks, collects the drawable chunks (evicting distant ones), and
//! draws them. The block under the viewpoint is highlighted.

use cgmath::Point3;

use camera_state::CameraState;
use rendering::{ChunkRenderer, Light, TargetBlock};
use voxels::{generation::TerrainGenerator, world::World};

pub mod camera_state;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// What one tick did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Deferred tasks popped this tick
    pub tasks_run: usize,
    /// Chunks drawn this tick
    pub drawn: usize,
    /// Chunks resident after eviction
    pub resident: usize,
    /// Deferred tasks still queued
    pub pending_tasks: usize,
}

/// The main state container of the driver.
pub struct EngineState<G, R> {
    world: World<G, R>,
    camera_state: CameraState,
    light: Light,
}

impl<G: TerrainGenerator, R: ChunkRenderer> EngineState<G, R> {
    pub fn new(world: World<G, R>) -> Self {
        EngineState {
            world,
            camera_state: CameraState::default(),
            light: Light::default(),
        }
    }

    /// Advances the world by one tick around `viewpoint`.
    pub fn tick(&mut self, viewpoint: Point3<f32>) -> FrameStats {
        self.world.renderer_mut().begin_frame();
        self.camera_state.follow(viewpoint);

        self.world.spawn_radius(viewpoint);
        let tasks_run = self.world.process_tasks();

        let target = self
            .world
            .ground(viewpoint.x.floor() as i32, viewpoint.z.floor() as i32)
            .map(|ground| TargetBlock {
                position: ground.position,
            });

        let mut drawn = 0;
        for origin in self.world.near_chunks(viewpoint) {
            if self.world.draw_chunk(
                origin,
                target.as_ref(),
                &self.camera_state.camera,
                &self.light,
            ) {
                drawn += 1;
            }
        }

        FrameStats {
            tasks_run,
            drawn,
            resident: self.world.chunk_count(),
            pending_tasks: self.world.pending_tasks(),
        }
    }

    pub fn world(&self) -> &World<G, R> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<G, R> {
        &mut self.world
    }

    pub fn camera_state(&self) -> &CameraState {
        &self.camera_state
    }
}
