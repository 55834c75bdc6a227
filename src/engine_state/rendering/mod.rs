//! # Rendering Module
//!
//! The world never talks to the GPU directly. Chunks hold an opaque [`GpuHandle`]
//! and hand meshes and draw requests to a [`ChunkRenderer`], which owns the
//! actual resources.
//!
//! ## Key Components
//!
//! * `ChunkRenderer` - The render collaborator interface
//! * `HeadlessRenderer` - Records uploads and draws without a GPU
//! * `WgpuChunkRenderer` - Per-chunk vertex and index buffers on a `wgpu` device
//! * `meshing` - Converts a chunk's block grid into culled quads
//! * `Vertex` - The GPU vertex layout shared by all meshes

use cgmath::{InnerSpace, Point3, Vector3};

use super::camera_state::camera::Camera;

pub mod headless;
pub mod meshing;
pub mod vertex;
pub mod wgpu_renderer;

pub use vertex::Vertex;

/// Opaque identifier of the GPU resource backing one chunk.
///
/// Handles are minted by [`ChunkRenderer::create`] and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GpuHandle(pub u64);

/// The block currently highlighted under the viewpoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TargetBlock {
    /// World voxel coordinate of the highlighted block
    pub position: Point3<i32>,
}

/// Directional sunlight applied to every chunk.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Light {
    /// Ambient brightness in `[0, 1]`
    pub level: f32,
    /// Normalized direction the light travels in
    pub direction: Vector3<f32>,
}

impl Default for Light {
    fn default() -> Self {
        Light {
            level: 0.8,
            direction: Vector3::new(-0.3, -1.0, -0.2).normalize(),
        }
    }
}

/// GPU-friendly representation of [`Light`].
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    direction: [f32; 3],
    level: f32,
}

impl From<&Light> for LightUniform {
    fn from(light: &Light) -> Self {
        LightUniform {
            direction: light.direction.into(),
            level: light.level,
        }
    }
}

/// The render collaborator chunks upload to and draw through.
pub trait ChunkRenderer {
    /// Allocates the GPU resource for a chunk at `origin`.
    fn create(&mut self, origin: Point3<i32>) -> GpuHandle;

    /// Replaces the geometry behind `handle` with `mesh`.
    fn upload(&mut self, handle: GpuHandle, mesh: &meshing::Mesh);

    /// Frees the resource behind `handle`. The handle must not be used again.
    fn release(&mut self, handle: GpuHandle);

    /// Queues a draw of `handle` for the current frame.
    fn draw(
        &mut self,
        handle: GpuHandle,
        target: Option<&TargetBlock>,
        camera: &Camera,
        light: &Light,
    );

    /// Starts a new frame, discarding the draws queued for the previous one.
    fn begin_frame(&mut self) {}
}

impl<T: ChunkRenderer + ?Sized> ChunkRenderer for Box<T> {
    fn create(&mut self, origin: Point3<i32>) -> GpuHandle {
        (**self).create(origin)
    }

    fn upload(&mut self, handle: GpuHandle, mesh: &meshing::Mesh) {
        (**self).upload(handle, mesh)
    }

    fn release(&mut self, handle: GpuHandle) {
        (**self).release(handle)
    }

    fn draw(
        &mut self,
        handle: GpuHandle,
        target: Option<&TargetBlock>,
        camera: &Camera,
        light: &Light,
    ) {
        (**self).draw(handle, target, camera, light)
    }

    fn begin_frame(&mut self) {
        (**self).begin_frame()
    }
}
