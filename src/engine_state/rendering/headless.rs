//! A renderer that keeps bookkeeping instead of GPU buffers.
//!
//! Used by the driver when no adapter is available and by tests to observe how
//! the world uploads, draws and releases chunk resources.

use std::collections::HashMap;

use cgmath::Point3;
use log::warn;

use crate::engine_state::camera_state::camera::Camera;

use super::{meshing::Mesh, ChunkRenderer, GpuHandle, Light, TargetBlock};

/// What the headless renderer remembers about one live handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidentMesh {
    pub origin: Point3<i32>,
    /// Times the handle was uploaded to
    pub uploads: usize,
    /// Index count of the most recent upload
    pub index_count: usize,
}

/// One draw queued during the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub handle: GpuHandle,
    pub target: Option<TargetBlock>,
}

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    next_handle: u64,
    live: HashMap<GpuHandle, ResidentMesh>,
    draws: Vec<DrawRecord>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `handle` was created and not yet released.
    pub fn is_live(&self, handle: GpuHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Number of handles created and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn resident(&self, handle: GpuHandle) -> Option<&ResidentMesh> {
        self.live.get(&handle)
    }

    /// Times `handle` was uploaded to, zero for unknown handles.
    pub fn uploads(&self, handle: GpuHandle) -> usize {
        self.live.get(&handle).map_or(0, |mesh| mesh.uploads)
    }

    /// Draws queued since the last `begin_frame`.
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// The highlighted block of the most recent draw that carried one.
    pub fn last_target(&self) -> Option<TargetBlock> {
        self.draws.iter().rev().find_map(|draw| draw.target)
    }
}

impl ChunkRenderer for HeadlessRenderer {
    fn create(&mut self, origin: Point3<i32>) -> GpuHandle {
        let handle = GpuHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(
            handle,
            ResidentMesh {
                origin,
                uploads: 0,
                index_count: 0,
            },
        );
        handle
    }

    fn upload(&mut self, handle: GpuHandle, mesh: &Mesh) {
        match self.live.get_mut(&handle) {
            Some(resident) => {
                resident.uploads += 1;
                resident.index_count = mesh.indices.len();
            }
            None => warn!("upload to unknown gpu handle {:?}", handle),
        }
    }

    fn release(&mut self, handle: GpuHandle) {
        if self.live.remove(&handle).is_none() {
            warn!("release of unknown gpu handle {:?}", handle);
        }
    }

    fn draw(
        &mut self,
        handle: GpuHandle,
        target: Option<&TargetBlock>,
        _camera: &Camera,
        _light: &Light,
    ) {
        if !self.is_live(handle) {
            warn!("draw of unknown gpu handle {:?}", handle);
            return;
        }
        self.draws.push(DrawRecord {
            handle,
            target: target.copied(),
        });
    }

    fn begin_frame(&mut self) {
        self.draws.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_and_tracked() {
        let mut renderer = HeadlessRenderer::new();
        let a = renderer.create(Point3::new(0, 0, 0));
        let b = renderer.create(Point3::new(16, 0, 0));
        assert_ne!(a, b);
        assert_eq!(renderer.live_count(), 2);

        renderer.upload(a, &Mesh::new());
        renderer.upload(a, &Mesh::new());
        assert_eq!(renderer.uploads(a), 2);
        assert_eq!(renderer.uploads(b), 0);

        renderer.release(a);
        assert!(!renderer.is_live(a));
        assert_eq!(renderer.uploads(a), 0);
    }

    #[test]
    fn begin_frame_clears_draws() {
        let mut renderer = HeadlessRenderer::new();
        let handle = renderer.create(Point3::new(0, 0, 0));
        let camera = Camera::default();
        let target = TargetBlock {
            position: Point3::new(1, 2, 3),
        };

        renderer.draw(handle, Some(&target), &camera, &Light::default());
        assert_eq!(renderer.draws().len(), 1);
        assert_eq!(renderer.last_target(), Some(target));

        renderer.begin_frame();
        assert!(renderer.draws().is_empty());
    }
}
