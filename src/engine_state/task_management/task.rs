//! # Deferred Chunk Tasks
//!
//! A task names the chunk it works on by origin instead of holding a reference
//! to it. The world re-resolves the origin through its index when the task runs,
//! so a task whose chunk was despawned in the meantime finds nothing and becomes
//! a no-op.

use cgmath::Point3;

/// The work a deferred task performs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChunkTaskKind {
    /// Place the chunk's trees, then re-buffer every chunk they touched.
    PlaceTreesAndBuffer,
}

/// A unit of deferred work on one chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkTask {
    /// Origin of the chunk the task targets
    pub origin: Point3<i32>,
    pub kind: ChunkTaskKind,
}

impl ChunkTask {
    pub fn place_trees_and_buffer(origin: Point3<i32>) -> Self {
        ChunkTask {
            origin,
            kind: ChunkTaskKind::PlaceTreesAndBuffer,
        }
    }
}
