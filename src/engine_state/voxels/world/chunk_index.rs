//! The spatial index: resident chunks keyed by their origin.

use std::collections::HashMap;

use cgmath::Point3;

use crate::engine_state::voxels::chunk::Chunk;

/// Mapping from chunk origin to the chunk that owns it.
///
/// Chunks are keyed by their own origin, so two chunks can never share one.
/// Iteration order is unspecified.
#[derive(Default)]
pub struct ChunkIndex {
    chunks: HashMap<Point3<i32>, Chunk>,
}

impl ChunkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `chunk` under its origin, returning the chunk it replaced.
    pub fn set(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk.origin(), chunk)
    }

    /// Returns the chunk at `origin`, inserting the one built by `spawn` if absent.
    pub fn get_or_insert_with(
        &mut self,
        origin: Point3<i32>,
        spawn: impl FnOnce() -> Chunk,
    ) -> &mut Chunk {
        self.chunks.entry(origin).or_insert_with(spawn)
    }

    pub fn get(&self, origin: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(&origin)
    }

    /// Removes and returns the chunk at `origin`.
    pub fn delete(&mut self, origin: Point3<i32>) -> Option<Chunk> {
        self.chunks.remove(&origin)
    }

    pub fn contains(&self, origin: Point3<i32>) -> bool {
        self.chunks.contains_key(&origin)
    }

    /// Every resident chunk, in unspecified order.
    pub fn all(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Origins of every resident chunk, in unspecified order.
    pub fn origins(&self) -> Vec<Point3<i32>> {
        self.chunks.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::headless::HeadlessRenderer;

    #[test]
    fn chunks_are_keyed_by_origin() {
        let mut renderer = HeadlessRenderer::new();
        let mut index = ChunkIndex::new();
        let origin = Point3::new(-16, 0, 32);

        assert!(index.set(Chunk::new(origin, &mut renderer)).is_none());
        assert!(index.contains(origin));
        assert_eq!(index.get(origin).map(Chunk::origin), Some(origin));
        assert!(index.get(Point3::new(0, 0, 0)).is_none());
        assert_eq!(index.origins(), vec![origin]);

        let removed = index.delete(origin).expect("chunk was inserted");
        assert_eq!(removed.origin(), origin);
        assert!(index.is_empty());
        assert!(index.delete(origin).is_none());
    }

    #[test]
    fn get_or_insert_with_builds_once() {
        let mut renderer = HeadlessRenderer::new();
        let mut index = ChunkIndex::new();
        let origin = Point3::new(0, 0, 0);

        let first = index
            .get_or_insert_with(origin, || Chunk::new(origin, &mut renderer))
            .gpu_handle();
        let second = index
            .get_or_insert_with(origin, || panic!("chunk rebuilt"))
            .gpu_handle();
        assert_eq!(first, second);
        assert_eq!(index.len(), 1);
    }
}
