//! Mesh data structures and operations for voxel rendering.
//!
//! This module handles the conversion from a chunk's block grid to GPU-friendly
//! vertex and index buffers. Faces shared by two active blocks of the same chunk
//! are culled; faces on the chunk boundary are always emitted.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, Block, BlockTypeSize},
    chunk::Chunk,
};

use super::face::Face;
use crate::engine_state::rendering::Vertex;

/// Vertex and index data for one chunk.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Mesh {
    /// Four vertices per face
    pub vertices: Vec<Vertex>,
    /// Six indices (two triangles) per face
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Meshes every visible face of `chunk` in world space.
    pub fn from_chunk(chunk: &Chunk) -> Self {
        let mut mesh = Mesh::new();
        let origin = chunk.origin();

        for (local, block) in chunk.active_blocks() {
            let position = Point3::new(local.x as i32, local.y as i32, local.z as i32);
            for side in BlockSide::all() {
                let neighbour = position + side.normal();
                if chunk.is_block_active(neighbour.x, neighbour.y, neighbour.z) {
                    continue;
                }

                let face = Face::new(
                    local.x,
                    local.y,
                    local.z,
                    block.block_type() as usize,
                    side,
                );
                mesh.push_face(&face, origin);
            }
        }

        mesh
    }

    /// Appends one quad, translated from chunk space by `origin`.
    pub fn push_face(&mut self, face: &Face, origin: Point3<i32>) {
        let faces_generated = self.face_count() as u32;
        self.vertices
            .extend(Self::generate_face_vertices(face, origin));
        self.indices
            .extend(Self::generate_face_indices(faces_generated));
    }

    /// Number of quads in the mesh.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Generates vertex data for a single face of a block.
    ///
    /// # Arguments
    /// * `face` - The face to generate vertices for
    /// * `origin` - World coordinate of the owning chunk
    ///
    /// # Returns
    /// The four corners of the face, ordered to form two triangles when combined
    /// with the indices from `generate_face_indices`.
    pub fn generate_face_vertices(face: &Face, origin: Point3<i32>) -> [Vertex; 4] {
        let texture_indices =
            Block::get_texture_indices_from_int(face.block_type_int as BlockTypeSize);
        let texture_index = texture_indices[face.block_side as usize];
        let uvs = [(0, 1), (1, 1), (0, 0), (1, 0)];

        let corners = face.corners();
        std::array::from_fn(|i| {
            let corner = corners[i];
            let world = origin + Vector3::new(corner.x as i32, corner.y as i32, corner.z as i32);
            let (u, v) = uvs[i];
            Vertex::new(world, texture_index, u, v, face.block_side)
        })
    }

    /// Generates index data for a face, adjusted by the number of previously generated faces.
    ///
    /// # Arguments
    /// * `num_faces_generated` - The number of faces that have been generated so far
    ///
    /// # Returns
    /// Six indices forming two triangles for the face.
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        [
            (num_faces_generated * 4),
            1 + num_faces_generated * 4,
            3 + num_faces_generated * 4,
            (num_faces_generated * 4),
            3 + num_faces_generated * 4,
            2 + num_faces_generated * 4,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::headless::HeadlessRenderer;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn lone_block_emits_six_faces() {
        let mut renderer = HeadlessRenderer::new();
        let mut chunk = Chunk::new(Point3::new(32, 0, -16), &mut renderer);
        chunk.block_mut(Point3::new(4, 10, 4)).place(BlockType::STONE);

        let mesh = Mesh::from_chunk(&chunk);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        assert!(mesh
            .vertices
            .iter()
            .all(|v| (36..=37).contains(&v.position().x) && (-12..=-11).contains(&v.position().z)));
    }

    #[test]
    fn shared_faces_are_culled() {
        let mut renderer = HeadlessRenderer::new();
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), &mut renderer);
        chunk.block_mut(Point3::new(4, 10, 4)).place(BlockType::DIRT);
        chunk.block_mut(Point3::new(5, 10, 4)).place(BlockType::DIRT);

        assert_eq!(Mesh::from_chunk(&chunk).face_count(), 10);
    }

    #[test]
    fn empty_chunk_has_empty_mesh() {
        let mut renderer = HeadlessRenderer::new();
        let chunk = Chunk::new(Point3::new(0, 0, 0), &mut renderer);
        assert!(Mesh::from_chunk(&chunk).is_empty());
    }

    #[test]
    fn faces_use_the_per_side_texture() {
        let face = Face::new(0, 0, 0, BlockType::GRASS as usize, BlockSide::TOP);
        let vertices = Mesh::generate_face_vertices(&face, Point3::new(0, 0, 0));
        let top = Block::new(BlockType::GRASS, true).texture_indices()[BlockSide::TOP as usize];
        assert!(vertices.iter().all(|v| v.texture_index() == top as u32));
    }
}
