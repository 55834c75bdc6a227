//! Face-culled chunk meshing.

pub mod face;
pub mod mesh;

pub use mesh::Mesh;
