//! # Voxel Terrain Core
//!
//! This module contains the voxel data model and the streaming world built on it.
//!
//! ## Architecture
//!
//! * **Block**: Voxel materials, faces and the per-slot block record
//! * **Chunk**: Fixed-size 3D arrays of blocks with a GPU handle
//! * **Generation**: The terrain generator interface and its implementations
//! * **World**: The chunk index, streaming, deferred tasks and tree placement
//!
//! ## Data Flow
//!
//! 1. The world receives a block lookup or a viewpoint update
//! 2. Missing chunks are spawned from the generator's height sample and uploaded
//! 3. Tree placement runs later from the task queue and uploads again
//! 4. Chunks that drift out of range are despawned and their GPU resources freed
//!
//! ## Threading
//!
//! All world mutation happens on the thread that drives the tick; nothing here
//! is shared across threads.

pub mod block;
pub mod chunk;
pub mod generation;
pub mod world;
