//! Radius-based streaming around the viewpoint.
//!
//! Spawning and eviction use two radii so a chunk just outside the visible
//! radius is kept resident instead of flickering between spawn and despawn:
//! - distance `<= visible_radius`: drawn
//! - `visible_radius < distance <= destroy_radius`: resident but idle
//! - distance `> destroy_radius`: despawned

use std::f32::consts::PI;

use cgmath::{Basis2, MetricSpace, Point3, Rad, Rotation, Rotation2, Vector2};

use crate::engine_state::rendering::ChunkRenderer;
use crate::engine_state::voxels::chunk::CHUNK_WIDTH;
use crate::engine_state::voxels::generation::TerrainGenerator;

use super::World;

impl<G: TerrainGenerator, R: ChunkRenderer> World<G, R> {
    /// Spawns missing chunks on the ring of radius `visible_radius` around `center`.
    ///
    /// The ring is sampled every half chunk width of arc and each sample is a
    /// block lookup at `center.y`, which spawns its chunk if needed. Only the
    /// ring is probed, not the disc inside it.
    pub fn spawn_radius(&mut self, center: Point3<f32>) {
        let radius = self.config.visible_radius;
        let arc = CHUNK_WIDTH as f32 / 2.0;
        let theta = Rad(arc / radius);
        let iterations = (2.0 * PI * radius / arc).ceil() as usize;

        let rotation: Basis2<f32> = Rotation2::from_angle(theta);
        let mut offset = Vector2::new(radius, 0.0);
        for _ in 0..iterations {
            self.get_or_spawn_block(Point3::new(
                center.x + offset.x,
                center.y,
                center.z + offset.y,
            ));
            offset = rotation.rotate_vector(offset);
        }
    }

    /// Returns the origins of resident chunks whose center lies within
    /// `visible_radius` of `center`.
    ///
    /// Chunks farther than `destroy_radius` are despawned as a side effect.
    pub fn near_chunks(&mut self, center: Point3<f32>) -> Vec<Point3<i32>> {
        let visible_radius = self.config.visible_radius;
        let destroy_radius = self.config.destroy_radius;

        let mut drawable = Vec::new();
        let mut distant = Vec::new();
        for chunk in self.chunks.all() {
            let distance = chunk.center().distance(center);
            if distance <= visible_radius {
                drawable.push(chunk.origin());
            } else if distance > destroy_radius {
                distant.push(chunk.origin());
            }
        }

        for origin in distant {
            self.despawn_chunk(origin);
        }
        drawable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::engine_state::rendering::headless::HeadlessRenderer;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::generation::FlatGenerator;

    fn world(visible_radius: f32) -> World<FlatGenerator, HeadlessRenderer> {
        let config = WorldConfig {
            visible_radius,
            destroy_radius: visible_radius * 2.0,
            ..WorldConfig::default()
        };
        World::new(
            config,
            FlatGenerator::new(10, 5, BlockType::GRASS),
            HeadlessRenderer::new(),
        )
    }

    #[test]
    fn ring_chunks_are_spawned() {
        let mut world = world(40.0);
        world.spawn_radius(Point3::new(8.0, 10.0, 8.0));

        assert!(world.chunk(Point3::new(48, 0, 0)).is_some());
        assert!(world.chunk(Point3::new(-32, 0, 0)).is_some());
        assert!(world.chunk(Point3::new(0, 0, 32)).is_some());
        assert!(world.chunk(Point3::new(0, 0, -32)).is_some());
        // the disc inside the ring is not probed
        assert!(world.chunk(Point3::new(0, 0, 0)).is_none());
    }

    #[test]
    fn spawn_radius_is_idempotent() {
        let mut world = world(40.0);
        let center = Point3::new(0.0, 10.0, 0.0);
        world.spawn_radius(center);
        let count = world.chunk_count();
        world.spawn_radius(center);
        assert_eq!(world.chunk_count(), count);
    }

    #[test]
    fn near_chunks_only_returns_visible_chunks() {
        let mut world = world(40.0);
        world.spawn_chunk(Point3::new(0, 0, 0));
        world.spawn_chunk(Point3::new(48, 0, 0));

        // chunk centers sit at y = 128
        let center = Point3::new(8.0, 128.0, 8.0);
        assert_eq!(world.near_chunks(center), vec![Point3::new(0, 0, 0)]);
        assert_eq!(world.chunk_count(), 2);
    }
}
