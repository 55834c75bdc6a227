#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! Streams an effectively infinite voxel terrain around a moving viewpoint.
//!
//! Chunks are generated on demand from a terrain generator, kept resident
//! while they are near the viewpoint and evicted once they drift far away.
//! Tree placement is deferred to a task queue so a burst of new chunks does
//! not stall a single tick.
//!
//! ## Key Modules
//!
//! * `config` - `WorldConfig`, loaded from JSON
//! * `engine_state` - The world, renderers, camera and the per-tick driver
//!
//! ## Usage
//!
//! ```no_run
//! use cgmath::Point3;
//! use voxel_terrain::{HeadlessRenderer, World, WorldConfig};
//!
//! let config = WorldConfig::default();
//! let generator = config.build_generator().unwrap();
//! let mut world = World::new(config, generator, HeadlessRenderer::new());
//! world.init();
//!
//! let viewpoint = Point3::new(0.0, 100.0, 0.0);
//! world.spawn_radius(viewpoint);
//! world.process_tasks();
//! let drawable = world.near_chunks(viewpoint);
//! ```

use cgmath::Point3;
use log::{info, warn};

pub mod config;
pub mod engine_state;

pub use config::{ConfigError, GeneratorConfig, WorldConfig};
pub use engine_state::{
    rendering::{
        headless::HeadlessRenderer, wgpu_renderer::WgpuChunkRenderer, ChunkRenderer, GpuHandle,
        Light, TargetBlock,
    },
    voxels::{
        block::{block_type::BlockType, Block},
        chunk::{Chunk, CHUNK_HEIGHT, CHUNK_WIDTH},
        generation::{FlatGenerator, NoiseGenerator, TerrainGenerator, WorldBounds},
        world::{LocatedBlock, World},
    },
    EngineState, FrameStats,
};

/// Ticks the driver simulates before exiting.
const DRIVER_TICKS: usize = 600;
/// Distance the viewpoint travels along +X per tick.
const DRIVER_SPEED: f32 = 2.0;
/// Ticks between statistics log lines.
const STATS_INTERVAL: usize = 60;

/// Runs the headless driver.
///
/// Arguments: an optional path to a JSON `WorldConfig`, and `--gpu` to upload
/// chunk meshes to a real device instead of the bookkeeping renderer.
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let use_gpu = args.iter().any(|arg| arg == "--gpu");
    let config = match args.iter().find(|arg| !arg.starts_with("--")) {
        Some(path) => {
            info!("loading config from {}", path);
            WorldConfig::load(path)?
        }
        None => WorldConfig::default(),
    };

    let generator = config.build_generator()?;
    let renderer: Box<dyn ChunkRenderer> = if use_gpu {
        match pollster::block_on(WgpuChunkRenderer::headless()) {
            Ok(renderer) => Box::new(renderer),
            Err(err) => {
                warn!("{}, falling back to the headless renderer", err);
                Box::new(HeadlessRenderer::new())
            }
        }
    } else {
        Box::new(HeadlessRenderer::new())
    };

    let ground = config.ground as f32;
    let mut world = World::new(config, generator, renderer);

    let init_start = web_time::Instant::now();
    world.init();
    info!("world init took {:?}", init_start.elapsed());

    let mut engine = EngineState::new(world);
    let run_start = web_time::Instant::now();
    for tick in 0..DRIVER_TICKS {
        let viewpoint = Point3::new(tick as f32 * DRIVER_SPEED, ground, 8.0);
        let stats = engine.tick(viewpoint);
        if tick % STATS_INTERVAL == 0 {
            info!(
                "tick {}: {} drawn, {} resident, {} tasks run, {} pending",
                tick, stats.drawn, stats.resident, stats.tasks_run, stats.pending_tasks
            );
        }
    }
    info!(
        "{} ticks in {:?}",
        DRIVER_TICKS,
        run_start.elapsed()
    );

    Ok(())
}
