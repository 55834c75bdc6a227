//! # World Configuration
//!
//! Every tunable of the terrain streamer lives in [`WorldConfig`]. The defaults
//! reproduce the classic world (seed 10, ground at 100, visible radius 130), and
//! any subset of fields can be overridden from a JSON file:
//!
//! ```json
//! { "seed": 42, "visible_radius": 96.0, "generator": { "kind": "flat", "height": 64 } }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::{
    block::block_type::BlockType,
    chunk::CHUNK_HEIGHT,
    generation::{FlatGenerator, NoiseGenerator, TerrainGenerator, WorldBounds},
};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value for \"{0}\": {1}")]
    Invalid(/*field*/ &'static str, /*reason*/ String),
    #[error("unknown block material \"{0}\"")]
    UnknownMaterial(String),
}

/// Which terrain generator the world samples from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GeneratorConfig {
    /// Fractal Perlin terrain around the configured ground level.
    Perlin,
    /// Constant terrain of the given height and surface material.
    Flat {
        height: i32,
        #[serde(default = "default_flat_material")]
        material: String,
        #[serde(default = "default_flat_biome")]
        biome: f32,
    },
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig::Perlin
    }
}

fn default_flat_material() -> String {
    BlockType::GRASS.name().to_owned()
}

fn default_flat_biome() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed handed to the terrain generator and the tree-size draw
    pub seed: u64,
    /// Lowest solid layer
    pub bedrock: i32,
    /// Base terrain level
    pub ground: i32,
    /// No column rises above this height
    pub max_height: i32,
    /// Chunks closer than this are kept spawned and drawn
    pub visible_radius: f32,
    /// Chunks farther than this are despawned
    pub destroy_radius: f32,
    /// Chunks per axis spawned around the origin at startup
    pub player_spawn_radius: i32,
    /// Deferred tasks run per tick
    pub tasks_per_frame: usize,
    pub generator: GeneratorConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 10,
            bedrock: 0,
            ground: 100,
            max_height: 200,
            visible_radius: 130.0,
            destroy_radius: 300.0,
            player_spawn_radius: 15,
            tasks_per_frame: 3,
            generator: GeneratorConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Reads and validates a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parses and validates a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the relationships between fields that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.visible_radius > 0.0) {
            return Err(ConfigError::Invalid(
                "visible_radius",
                format!("must be positive, got {}", self.visible_radius),
            ));
        }
        if !(self.destroy_radius > self.visible_radius) {
            return Err(ConfigError::Invalid(
                "destroy_radius",
                format!(
                    "must exceed visible_radius {}, got {}",
                    self.visible_radius, self.destroy_radius
                ),
            ));
        }
        if !(self.bedrock < self.ground && self.ground < self.max_height) {
            return Err(ConfigError::Invalid(
                "ground",
                format!(
                    "need bedrock < ground < max_height, got {} / {} / {}",
                    self.bedrock, self.ground, self.max_height
                ),
            ));
        }
        if self.max_height > CHUNK_HEIGHT {
            return Err(ConfigError::Invalid(
                "max_height",
                format!("must not exceed the chunk height {}", CHUNK_HEIGHT),
            ));
        }
        if self.tasks_per_frame == 0 {
            return Err(ConfigError::Invalid(
                "tasks_per_frame",
                "must be at least 1".to_owned(),
            ));
        }
        if self.player_spawn_radius < 0 {
            return Err(ConfigError::Invalid(
                "player_spawn_radius",
                format!("must not be negative, got {}", self.player_spawn_radius),
            ));
        }
        Ok(())
    }

    pub fn bounds(&self) -> WorldBounds {
        WorldBounds {
            bedrock: self.bedrock,
            ground: self.ground,
            max_height: self.max_height,
        }
    }

    /// Constructs the configured terrain generator, seeded from this config.
    pub fn build_generator(&self) -> Result<Box<dyn TerrainGenerator>, ConfigError> {
        match &self.generator {
            GeneratorConfig::Perlin => Ok(Box::new(NoiseGenerator::new(self.seed, self.bounds()))),
            GeneratorConfig::Flat {
                height,
                material,
                biome,
            } => {
                let material = BlockType::from_name(material)
                    .ok_or_else(|| ConfigError::UnknownMaterial(material.clone()))?;
                Ok(Box::new(
                    FlatGenerator::new(self.seed, *height, material).with_biome(*biome),
                ))
            }
        }
    }
}
