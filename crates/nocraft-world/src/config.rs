use std::path::Path;

use log::{info, warn};
use nocraft_core::constants::{CHUNK_SIZE_Y, DEFAULT_LOAD_RADIUS, DEFAULT_WORLD_SEED, MAX_LOAD_RADIUS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::terrain::TerrainConfig;

/// Octave stacks deeper than this add nothing visible at voxel resolution.
pub const MAX_FRACTAL_OCTAVES: u32 = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse world config RON: {0}")]
    Parse(String),
    #[error("Failed to serialize world config as RON: {0}")]
    Serialize(String),
    #[error("Invalid world config: {0}")]
    Invalid(String),
    #[error("Failed to read world config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything needed to build a `World`. Missing RON fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u64,
    /// Chunks loaded in each horizontal direction around the origin.
    pub load_radius: u32,
    pub terrain: TerrainConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_WORLD_SEED,
            load_radius: DEFAULT_LOAD_RADIUS,
            terrain: TerrainConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Reject values that would produce degenerate or out-of-chunk terrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let terrain = &self.terrain;
        if !(terrain.horizontal_scale.is_finite() && terrain.horizontal_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "horizontal_scale must be positive, got {}",
                terrain.horizontal_scale
            )));
        }
        if !(terrain.height_scale.is_finite() && terrain.height_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "height_scale must be positive, got {}",
                terrain.height_scale
            )));
        }
        if 2.0 * terrain.height_scale > CHUNK_SIZE_Y as f32 {
            return Err(ConfigError::Invalid(format!(
                "height_scale {} lets columns exceed the chunk height {}",
                terrain.height_scale, CHUNK_SIZE_Y
            )));
        }
        if self.load_radius > MAX_LOAD_RADIUS {
            return Err(ConfigError::Invalid(format!(
                "load_radius {} exceeds maximum {}",
                self.load_radius, MAX_LOAD_RADIUS
            )));
        }
        if let Some(fractal) = &terrain.fractal {
            if fractal.octaves > MAX_FRACTAL_OCTAVES {
                return Err(ConfigError::Invalid(format!(
                    "fractal octaves {} exceeds maximum {}",
                    fractal.octaves, MAX_FRACTAL_OCTAVES
                )));
            }
            if !(fractal.lacunarity.is_finite() && fractal.lacunarity > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "fractal lacunarity must be positive, got {}",
                    fractal.lacunarity
                )));
            }
            if !fractal.gain.is_finite() {
                return Err(ConfigError::Invalid("fractal gain must be finite".into()));
            }
        }
        Ok(())
    }
}

/// Parse and validate a world config from a RON string.
pub fn load_config_from_str(ron_str: &str) -> Result<WorldConfig, ConfigError> {
    let options = ron::Options::default();
    let config: WorldConfig = options
        .from_str(ron_str)
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a world config file.
pub fn load_config(path: &Path) -> Result<WorldConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = load_config_from_str(&text)?;
    info!("Loaded world config from {}", path.display());
    Ok(config)
}

/// Like `load_config`, but a missing file yields the defaults.
pub fn load_config_or_default(path: &Path) -> Result<WorldConfig, ConfigError> {
    if !path.exists() {
        warn!("World config {} not found, using defaults", path.display());
        return Ok(WorldConfig::default());
    }
    load_config(path)
}

/// Serialize a config as pretty RON, suitable for `load_config_from_str`.
pub fn config_to_ron(config: &WorldConfig) -> Result<String, ConfigError> {
    ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::default())
        .map_err(|e| ConfigError::Serialize(e.to_string()))
}
