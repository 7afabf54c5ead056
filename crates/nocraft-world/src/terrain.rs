use glam::Vec2;
use log::{debug, info};
use nocraft_core::constants::{
    CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, DEFAULT_HEIGHT_SCALE, DEFAULT_HORIZONTAL_SCALE,
};
use nocraft_core::types::ChunkCoord;
use nocraft_core::voxel::Voxel;
use nocraft_noise::{FractalParams, NoiseField};
use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;

/// Heightmap shaping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// World units per noise unit along X and Z. Larger values give broader hills.
    pub horizontal_scale: f32,
    /// Column heights fall in [0, 2 * height_scale].
    pub height_scale: f32,
    /// Octave stack to sample instead of a single noise layer.
    pub fractal: Option<FractalParams>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            horizontal_scale: DEFAULT_HORIZONTAL_SCALE,
            height_scale: DEFAULT_HEIGHT_SCALE,
            fractal: None,
        }
    }
}

/// Heightmap terrain: one 2D noise sample per column, Stone below Grass.
///
/// Columns depend only on their world X/Z, so the chunk's Y coordinate does not
/// shift the surface.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    noise: NoiseField,
    config: TerrainConfig,
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self {
            noise: NoiseField::default(),
            config: TerrainConfig::default(),
        }
    }
}

impl TerrainGenerator {
    pub fn new(seed: u64, config: TerrainConfig) -> Self {
        Self {
            noise: NoiseField::new(seed),
            config,
        }
    }

    /// Build from an existing noise field, keeping its table as-is.
    pub fn with_noise(noise: NoiseField, config: TerrainConfig) -> Self {
        Self { noise, config }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Reshuffle the noise table. Chunks generated earlier keep their old terrain.
    pub fn reseed(&mut self, seed: u64) {
        self.noise.reseed(seed);
        info!("Terrain reseeded with {seed}");
    }

    /// Tallest column this generator can produce.
    pub fn max_height(&self) -> usize {
        ((2.0 * self.config.height_scale).floor().max(0.0) as usize).min(CHUNK_SIZE_Y)
    }

    /// Noise value driving the column at world (wx, wz), nominally in [-1, 1].
    pub fn column_noise(&self, wx: i32, wz: i32) -> f32 {
        let p = Vec2::new(wx as f32, wz as f32) / self.config.horizontal_scale;
        match &self.config.fractal {
            Some(params) => self.noise.fractal(p, params),
            None => self.noise.noise2(p),
        }
    }

    /// Solid column height at world (wx, wz).
    pub fn column_height(&self, wx: i32, wz: i32) -> usize {
        let n = self.column_noise(wx, wz);
        let h = ((n + 1.0) * self.config.height_scale).floor();
        h.clamp(0.0, self.max_height() as f32) as usize
    }

    /// Overwrite every voxel of `chunk` from the heightmap.
    ///
    /// The lower half of each column is Stone, the rest up to its height is
    /// Grass, Air above. The mesh is left untouched.
    pub fn populate(&self, chunk: &mut Chunk) {
        let origin = chunk.world_origin();
        chunk.fill(Voxel::Air);
        for x in 0..CHUNK_SIZE_X {
            for z in 0..CHUNK_SIZE_Z {
                let height = self.column_height(origin.x + x as i32, origin.z + z as i32);
                let stone_top = height / 2;
                chunk.fill_column(x, z, 0..stone_top, Voxel::Stone);
                chunk.fill_column(x, z, stone_top..height, Voxel::Grass);
            }
        }
    }

    /// Allocate, populate and mesh the chunk at `coord`.
    pub fn generate_chunk(&self, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(coord);
        self.populate(&mut chunk);
        chunk.rebuild_mesh();
        debug!(
            "Generated chunk {coord}: {} solid voxels, {} vertices",
            chunk.solid_count(),
            chunk.mesh().vertex_count()
        );
        chunk
    }
}
