//! Voxel chunks, face-culled meshing, heightmap terrain and the loaded-world container.

pub mod chunk;
pub mod chunk_map;
pub mod config;
pub mod mesh;
pub mod terrain;

use glam::IVec3;
use log::info;
use nocraft_core::math::{world_to_chunk, world_to_local};
use nocraft_core::types::{ChunkCoord, WorldCoord};
use nocraft_core::voxel::Voxel;
use serde::{Deserialize, Serialize};

pub use chunk::Chunk;
pub use chunk_map::ChunkMap;
pub use config::{ConfigError, WorldConfig};
pub use mesh::Mesh;
pub use terrain::{TerrainConfig, TerrainGenerator};

/// Aggregate counts over every loaded chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldStats {
    pub chunks: usize,
    pub solid_voxels: usize,
    pub faces: usize,
    pub vertices: usize,
}

/// Primary public struct for the nocraft-world crate.
/// Owns the terrain generator and every loaded chunk.
#[derive(Debug)]
pub struct World {
    chunk_map: ChunkMap,
    terrain: TerrainGenerator,
    config: WorldConfig,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    /// Create an empty world. Nothing is generated until a load call.
    pub fn new(config: WorldConfig) -> Self {
        Self {
            chunk_map: ChunkMap::new(),
            terrain: TerrainGenerator::new(config.seed, config.terrain),
            config,
        }
    }

    /// Load the square of chunks around the origin given by the configured radius.
    pub fn load(&mut self) -> usize {
        self.load_area(self.config.load_radius)
    }

    /// Load every chunk with x and z in `-radius..=radius` at y = 0.
    /// Returns how many chunks were newly generated.
    pub fn load_area(&mut self, radius: u32) -> usize {
        let r = radius as i32;
        let mut generated = 0;
        for x in -r..=r {
            for z in -r..=r {
                let (_, fresh) = self
                    .chunk_map
                    .load_chunk(IVec3::new(x, 0, z), &self.terrain);
                if fresh {
                    generated += 1;
                }
            }
        }
        info!(
            "Loaded area radius {radius}: {generated} new chunks, {} total",
            self.chunk_map.loaded_count()
        );
        generated
    }

    /// Generate the chunk at `coord` if needed and return it.
    pub fn load_chunk(&mut self, coord: ChunkCoord) -> &Chunk {
        self.chunk_map.load_chunk(coord, &self.terrain).0
    }

    pub fn unload_chunk(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunk_map.unload_chunk(&coord)
    }

    /// Reshuffle the terrain noise and regenerate every loaded chunk in place.
    ///
    /// The shuffle continues from the current table, so the result depends on
    /// the seeds applied before.
    pub fn reseed(&mut self, seed: u64) {
        self.terrain.reseed(seed);
        self.config.seed = seed;
        for (_, chunk) in self.chunk_map.iter_mut() {
            self.terrain.populate(chunk);
            chunk.rebuild_mesh();
        }
        info!(
            "Regenerated {} chunks after reseed",
            self.chunk_map.loaded_count()
        );
    }

    /// Voxel at a world voxel coordinate, or None when its chunk is not loaded.
    pub fn voxel_at(&self, world: WorldCoord) -> Option<Voxel> {
        let chunk = self.chunk_map.get(&world_to_chunk(world))?;
        chunk.get_checked(world_to_local(world))
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunk_map.get(&coord)
    }

    /// Get the chunk map for reading.
    pub fn chunk_map(&self) -> &ChunkMap {
        &self.chunk_map
    }

    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    /// Configuration the world was built with. `seed` tracks the latest reseed.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn stats(&self) -> WorldStats {
        self.chunk_map
            .iter()
            .fold(WorldStats::default(), |mut stats, (_, chunk)| {
                stats.chunks += 1;
                stats.solid_voxels += chunk.solid_count();
                stats.faces += chunk.mesh().face_count();
                stats.vertices += chunk.mesh().vertex_count();
                stats
            })
    }
}
