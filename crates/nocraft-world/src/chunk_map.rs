use std::collections::HashMap;

use log::debug;
use nocraft_core::types::ChunkCoord;

use crate::chunk::Chunk;
use crate::terrain::TerrainGenerator;

/// Loaded chunks keyed by chunk coordinate.
#[derive(Debug, Default)]
pub struct ChunkMap {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the chunk at `coord` unless it is already loaded.
    /// Returns the loaded chunk and whether it was generated by this call.
    pub fn load_chunk(&mut self, coord: ChunkCoord, terrain: &TerrainGenerator) -> (&Chunk, bool) {
        let mut generated = false;
        let chunk = self.chunks.entry(coord).or_insert_with(|| {
            generated = true;
            terrain.generate_chunk(coord)
        });
        (chunk, generated)
    }

    /// Insert a prebuilt chunk, returning any chunk it displaced.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk.coord(), chunk)
    }

    pub fn unload_chunk(&mut self, coord: &ChunkCoord) -> Option<Chunk> {
        let removed = self.chunks.remove(coord);
        if removed.is_some() {
            debug!("Unloaded chunk {coord}");
        }
        removed
    }

    pub fn get(&self, coord: &ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(coord)
    }

    pub fn get_mut(&mut self, coord: &ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(coord)
    }

    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.chunks.contains_key(coord)
    }

    /// Iterate over all loaded chunks in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ChunkCoord, &mut Chunk)> {
        self.chunks.iter_mut()
    }

    /// Loaded coordinates sorted by (x, y, z), for stable reporting.
    pub fn sorted_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort_by_key(|c| (c.x, c.y, c.z));
        coords
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}
