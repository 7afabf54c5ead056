use glam::IVec3;

/// Chunk coordinate in chunk-space (each unit = one chunk extent).
pub type ChunkCoord = IVec3;

/// World coordinate in voxel-space.
pub type WorldCoord = IVec3;

/// Voxel offset inside a chunk. Each axis lies in [0, extent) once validated.
pub type LocalCoord = IVec3;
