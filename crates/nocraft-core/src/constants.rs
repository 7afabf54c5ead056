//! Single source of truth for shared constants.
//! Grid extents are compile-time so chunk loops never need runtime bounds checks
//! beyond slice indexing.

use glam::IVec3;

/// Chunk width along X in voxels.
pub const CHUNK_SIZE_X: usize = 16;

/// Chunk height along Y in voxels.
pub const CHUNK_SIZE_Y: usize = 256;

/// Chunk depth along Z in voxels.
pub const CHUNK_SIZE_Z: usize = 16;

/// Chunk extents as a vector, for component-wise coordinate math.
pub const CHUNK_EXTENT: IVec3 = IVec3::new(
    CHUNK_SIZE_X as i32,
    CHUNK_SIZE_Y as i32,
    CHUNK_SIZE_Z as i32,
);

/// Total voxels per chunk (16 * 256 * 16).
pub const VOXELS_PER_CHUNK: usize = CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z;

/// Number of voxel type codes, Air included.
pub const VOXEL_TYPES: usize = 3;

/// Vertices emitted per visible face (two triangles, no index buffer).
pub const VERTICES_PER_FACE: usize = 6;

/// Faces of a voxel cube.
pub const FACES_PER_VOXEL: usize = 6;

/// World units per noise unit along the horizontal axes.
pub const DEFAULT_HORIZONTAL_SCALE: f32 = 64.0;

/// Column height multiplier: heights fall in [0, 2 * DEFAULT_HEIGHT_SCALE].
pub const DEFAULT_HEIGHT_SCALE: f32 = 16.0;

/// Chunks loaded in each horizontal direction around the origin on world load.
pub const DEFAULT_LOAD_RADIUS: u32 = 6;

/// Upper bound for the configurable load radius (a (2r+1)^2 square of chunks).
pub const MAX_LOAD_RADIUS: u32 = 64;

/// Seed used when no seed is configured.
pub const DEFAULT_WORLD_SEED: u64 = 5;
