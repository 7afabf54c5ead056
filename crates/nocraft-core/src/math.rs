use crate::constants::CHUNK_EXTENT;
use crate::types::{ChunkCoord, LocalCoord, WorldCoord};
use glam::{IVec3, Vec3};

/// Voxel-space origin of a chunk: chunk coordinate scaled by the chunk extents.
pub fn chunk_origin(chunk: ChunkCoord) -> WorldCoord {
    chunk * CHUNK_EXTENT
}

/// World-space translation of a chunk, as handed to the renderer.
pub fn chunk_world_position(chunk: ChunkCoord) -> Vec3 {
    chunk.as_vec3() * CHUNK_EXTENT.as_vec3()
}

/// Convert a world-space voxel coordinate to its containing chunk coordinate.
pub fn world_to_chunk(world: WorldCoord) -> ChunkCoord {
    IVec3::new(
        world.x.div_euclid(CHUNK_EXTENT.x),
        world.y.div_euclid(CHUNK_EXTENT.y),
        world.z.div_euclid(CHUNK_EXTENT.z),
    )
}

/// Convert a world-space voxel coordinate to its local offset within a chunk.
pub fn world_to_local(world: WorldCoord) -> LocalCoord {
    IVec3::new(
        world.x.rem_euclid(CHUNK_EXTENT.x),
        world.y.rem_euclid(CHUNK_EXTENT.y),
        world.z.rem_euclid(CHUNK_EXTENT.z),
    )
}

/// Convert a chunk coordinate and local offset back to world-space.
pub fn chunk_local_to_world(chunk: ChunkCoord, local: LocalCoord) -> WorldCoord {
    chunk_origin(chunk) + local
}

/// Whether a local coordinate addresses a cell inside the chunk grid.
pub fn local_in_bounds(local: LocalCoord) -> bool {
    local.cmpge(IVec3::ZERO).all() && local.cmplt(CHUNK_EXTENT).all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_world_position_scales_per_axis() {
        assert_eq!(chunk_world_position(IVec3::ZERO), Vec3::ZERO);
        assert_eq!(
            chunk_world_position(IVec3::new(1, 1, 1)),
            Vec3::new(16.0, 256.0, 16.0)
        );
        assert_eq!(
            chunk_world_position(IVec3::new(-6, 0, 3)),
            Vec3::new(-96.0, 0.0, 48.0)
        );
    }

    #[test]
    fn test_world_to_chunk_positive() {
        assert_eq!(world_to_chunk(IVec3::new(0, 0, 0)), IVec3::ZERO);
        assert_eq!(world_to_chunk(IVec3::new(15, 255, 15)), IVec3::ZERO);
        assert_eq!(world_to_chunk(IVec3::new(16, 0, 0)), IVec3::new(1, 0, 0));
        assert_eq!(world_to_chunk(IVec3::new(0, 256, 0)), IVec3::new(0, 1, 0));
    }

    #[test]
    fn test_world_to_chunk_negative() {
        assert_eq!(world_to_chunk(IVec3::new(-1, 0, 0)), IVec3::new(-1, 0, 0));
        assert_eq!(world_to_chunk(IVec3::new(-16, 0, 0)), IVec3::new(-1, 0, 0));
        assert_eq!(world_to_chunk(IVec3::new(-17, 0, -1)), IVec3::new(-2, 0, -1));
    }

    #[test]
    fn test_world_to_local_negative() {
        assert_eq!(world_to_local(IVec3::new(-1, 0, 0)), IVec3::new(15, 0, 0));
        assert_eq!(world_to_local(IVec3::new(-16, -1, 0)), IVec3::new(0, 255, 0));
    }

    #[test]
    fn test_chunk_local_roundtrip() {
        let world = IVec3::new(-50, 100, 3);
        let chunk = world_to_chunk(world);
        let local = world_to_local(world);
        assert!(local_in_bounds(local));
        assert_eq!(chunk_local_to_world(chunk, local), world);
    }

    #[test]
    fn test_local_bounds() {
        assert!(local_in_bounds(IVec3::new(0, 0, 0)));
        assert!(local_in_bounds(IVec3::new(15, 255, 15)));
        assert!(!local_in_bounds(IVec3::new(16, 0, 0)));
        assert!(!local_in_bounds(IVec3::new(0, -1, 0)));
        assert!(!local_in_bounds(IVec3::new(0, 0, 16)));
    }
}
