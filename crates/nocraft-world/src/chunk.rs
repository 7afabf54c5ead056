use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{IVec3, Vec3};
use log::trace;
use nocraft_core::constants::{CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, VOXELS_PER_CHUNK};
use nocraft_core::math::{chunk_origin, chunk_world_position, local_in_bounds};
use nocraft_core::types::{ChunkCoord, LocalCoord, WorldCoord};
use nocraft_core::voxel::Voxel;

use crate::mesh::{build_mesh, Mesh};

/// Flat grid index, x-major then y then z, matching the meshing walk order.
#[inline]
fn grid_index(x: usize, y: usize, z: usize) -> usize {
    (x * CHUNK_SIZE_Y + y) * CHUNK_SIZE_Z + z
}

/// Source of mesh revisions. Shared by every chunk so a regenerated chunk never
/// repeats the revision of the one it replaced at the same coordinate.
static NEXT_MESH_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_mesh_revision() -> u64 {
    NEXT_MESH_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// A fixed-size dense block of voxels plus the geometry derived from it.
///
/// The grid is exclusively owned; chunks are deliberately not `Clone`.
#[derive(Debug)]
pub struct Chunk {
    /// Chunk coordinate in chunk-space.
    coord: ChunkCoord,
    /// CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z voxels, see `grid_index`.
    voxels: Box<[Voxel]>,
    mesh: Mesh,
    /// Unique across all chunks; replaced on every mesh rebuild.
    mesh_revision: u64,
}

impl Chunk {
    /// An all-Air chunk with an empty mesh.
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            voxels: vec![Voxel::Air; VOXELS_PER_CHUNK].into_boxed_slice(),
            mesh: Mesh::default(),
            mesh_revision: next_mesh_revision(),
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// World-space translation of the chunk's local origin.
    pub fn world_position(&self) -> Vec3 {
        chunk_world_position(self.coord)
    }

    /// Voxel-space coordinate of local (0, 0, 0).
    pub fn world_origin(&self) -> WorldCoord {
        chunk_origin(self.coord)
    }

    /// Voxel at a local position. Out-of-range coordinates are a caller bug and panic.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Voxel {
        debug_assert!(
            x < CHUNK_SIZE_X && y < CHUNK_SIZE_Y && z < CHUNK_SIZE_Z,
            "voxel ({x}, {y}, {z}) outside chunk"
        );
        self.voxels[grid_index(x, y, z)]
    }

    /// Overwrite a voxel. Out-of-range coordinates panic. Does not touch the mesh.
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: Voxel) {
        debug_assert!(
            x < CHUNK_SIZE_X && y < CHUNK_SIZE_Y && z < CHUNK_SIZE_Z,
            "voxel ({x}, {y}, {z}) outside chunk"
        );
        self.voxels[grid_index(x, y, z)] = voxel;
    }

    /// Voxel at a signed local position, or None outside the grid.
    pub fn get_checked(&self, local: LocalCoord) -> Option<Voxel> {
        if !local_in_bounds(local) {
            return None;
        }
        Some(self.get(local.x as usize, local.y as usize, local.z as usize))
    }

    /// Set every voxel in the grid.
    pub fn fill(&mut self, voxel: Voxel) {
        self.voxels.fill(voxel);
    }

    /// Set `y_range` of the column at (x, z).
    pub fn fill_column(&mut self, x: usize, z: usize, y_range: Range<usize>, voxel: Voxel) {
        for y in y_range {
            self.set(x, y, z, voxel);
        }
    }

    /// One past the highest solid cell in the column, or 0 for an empty column.
    pub fn column_top(&self, x: usize, z: usize) -> usize {
        (0..CHUNK_SIZE_Y)
            .rev()
            .find(|&y| self.get(x, y, z).is_solid())
            .map_or(0, |y| y + 1)
    }

    /// Number of non-Air voxels.
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.is_solid()).count()
    }

    /// Whether any voxel is solid.
    pub fn has_solid(&self) -> bool {
        self.voxels.iter().any(|v| v.is_solid())
    }

    /// Iterate `(local position, voxel)` in x, y, z order.
    pub fn iter(&self) -> impl Iterator<Item = (LocalCoord, Voxel)> + '_ {
        (0..CHUNK_SIZE_X).flat_map(move |x| {
            (0..CHUNK_SIZE_Y).flat_map(move |y| {
                (0..CHUNK_SIZE_Z).map(move |z| {
                    (
                        IVec3::new(x as i32, y as i32, z as i32),
                        self.get(x, y, z),
                    )
                })
            })
        })
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Identity of the current mesh. Two chunks never share a revision, so a
    /// changed value means the geometry must be re-uploaded.
    pub fn mesh_revision(&self) -> u64 {
        self.mesh_revision
    }

    /// Discard the current mesh and rebuild it from the grid.
    pub fn rebuild_mesh(&mut self) {
        self.mesh = build_mesh(self);
        self.mesh_revision = next_mesh_revision();
        trace!(
            "Meshed chunk {}: {} faces",
            self.coord,
            self.mesh.face_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chunk_is_air() {
        let chunk = Chunk::new(IVec3::new(2, 0, -3));
        assert_eq!(chunk.solid_count(), 0);
        assert!(!chunk.has_solid());
        assert!(chunk.mesh().is_empty());
        assert_eq!(chunk.coord(), IVec3::new(2, 0, -3));
    }

    #[test]
    fn test_world_position() {
        let chunk = Chunk::new(IVec3::new(2, 0, -3));
        assert_eq!(chunk.world_position(), Vec3::new(32.0, 0.0, -48.0));
        assert_eq!(chunk.world_origin(), IVec3::new(32, 0, -48));
    }

    #[test]
    fn test_set_get_corners() {
        let mut chunk = Chunk::new(IVec3::ZERO);
        let corners = [
            (0, 0, 0),
            (CHUNK_SIZE_X - 1, 0, 0),
            (0, CHUNK_SIZE_Y - 1, 0),
            (0, 0, CHUNK_SIZE_Z - 1),
            (CHUNK_SIZE_X - 1, CHUNK_SIZE_Y - 1, CHUNK_SIZE_Z - 1),
        ];
        for (x, y, z) in corners {
            chunk.set(x, y, z, Voxel::Stone);
        }
        for (x, y, z) in corners {
            assert_eq!(chunk.get(x, y, z), Voxel::Stone, "({x}, {y}, {z})");
        }
        assert_eq!(chunk.solid_count(), corners.len());
    }

    #[test]
    fn test_grid_cells_do_not_alias() {
        let mut chunk = Chunk::new(IVec3::ZERO);
        chunk.set(1, 2, 3, Voxel::Grass);
        assert_eq!(chunk.get(1, 2, 3), Voxel::Grass);
        assert_eq!(chunk.get(3, 2, 1), Voxel::Air);
        assert_eq!(chunk.get(2, 1, 3), Voxel::Air);
        assert_eq!(chunk.get(1, 3, 2), Voxel::Air);
    }

    #[test]
    fn test_get_checked_bounds() {
        let mut chunk = Chunk::new(IVec3::ZERO);
        chunk.set(15, 255, 15, Voxel::Grass);
        assert_eq!(chunk.get_checked(IVec3::new(15, 255, 15)), Some(Voxel::Grass));
        assert_eq!(chunk.get_checked(IVec3::new(0, 0, 0)), Some(Voxel::Air));
        assert_eq!(chunk.get_checked(IVec3::new(16, 0, 0)), None);
        assert_eq!(chunk.get_checked(IVec3::new(0, -1, 0)), None);
    }

    #[test]
    fn test_fill_column_and_top() {
        let mut chunk = Chunk::new(IVec3::ZERO);
        assert_eq!(chunk.column_top(4, 5), 0);
        chunk.fill_column(4, 5, 0..10, Voxel::Stone);
        chunk.fill_column(4, 5, 10..14, Voxel::Grass);
        assert_eq!(chunk.column_top(4, 5), 14);
        assert_eq!(chunk.solid_count(), 14);
    }

    #[test]
    fn test_iter_order_and_len() {
        let mut chunk = Chunk::new(IVec3::ZERO);
        chunk.set(0, 0, 1, Voxel::Stone);
        let mut iter = chunk.iter();
        assert_eq!(iter.next(), Some((IVec3::new(0, 0, 0), Voxel::Air)));
        assert_eq!(iter.next(), Some((IVec3::new(0, 0, 1), Voxel::Stone)));
        assert_eq!(chunk.iter().count(), VOXELS_PER_CHUNK);
    }

    #[test]
    fn test_rebuild_replaces_mesh() {
        let mut chunk = Chunk::new(IVec3::ZERO);
        chunk.set(5, 5, 5, Voxel::Stone);
        let initial = chunk.mesh_revision();
        chunk.rebuild_mesh();
        assert_eq!(chunk.mesh().vertex_count(), 36);
        let first = chunk.mesh_revision();
        assert_ne!(first, initial);

        chunk.set(5, 5, 5, Voxel::Air);
        chunk.rebuild_mesh();
        assert!(chunk.mesh().is_empty());
        assert_ne!(chunk.mesh_revision(), first);
    }

    #[test]
    fn test_mesh_revision_unique_per_chunk() {
        let a = Chunk::new(IVec3::new(3, 0, 3));
        let b = Chunk::new(IVec3::new(3, 0, 3));
        assert_ne!(a.mesh_revision(), b.mesh_revision());

        let mut c = Chunk::new(IVec3::new(3, 0, 3));
        let mut d = Chunk::new(IVec3::new(3, 0, 3));
        c.rebuild_mesh();
        d.rebuild_mesh();
        assert_ne!(c.mesh_revision(), d.mesh_revision());
    }
}
