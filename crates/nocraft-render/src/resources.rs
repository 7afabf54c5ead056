//! Renderer-side ownership of chunk vertex buffers.
//!
//! Chunks only hold CPU-side meshes. `ChunkResourceTable` mirrors loaded chunks
//! into GPU buffers keyed by chunk coordinate, tracking each chunk's mesh revision
//! so rebuilt meshes are re-uploaded and unloaded chunks release their buffers.

use std::collections::HashMap;

use glam::Vec3;
use log::{debug, info};
use nocraft_core::types::ChunkCoord;
use nocraft_world::{Chunk, World};

use crate::vertex::{interleave, ChunkUniforms};

/// Minimal buffer allocation interface a graphics backend provides.
pub trait GpuBackend {
    type Buffer;

    /// Allocate a buffer initialized with `contents`.
    fn create_buffer(&mut self, label: &str, contents: &[u8]) -> Self::Buffer;

    fn destroy_buffer(&mut self, buffer: Self::Buffer);
}

impl<B: GpuBackend + ?Sized> GpuBackend for &mut B {
    type Buffer = B::Buffer;

    fn create_buffer(&mut self, label: &str, contents: &[u8]) -> Self::Buffer {
        (**self).create_buffer(label, contents)
    }

    fn destroy_buffer(&mut self, buffer: Self::Buffer) {
        (**self).destroy_buffer(buffer)
    }
}

/// Handle to a buffer owned by `HeadlessBackend`.
#[derive(Debug, PartialEq, Eq)]
pub struct HeadlessBuffer {
    id: u64,
    size: usize,
}

impl HeadlessBuffer {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// Backend that records allocations without touching a GPU.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    live: HashMap<u64, (String, usize)>,
    created: usize,
    destroyed: usize,
    bytes_uploaded: usize,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_buffers(&self) -> usize {
        self.live.len()
    }

    /// Bytes currently held by live buffers.
    pub fn live_bytes(&self) -> usize {
        self.live.values().map(|(_, size)| size).sum()
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    /// Total bytes passed to `create_buffer` over the backend's lifetime.
    pub fn bytes_uploaded(&self) -> usize {
        self.bytes_uploaded
    }

    /// Labels of live buffers, sorted.
    pub fn live_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.live.values().map(|(l, _)| l.clone()).collect();
        labels.sort();
        labels
    }
}

impl GpuBackend for HeadlessBackend {
    type Buffer = HeadlessBuffer;

    fn create_buffer(&mut self, label: &str, contents: &[u8]) -> HeadlessBuffer {
        let id = self.next_id;
        self.next_id += 1;
        self.created += 1;
        self.bytes_uploaded += contents.len();
        self.live.insert(id, (label.to_string(), contents.len()));
        HeadlessBuffer {
            id,
            size: contents.len(),
        }
    }

    fn destroy_buffer(&mut self, buffer: HeadlessBuffer) {
        if self.live.remove(&buffer.id).is_some() {
            self.destroyed += 1;
        }
    }
}

/// How mesh vertices are laid out in GPU memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertexLayout {
    /// One buffer of positions (3 x f32) and one of colors (4 x f32).
    #[default]
    Split,
    /// A single buffer of `ChunkVertex`.
    Interleaved,
}

enum VertexBuffers<Buf> {
    Split { positions: Buf, colors: Buf },
    Interleaved { vertices: Buf },
}

struct ChunkResources<Buf> {
    /// None for chunks whose mesh is empty.
    vertices: Option<VertexBuffers<Buf>>,
    uniforms: Option<Buf>,
    vertex_count: usize,
    translation: Vec3,
    mesh_revision: u64,
}

/// One chunk's draw call: bind its buffers, set the translation, draw `vertex_count`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkDraw {
    pub coord: ChunkCoord,
    pub translation: Vec3,
    pub vertex_count: usize,
}

/// What a `sync` call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub uploaded: usize,
    pub released: usize,
}

/// GPU buffers for every uploaded chunk, keyed by chunk coordinate.
///
/// Dropping the table destroys every buffer it still holds.
pub struct ChunkResourceTable<B: GpuBackend> {
    backend: B,
    layout: VertexLayout,
    entries: HashMap<ChunkCoord, ChunkResources<B::Buffer>>,
}

impl<B: GpuBackend> ChunkResourceTable<B> {
    pub fn new(backend: B) -> Self {
        Self::with_layout(backend, VertexLayout::default())
    }

    pub fn with_layout(backend: B, layout: VertexLayout) -> Self {
        Self {
            backend,
            layout,
            entries: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.entries.contains_key(coord)
    }

    /// Upload `chunk`'s current mesh, destroying any buffers held for its coordinate.
    pub fn upload(&mut self, chunk: &Chunk) {
        let coord = chunk.coord();
        self.release(&coord);

        let mesh = chunk.mesh();
        let translation = chunk.world_position();
        let (vertices, uniforms) = if mesh.is_empty() {
            (None, None)
        } else {
            let vertices = match self.layout {
                VertexLayout::Split => VertexBuffers::Split {
                    positions: self.backend.create_buffer(
                        "chunk-positions",
                        bytemuck::cast_slice(mesh.positions()),
                    ),
                    colors: self
                        .backend
                        .create_buffer("chunk-colors", bytemuck::cast_slice(mesh.colors())),
                },
                VertexLayout::Interleaved => VertexBuffers::Interleaved {
                    vertices: self.backend.create_buffer(
                        "chunk-vertices",
                        bytemuck::cast_slice(&interleave(mesh)),
                    ),
                },
            };
            let uniforms = self.backend.create_buffer(
                "chunk-uniforms",
                bytemuck::bytes_of(&ChunkUniforms::from_translation(translation)),
            );
            (Some(vertices), Some(uniforms))
        };

        debug!(
            "Uploaded chunk {coord}: {} vertices",
            mesh.vertex_count()
        );
        self.entries.insert(
            coord,
            ChunkResources {
                vertices,
                uniforms,
                vertex_count: mesh.vertex_count(),
                translation,
                mesh_revision: chunk.mesh_revision(),
            },
        );
    }

    /// Destroy the buffers held for `coord`. Returns whether anything was held.
    pub fn release(&mut self, coord: &ChunkCoord) -> bool {
        let Some(entry) = self.entries.remove(coord) else {
            return false;
        };
        match entry.vertices {
            Some(VertexBuffers::Split { positions, colors }) => {
                self.backend.destroy_buffer(positions);
                self.backend.destroy_buffer(colors);
            }
            Some(VertexBuffers::Interleaved { vertices }) => {
                self.backend.destroy_buffer(vertices);
            }
            None => {}
        }
        if let Some(uniforms) = entry.uniforms {
            self.backend.destroy_buffer(uniforms);
        }
        true
    }

    /// Bring the table in line with `world`: upload chunks that are new or whose
    /// mesh was rebuilt since their last upload, release chunks no longer loaded.
    pub fn sync(&mut self, world: &World) -> SyncSummary {
        let mut summary = SyncSummary::default();

        let stale: Vec<ChunkCoord> = self
            .entries
            .keys()
            .filter(|coord| world.chunk(**coord).is_none())
            .copied()
            .collect();
        for coord in stale {
            self.release(&coord);
            summary.released += 1;
        }

        for (coord, chunk) in world.chunk_map().iter() {
            let current = self
                .entries
                .get(coord)
                .is_some_and(|e| e.mesh_revision == chunk.mesh_revision());
            if !current {
                self.upload(chunk);
                summary.uploaded += 1;
            }
        }

        if summary != SyncSummary::default() {
            info!(
                "Synced chunk buffers: {} uploaded, {} released, {} resident",
                summary.uploaded,
                summary.released,
                self.entries.len()
            );
        }
        summary
    }

    /// Draw calls for every uploaded chunk with geometry, sorted by coordinate.
    pub fn draw_list(&self) -> Vec<ChunkDraw> {
        let mut draws: Vec<ChunkDraw> = self
            .entries
            .iter()
            .filter(|(_, e)| e.vertex_count > 0)
            .map(|(coord, e)| ChunkDraw {
                coord: *coord,
                translation: e.translation,
                vertex_count: e.vertex_count,
            })
            .collect();
        draws.sort_by_key(|d| (d.coord.x, d.coord.y, d.coord.z));
        draws
    }

    /// Release every chunk's buffers.
    pub fn clear(&mut self) {
        let coords: Vec<ChunkCoord> = self.entries.keys().copied().collect();
        for coord in coords {
            self.release(&coord);
        }
    }

    /// Release everything and hand the backend back.
    pub fn into_backend(mut self) -> B
    where
        B: Default,
    {
        self.clear();
        std::mem::take(&mut self.backend)
    }
}

impl<B: GpuBackend> Drop for ChunkResourceTable<B> {
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            debug!("Dropping chunk table with {} resident chunks", self.entries.len());
            self.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::{ChunkVertex, COLOR_STRIDE, POSITION_STRIDE};
    use glam::IVec3;
    use nocraft_core::voxel::Voxel;
    use nocraft_world::WorldConfig;

    fn single_voxel_chunk(coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(coord);
        chunk.set(0, 0, 0, Voxel::Stone);
        chunk.rebuild_mesh();
        chunk
    }

    fn small_world() -> World {
        let mut world = World::new(WorldConfig {
            load_radius: 1,
            ..WorldConfig::default()
        });
        world.load();
        world
    }

    #[test]
    fn test_upload_split_layout() {
        let mut table = ChunkResourceTable::new(HeadlessBackend::new());
        table.upload(&single_voxel_chunk(IVec3::new(1, 0, -2)));

        let backend = table.backend();
        assert_eq!(backend.live_buffers(), 3);
        assert_eq!(
            backend.live_bytes(),
            36 * POSITION_STRIDE + 36 * COLOR_STRIDE + 16
        );
        assert_eq!(
            backend.live_labels(),
            vec!["chunk-colors", "chunk-positions", "chunk-uniforms"]
        );

        let draws = table.draw_list();
        assert_eq!(
            draws,
            vec![ChunkDraw {
                coord: IVec3::new(1, 0, -2),
                translation: Vec3::new(16.0, 0.0, -32.0),
                vertex_count: 36,
            }]
        );
    }

    #[test]
    fn test_upload_interleaved_layout() {
        let mut table =
            ChunkResourceTable::with_layout(HeadlessBackend::new(), VertexLayout::Interleaved);
        table.upload(&single_voxel_chunk(IVec3::ZERO));
        assert_eq!(table.backend().live_buffers(), 2);
        assert_eq!(table.backend().live_bytes(), 36 * ChunkVertex::STRIDE + 16);
    }

    #[test]
    fn test_reupload_replaces_buffers() {
        let mut table = ChunkResourceTable::new(HeadlessBackend::new());
        let mut chunk = single_voxel_chunk(IVec3::ZERO);
        table.upload(&chunk);
        chunk.set(5, 5, 5, Voxel::Grass);
        chunk.rebuild_mesh();
        table.upload(&chunk);

        assert_eq!(table.len(), 1);
        assert_eq!(table.backend().live_buffers(), 3);
        assert_eq!(table.backend().destroyed(), 3);
        assert_eq!(table.draw_list()[0].vertex_count, 72);
    }

    #[test]
    fn test_empty_mesh_allocates_nothing() {
        let mut table = ChunkResourceTable::new(HeadlessBackend::new());
        table.upload(&Chunk::new(IVec3::ZERO));
        assert!(table.contains(&IVec3::ZERO));
        assert_eq!(table.backend().live_buffers(), 0);
        assert!(table.draw_list().is_empty());
        assert!(table.release(&IVec3::ZERO));
        assert!(!table.release(&IVec3::ZERO));
    }

    #[test]
    fn test_sync_tracks_world() {
        let mut world = small_world();
        let mut table = ChunkResourceTable::new(HeadlessBackend::new());

        let first = table.sync(&world);
        assert_eq!(first, SyncSummary { uploaded: 9, released: 0 });
        assert_eq!(table.draw_list().len(), 9);

        assert_eq!(table.sync(&world), SyncSummary::default());

        world.unload_chunk(IVec3::new(-1, 0, -1));
        world.load_chunk(IVec3::new(4, 0, 4));
        assert_eq!(table.sync(&world), SyncSummary { uploaded: 1, released: 1 });
        assert!(!table.contains(&IVec3::new(-1, 0, -1)));
        assert!(table.contains(&IVec3::new(4, 0, 4)));

        world.reseed(77);
        assert_eq!(table.sync(&world), SyncSummary { uploaded: 9, released: 0 });
        let world_vertices = world.stats().vertices;
        let drawn: usize = table.draw_list().iter().map(|d| d.vertex_count).sum();
        assert_eq!(drawn, world_vertices);
    }

    #[test]
    fn test_sync_reuploads_chunk_reloaded_after_reseed() {
        let coord = IVec3::new(3, 0, 3);
        let mut world = World::new(WorldConfig::default());
        world.load_chunk(coord);
        let mut table = ChunkResourceTable::new(HeadlessBackend::new());
        table.sync(&world);
        let before = table.draw_list()[0].vertex_count;

        world.unload_chunk(coord);
        world.reseed(999);
        world.load_chunk(coord);
        let now = world.chunk(coord).expect("reloaded").mesh().vertex_count();
        assert_ne!(before, now, "reseed should change the terrain at {coord}");

        assert_eq!(table.sync(&world), SyncSummary { uploaded: 1, released: 0 });
        assert_eq!(table.draw_list()[0].vertex_count, now);
        assert_eq!(table.backend().live_buffers(), 3);
    }

    #[test]
    fn test_drop_releases_buffers() {
        let world = small_world();
        let mut backend = HeadlessBackend::new();
        {
            let mut table = ChunkResourceTable::new(&mut backend);
            table.sync(&world);
            assert_eq!(table.len(), 9);
        }
        assert_eq!(backend.live_buffers(), 0);
        assert!(backend.created() > 0);
        assert_eq!(backend.created(), backend.destroyed());
    }

    #[test]
    fn test_draw_translation_matches_chunk_origin() {
        let world = small_world();
        let mut table = ChunkResourceTable::new(HeadlessBackend::new());
        table.sync(&world);
        for draw in table.draw_list() {
            let chunk = world.chunk(draw.coord).expect("loaded");
            assert_eq!(draw.translation, chunk.world_position());
            assert_eq!(draw.vertex_count, chunk.mesh().vertex_count());
        }
    }

    #[test]
    fn test_clear_releases_everything() {
        let world = small_world();
        let mut table = ChunkResourceTable::new(HeadlessBackend::new());
        table.sync(&world);
        assert!(table.backend().live_buffers() > 0);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.backend().live_buffers(), 0);

        table.sync(&world);
        let backend = table.into_backend();
        assert_eq!(backend.live_buffers(), 0);
        assert_eq!(backend.created(), backend.destroyed());
    }
}
