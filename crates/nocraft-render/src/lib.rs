//! GPU-facing side of chunk rendering: vertex layouts and per-chunk buffer ownership.

pub mod resources;
pub mod vertex;

pub use resources::{
    ChunkDraw, ChunkResourceTable, GpuBackend, HeadlessBackend, HeadlessBuffer, SyncSummary,
    VertexLayout,
};
pub use vertex::{ChunkUniforms, ChunkVertex};
