use std::mem::{offset_of, size_of};

use glam::Vec3;
use nocraft_world::Mesh;

/// Interleaved chunk vertex: position then RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ChunkVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl ChunkVertex {
    /// Byte stride between consecutive vertices.
    pub const STRIDE: usize = size_of::<Self>();
    pub const POSITION_OFFSET: usize = offset_of!(Self, position);
    pub const COLOR_OFFSET: usize = offset_of!(Self, color);

    pub fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

/// Byte strides of the split layout: one buffer of 3 x f32, one of 4 x f32.
pub const POSITION_STRIDE: usize = 3 * size_of::<f32>();
pub const COLOR_STRIDE: usize = 4 * size_of::<f32>();

/// Zip a mesh's parallel arrays into interleaved vertices.
pub fn interleave(mesh: &Mesh) -> Vec<ChunkVertex> {
    mesh.positions()
        .iter()
        .zip(mesh.colors())
        .map(|(p, c)| ChunkVertex::new(p.to_array(), c.to_array()))
        .collect()
}

/// Per-chunk draw uniforms. The translation is padded to a vec4 for uniform alignment.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ChunkUniforms {
    pub translation: [f32; 4],
}

impl ChunkUniforms {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation: translation.extend(0.0).to_array(),
        }
    }
}
