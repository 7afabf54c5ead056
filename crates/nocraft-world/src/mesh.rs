use glam::{IVec3, Vec3, Vec4};
use nocraft_core::constants::{CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, VERTICES_PER_FACE};
use nocraft_core::direction::Direction;

use crate::chunk::Chunk;

/// Corner offsets from a voxel center for one face: two triangles, no index buffer.
type FaceCorners = [Vec3; VERTICES_PER_FACE];

const fn v(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

/// Faces in emission order with their fixed corner order.
const FACES: [(Direction, FaceCorners); 6] = [
    (
        Direction::South,
        [
            v(-0.5, -0.5, 0.5),
            v(0.5, -0.5, 0.5),
            v(0.5, 0.5, 0.5),
            v(0.5, 0.5, 0.5),
            v(-0.5, 0.5, 0.5),
            v(-0.5, -0.5, 0.5),
        ],
    ),
    (
        Direction::North,
        [
            v(-0.5, -0.5, -0.5),
            v(0.5, -0.5, -0.5),
            v(0.5, 0.5, -0.5),
            v(0.5, 0.5, -0.5),
            v(-0.5, 0.5, -0.5),
            v(-0.5, -0.5, -0.5),
        ],
    ),
    (
        Direction::West,
        [
            v(-0.5, 0.5, 0.5),
            v(-0.5, 0.5, -0.5),
            v(-0.5, -0.5, -0.5),
            v(-0.5, -0.5, -0.5),
            v(-0.5, -0.5, 0.5),
            v(-0.5, 0.5, 0.5),
        ],
    ),
    (
        Direction::East,
        [
            v(0.5, 0.5, 0.5),
            v(0.5, 0.5, -0.5),
            v(0.5, -0.5, -0.5),
            v(0.5, -0.5, -0.5),
            v(0.5, -0.5, 0.5),
            v(0.5, 0.5, 0.5),
        ],
    ),
    (
        Direction::Up,
        [
            v(-0.5, 0.5, -0.5),
            v(0.5, 0.5, -0.5),
            v(0.5, 0.5, 0.5),
            v(0.5, 0.5, 0.5),
            v(-0.5, 0.5, 0.5),
            v(-0.5, 0.5, -0.5),
        ],
    ),
    (
        Direction::Down,
        [
            v(-0.5, -0.5, -0.5),
            v(0.5, -0.5, -0.5),
            v(0.5, -0.5, 0.5),
            v(0.5, -0.5, 0.5),
            v(-0.5, -0.5, 0.5),
            v(-0.5, -0.5, -0.5),
        ],
    ),
];

/// Unindexed triangle list for one chunk, in chunk-local space.
///
/// `positions` and `colors` are parallel: entry i of each describes vertex i.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    colors: Vec<Vec4>,
}

impl Mesh {
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.positions.len() / VERTICES_PER_FACE
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn push_face(&mut self, center: Vec3, corners: &FaceCorners, color: Vec4) {
        self.positions.extend(corners.iter().map(|&c| center + c));
        self.colors.extend(std::iter::repeat(color).take(VERTICES_PER_FACE));
    }
}

/// A face is visible when its neighbor is Air or lies outside this chunk.
/// Neighboring chunks are never consulted.
fn face_exposed(chunk: &Chunk, pos: IVec3, dir: Direction) -> bool {
    chunk
        .get_checked(pos + dir.offset())
        .map_or(true, |neighbor| !neighbor.is_solid())
}

/// Build the face-culled mesh for `chunk`.
///
/// Cells are walked x, then y, then z; each solid cell contributes its exposed
/// faces in `FACES` order. Vertices are centered on integer local coordinates.
pub fn build_mesh(chunk: &Chunk) -> Mesh {
    let mut mesh = Mesh::default();

    for x in 0..CHUNK_SIZE_X {
        for y in 0..CHUNK_SIZE_Y {
            for z in 0..CHUNK_SIZE_Z {
                let voxel = chunk.get(x, y, z);
                if !voxel.is_solid() {
                    continue;
                }
                let pos = IVec3::new(x as i32, y as i32, z as i32);
                let center = pos.as_vec3();
                let color = voxel.color();
                for (dir, corners) in &FACES {
                    if face_exposed(chunk, pos, *dir) {
                        mesh.push_face(center, corners, color);
                    }
                }
            }
        }
    }

    mesh
}
