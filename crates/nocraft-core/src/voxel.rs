use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::constants::VOXEL_TYPES;
use crate::error::VoxelError;

/// Material code of a single grid cell. Air = 0 and is never solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Voxel {
    #[default]
    Air = 0,
    Grass = 1,
    Stone = 2,
}

/// RGBA color per voxel code, indexed by the code. Air's entry is never emitted.
pub const VOXEL_COLORS: [Vec4; VOXEL_TYPES] = [
    Vec4::new(0.00, 0.00, 0.00, 0.00),
    Vec4::new(0.22, 0.54, 0.18, 1.00),
    Vec4::new(0.53, 0.53, 0.53, 1.00),
];

/// All voxel codes in code order.
pub const ALL_VOXELS: [Voxel; VOXEL_TYPES] = [Voxel::Air, Voxel::Grass, Voxel::Stone];

impl Voxel {
    /// Whether this voxel occludes its neighbors and produces geometry.
    pub fn is_solid(self) -> bool {
        self != Voxel::Air
    }

    /// Mapped vertex color for this voxel type.
    pub fn color(self) -> Vec4 {
        VOXEL_COLORS[self as usize]
    }

    /// Raw code as stored in the grid.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable name for reports and debug output.
    pub fn name(self) -> &'static str {
        match self {
            Voxel::Air => "Air",
            Voxel::Grass => "Grass",
            Voxel::Stone => "Stone",
        }
    }
}

impl TryFrom<u8> for Voxel {
    type Error = VoxelError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Voxel::Air),
            1 => Ok(Voxel::Grass),
            2 => Ok(Voxel::Stone),
            other => Err(VoxelError::UnknownCode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_is_zero_and_not_solid() {
        assert_eq!(Voxel::Air.code(), 0);
        assert_eq!(Voxel::default(), Voxel::Air);
        assert!(!Voxel::Air.is_solid());
        assert!(Voxel::Grass.is_solid());
        assert!(Voxel::Stone.is_solid());
    }

    #[test]
    fn test_color_table_indexed_by_code() {
        for voxel in ALL_VOXELS {
            assert_eq!(voxel.color(), VOXEL_COLORS[voxel.code() as usize]);
        }
        assert_eq!(Voxel::Grass.color(), Vec4::new(0.22, 0.54, 0.18, 1.0));
        assert_eq!(Voxel::Stone.color(), Vec4::new(0.53, 0.53, 0.53, 1.0));
    }

    #[test]
    fn test_solid_colors_are_opaque_and_distinct() {
        assert_eq!(Voxel::Grass.color().w, 1.0);
        assert_eq!(Voxel::Stone.color().w, 1.0);
        assert_ne!(Voxel::Grass.color(), Voxel::Stone.color());
    }

    #[test]
    fn test_try_from_code() {
        for voxel in ALL_VOXELS {
            assert_eq!(Voxel::try_from(voxel.code()), Ok(voxel));
        }
        assert_eq!(Voxel::try_from(3), Err(VoxelError::UnknownCode(3)));
        assert_eq!(Voxel::try_from(255), Err(VoxelError::UnknownCode(255)));
    }
}
