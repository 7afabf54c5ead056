pub mod constants;
pub mod direction;
pub mod error;
pub mod math;
pub mod types;
pub mod voxel;

pub use direction::Direction;
pub use error::VoxelError;
pub use types::{ChunkCoord, LocalCoord, WorldCoord};
pub use voxel::Voxel;
