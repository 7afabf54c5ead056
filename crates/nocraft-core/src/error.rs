use thiserror::Error;

/// Errors raised when decoding voxel data from raw codes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoxelError {
    #[error("unknown voxel type code {0}")]
    UnknownCode(u8),
}
