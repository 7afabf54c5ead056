use thiserror::Error;

/// Errors raised by the pseudorandom engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NoiseError {
    #[error("xorshift state must be non-zero")]
    ZeroState,
}
