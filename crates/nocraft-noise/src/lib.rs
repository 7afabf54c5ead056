//! Deterministic noise for terrain generation: a seedable xorshift engine, simplex
//! gradient noise in 2D/3D/4D, and fractal octave stacking.

pub mod error;
pub mod fractal;
pub mod gradient;
pub mod rng;
pub mod simplex;

pub use error::NoiseError;
pub use fractal::{FractalKind, FractalParams};
pub use rng::{SplitMix64, Xorshift64};
pub use simplex::{NoiseField, NoisePoint};
