//! Seedable xorshift64* generator used to shuffle the noise permutation table.
//!
//! The state is a single u64, so copying a generator is cheap. Xorshift* has low
//! linear complexity in the low bits; those are discarded when producing floats
//! and 32-bit integers. The initial state comes from one SplitMix64 step so that
//! adjacent seeds start from uncorrelated states.

use glam::{Vec2, Vec3, Vec4};

use crate::error::NoiseError;

/// Seed used by `Xorshift64::default()`.
pub const DEFAULT_SEED: u64 = 5;

const SPLITMIX_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;
const XORSHIFT_MULTIPLIER: u64 = 0x2545_f491_4f6c_dd1d;

/// SplitMix64, used only to derive xorshift states from user seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut s = self.state;
        self.state = s.wrapping_add(SPLITMIX_GAMMA);
        s = (s ^ (s >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        s = (s ^ (s >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        s ^ (s >> 31)
    }
}

/// xorshift64* generator. The state is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Xorshift64 {
    state: u64,
}

impl Default for Xorshift64 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Xorshift64 {
    /// Derive the state from `seed` through SplitMix64.
    ///
    /// The first SplitMix64 output mixes the raw seed, and the mix maps zero to
    /// zero. Seed 0 therefore draws a second value instead.
    pub fn new(seed: u64) -> Self {
        let mut mix = SplitMix64::new(seed);
        let mut state = mix.next_u64();
        while state == 0 {
            state = mix.next_u64();
        }
        Self { state }
    }

    /// Use `state` verbatim. Zero is a fixed point of xorshift and is rejected.
    pub fn from_state(state: u64) -> Result<Self, NoiseError> {
        if state == 0 {
            return Err(NoiseError::ZeroState);
        }
        Ok(Self { state })
    }

    /// Current internal state.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Uniformly random u64.
    pub fn next_u64(&mut self) -> u64 {
        debug_assert!(self.state != 0, "xorshift: invalid zero state");
        let mut s = self.state;
        s ^= s >> 12;
        s ^= s << 25;
        s ^= s >> 27;
        self.state = s;
        s.wrapping_mul(XORSHIFT_MULTIPLIER)
    }

    /// Uniformly random u32 taken from the high bits.
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniformly random f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        unit_f64(self.next_u64())
    }

    /// Uniformly random f32 in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        unit_f32(self.next_u32())
    }

    /// Uniformly random f64 in [a, b).
    pub fn range_f64(&mut self, a: f64, b: f64) -> f64 {
        self.next_f64() * (b - a) + a
    }

    /// Uniformly random f32 in [a, b).
    pub fn range_f32(&mut self, a: f32, b: f32) -> f32 {
        self.next_f32() * (b - a) + a
    }

    pub fn next_vec2(&mut self) -> Vec2 {
        Vec2::new(self.next_f32(), self.next_f32())
    }

    pub fn next_vec3(&mut self) -> Vec3 {
        Vec3::new(self.next_f32(), self.next_f32(), self.next_f32())
    }

    pub fn next_vec4(&mut self) -> Vec4 {
        Vec4::new(
            self.next_f32(),
            self.next_f32(),
            self.next_f32(),
            self.next_f32(),
        )
    }

    /// Random vector with every component in [a, b) of the matching component.
    pub fn range_vec2(&mut self, a: Vec2, b: Vec2) -> Vec2 {
        self.next_vec2() * (b - a) + a
    }

    pub fn range_vec3(&mut self, a: Vec3, b: Vec3) -> Vec3 {
        self.next_vec3() * (b - a) + a
    }

    pub fn range_vec4(&mut self, a: Vec4, b: Vec4) -> Vec4 {
        self.next_vec4() * (b - a) + a
    }

    /// Random 2D vector with length less than 1.
    pub fn in_unit_circle(&mut self) -> Vec2 {
        loop {
            let v = self.range_vec2(Vec2::NEG_ONE, Vec2::ONE);
            if v.length_squared() < 1.0 {
                return v;
            }
        }
    }

    /// Random 3D vector with length less than 1.
    pub fn in_unit_sphere(&mut self) -> Vec3 {
        loop {
            let v = self.range_vec3(Vec3::NEG_ONE, Vec3::ONE);
            if v.length_squared() < 1.0 {
                return v;
            }
        }
    }
}

/// Pack the top 52 bits into the mantissa of a double in [1, 2), then shift down.
fn unit_f64(bits: u64) -> f64 {
    f64::from_bits((0x3ff_u64 << 52) | (bits >> 12)) - 1.0
}

/// Pack the top 23 bits into the mantissa of a float in [1, 2), then shift down.
fn unit_f32(bits: u32) -> f32 {
    f32::from_bits(0x3f80_0000 | (bits >> 9)) - 1.0
}
