use serde::{Deserialize, Serialize};

use crate::simplex::{NoiseField, NoisePoint};

/// How each octave's sample is shaped before it is accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FractalKind {
    /// Raw samples: fractional Brownian motion.
    #[default]
    Fbm,
    /// `|sample| * 2 - 1`: rounded, billowy ridges.
    Billow,
}

/// Octave stack parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalParams {
    /// Number of noise layers. Zero yields a flat 0.0.
    pub octaves: u32,
    /// Frequency multiplier per octave.
    pub lacunarity: f32,
    /// Amplitude multiplier per octave.
    pub gain: f32,
    pub kind: FractalKind,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            lacunarity: 2.0,
            gain: 0.5,
            kind: FractalKind::Fbm,
        }
    }
}

impl FractalParams {
    pub fn fbm(octaves: u32, lacunarity: f32, gain: f32) -> Self {
        Self {
            octaves,
            lacunarity,
            gain,
            kind: FractalKind::Fbm,
        }
    }

    pub fn billow(octaves: u32, lacunarity: f32, gain: f32) -> Self {
        Self {
            octaves,
            lacunarity,
            gain,
            kind: FractalKind::Billow,
        }
    }
}

impl NoiseField {
    /// Sum `params.octaves` layers of noise and divide by the summed amplitudes,
    /// keeping the result in the base noise range regardless of octave count.
    pub fn fractal<P: NoisePoint>(&self, point: P, params: &FractalParams) -> f32 {
        let mut point = point;
        let mut sum = 0.0f32;
        let mut amplitude = 1.0f32;
        let mut range = 0.0f32;

        for _ in 0..params.octaves {
            let sample = self.sample(point);
            let shaped = match params.kind {
                FractalKind::Fbm => sample,
                FractalKind::Billow => sample.abs() * 2.0 - 1.0,
            };
            sum += shaped * amplitude;
            range += amplitude;
            amplitude *= params.gain;
            point = point * params.lacunarity;
        }

        if range == 0.0 {
            return 0.0;
        }
        sum / range
    }
}
