//! Simplex gradient noise in 2, 3 and 4 dimensions over an owned permutation table.
//!
//! Based on Stefan Gustavson's reference implementation; the 4D variant uses his
//! rank-ordering method to pick the simplex. Results stay within roughly [-1, 1].

use glam::{IVec2, IVec3, IVec4, Vec2, Vec3, Vec4};
use log::debug;

use crate::gradient::{GRAD3, GRAD4};
use crate::rng::Xorshift64;

/// 0.5 * (sqrt(3) - 1)
const F2: f32 = 0.366_025_42;
/// (3 - sqrt(3)) / 6
const G2: f32 = 0.211_324_87;
const F3: f32 = 1.0 / 3.0;
const G3: f32 = 1.0 / 6.0;
/// (sqrt(5) - 1) / 4
const F4: f32 = 0.309_017;
/// (5 - sqrt(5)) / 20
const G4: f32 = 0.138_196_6;

const RADIUS_2D: f32 = 0.5;
const RADIUS_3D: f32 = 0.6;
const RADIUS_4D: f32 = 0.6;

const SCALE_2D: f32 = 70.0;
const SCALE_3D: f32 = 32.0;
const SCALE_4D: f32 = 27.0;

/// Number of distinct permutation entries. The table stores them twice.
pub const PERM_SIZE: usize = 256;

/// Ken Perlin's reference permutation; the table state before any reseed.
pub const DEFAULT_PERMUTATION: [u8; PERM_SIZE] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, //
    140, 36, 103, 30, 69, 142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, //
    247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219, 203, 117, 35, 11, 32, //
    57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175, //
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, //
    60, 211, 133, 230, 220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, //
    65, 25, 63, 161, 1, 216, 80, 73, 209, 76, 132, 187, 208, 89, 18, 169, //
    200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173, 186, 3, 64, //
    52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, //
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, //
    119, 248, 152, 2, 44, 154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9, //
    129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232, 178, 185, 112, 104, //
    218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162, 241, //
    81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, //
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, //
    222, 114, 67, 29, 24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180, //
];

/// Deterministic simplex noise source.
///
/// Owns its permutation table, doubled to 512 entries so that chained lookups of
/// the form `perm[h + perm[..]]` never wrap. Evaluation borrows the field shared;
/// reseeding needs `&mut self`, so no evaluation can observe a half-shuffled table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseField {
    perm: [u8; PERM_SIZE * 2],
}

impl Default for NoiseField {
    fn default() -> Self {
        let mut perm = [0u8; PERM_SIZE * 2];
        perm[..PERM_SIZE].copy_from_slice(&DEFAULT_PERMUTATION);
        perm[PERM_SIZE..].copy_from_slice(&DEFAULT_PERMUTATION);
        Self { perm }
    }
}

impl NoiseField {
    /// A field whose table has been shuffled with `seed`.
    pub fn new(seed: u64) -> Self {
        let mut field = Self::default();
        field.reseed(seed);
        field
    }

    /// Shuffle the permutation table in place with a Fisher-Yates pass driven by
    /// `Xorshift64::new(seed)`, then mirror it into the upper half.
    ///
    /// The shuffle starts from the current table, so reseeding is path dependent:
    /// `reseed(1); reseed(2)` differs from a lone `reseed(2)`.
    pub fn reseed(&mut self, seed: u64) {
        let mut rng = Xorshift64::new(seed);
        for i in (1..PERM_SIZE).rev() {
            let target = (rng.range_f32(0.0, i as f32 + 1.0) as usize).min(i);
            self.perm.swap(i, target);
        }
        self.perm.copy_within(..PERM_SIZE, PERM_SIZE);
        debug!("Reseeded noise permutation table with seed {seed}");
    }

    /// The full doubled permutation table.
    pub fn permutation(&self) -> &[u8; PERM_SIZE * 2] {
        &self.perm
    }

    #[inline]
    fn p(&self, index: usize) -> usize {
        self.perm[index] as usize
    }

    /// Sample any supported point type.
    pub fn sample<P: NoisePoint>(&self, point: P) -> f32 {
        point.sample(self)
    }

    /// 2D simplex noise.
    pub fn noise2(&self, v: Vec2) -> f32 {
        // Skew the input space to find the simplex cell.
        let s = (v.x + v.y) * F2;
        let i = IVec2::new(fast_floor(v.x + s), fast_floor(v.y + s));
        let t = (i.x as f32 + i.y as f32) * G2;
        let x0 = v - (i.as_vec2() - Vec2::splat(t));

        // The simplex is one of two triangles.
        let i1 = if x0.x > x0.y { IVec2::X } else { IVec2::Y };

        let x1 = x0 - i1.as_vec2() + Vec2::splat(G2);
        let x2 = x0 - Vec2::ONE + Vec2::splat(2.0 * G2);

        let h = i & 255;
        let (hx, hy) = (h.x as usize, h.y as usize);
        let (i1x, i1y) = (i1.x as usize, i1.y as usize);
        let gi0 = self.p(hx + self.p(hy)) % 12;
        let gi1 = self.p(hx + i1x + self.p(hy + i1y)) % 12;
        let gi2 = self.p(hx + 1 + self.p(hy + 1)) % 12;

        let n0 = corner(RADIUS_2D, x0.length_squared(), GRAD3[gi0].truncate().dot(x0));
        let n1 = corner(RADIUS_2D, x1.length_squared(), GRAD3[gi1].truncate().dot(x1));
        let n2 = corner(RADIUS_2D, x2.length_squared(), GRAD3[gi2].truncate().dot(x2));

        SCALE_2D * (n0 + n1 + n2)
    }

    /// 3D simplex noise.
    pub fn noise3(&self, v: Vec3) -> f32 {
        let s = (v.x + v.y + v.z) * F3;
        let i = IVec3::new(
            fast_floor(v.x + s),
            fast_floor(v.y + s),
            fast_floor(v.z + s),
        );
        let t = (i.x as f32 + i.y as f32 + i.z as f32) * G3;
        let x0 = v - (i.as_vec3() - Vec3::splat(t));

        // The simplex is one of six tetrahedra; walk the axes by descending offset.
        let (i1, i2) = if x0.x >= x0.y {
            if x0.y >= x0.z {
                (IVec3::new(1, 0, 0), IVec3::new(1, 1, 0))
            } else if x0.x >= x0.z {
                (IVec3::new(1, 0, 0), IVec3::new(1, 0, 1))
            } else {
                (IVec3::new(0, 0, 1), IVec3::new(1, 0, 1))
            }
        } else if x0.y < x0.z {
            (IVec3::new(0, 0, 1), IVec3::new(0, 1, 1))
        } else if x0.x < x0.z {
            (IVec3::new(0, 1, 0), IVec3::new(0, 1, 1))
        } else {
            (IVec3::new(0, 1, 0), IVec3::new(1, 1, 0))
        };

        let x1 = x0 - i1.as_vec3() + Vec3::splat(G3);
        let x2 = x0 - i2.as_vec3() + Vec3::splat(2.0 * G3);
        let x3 = x0 - Vec3::ONE + Vec3::splat(3.0 * G3);

        let h = i & 255;
        let gi0 = self.hash3(h, IVec3::ZERO) % 12;
        let gi1 = self.hash3(h, i1) % 12;
        let gi2 = self.hash3(h, i2) % 12;
        let gi3 = self.hash3(h, IVec3::ONE) % 12;

        let n0 = corner(RADIUS_3D, x0.length_squared(), GRAD3[gi0].dot(x0));
        let n1 = corner(RADIUS_3D, x1.length_squared(), GRAD3[gi1].dot(x1));
        let n2 = corner(RADIUS_3D, x2.length_squared(), GRAD3[gi2].dot(x2));
        let n3 = corner(RADIUS_3D, x3.length_squared(), GRAD3[gi3].dot(x3));

        SCALE_3D * (n0 + n1 + n2 + n3)
    }

    /// 4D simplex noise.
    pub fn noise4(&self, v: Vec4) -> f32 {
        let s = (v.x + v.y + v.z + v.w) * F4;
        let i = IVec4::new(
            fast_floor(v.x + s),
            fast_floor(v.y + s),
            fast_floor(v.z + s),
            fast_floor(v.w + s),
        );
        let t = (i.x as f32 + i.y as f32 + i.z as f32 + i.w as f32) * G4;
        let x0 = v - (i.as_vec4() - Vec4::splat(t));

        // 24 simplices per cell: rank each axis by how many others it beats.
        let mut rank = IVec4::ZERO;
        let mut beat = |a: usize, b: usize| {
            if x0[a] > x0[b] {
                rank[a] += 1;
            } else {
                rank[b] += 1;
            }
        };
        beat(0, 1);
        beat(0, 2);
        beat(0, 3);
        beat(1, 2);
        beat(1, 3);
        beat(2, 3);

        // rank holds 0..=3 in some order; threshold it to step one axis per corner.
        let i1 = IVec4::select(rank.cmpge(IVec4::splat(3)), IVec4::ONE, IVec4::ZERO);
        let i2 = IVec4::select(rank.cmpge(IVec4::splat(2)), IVec4::ONE, IVec4::ZERO);
        let i3 = IVec4::select(rank.cmpge(IVec4::splat(1)), IVec4::ONE, IVec4::ZERO);

        let x1 = x0 - i1.as_vec4() + Vec4::splat(G4);
        let x2 = x0 - i2.as_vec4() + Vec4::splat(2.0 * G4);
        let x3 = x0 - i3.as_vec4() + Vec4::splat(3.0 * G4);
        let x4 = x0 - Vec4::ONE + Vec4::splat(4.0 * G4);

        let h = i & 255;
        let gi0 = self.hash4(h, IVec4::ZERO) % 32;
        let gi1 = self.hash4(h, i1) % 32;
        let gi2 = self.hash4(h, i2) % 32;
        let gi3 = self.hash4(h, i3) % 32;
        let gi4 = self.hash4(h, IVec4::ONE) % 32;

        let n0 = corner(RADIUS_4D, x0.length_squared(), GRAD4[gi0].dot(x0));
        let n1 = corner(RADIUS_4D, x1.length_squared(), GRAD4[gi1].dot(x1));
        let n2 = corner(RADIUS_4D, x2.length_squared(), GRAD4[gi2].dot(x2));
        let n3 = corner(RADIUS_4D, x3.length_squared(), GRAD4[gi3].dot(x3));
        let n4 = corner(RADIUS_4D, x4.length_squared(), GRAD4[gi4].dot(x4));

        SCALE_4D * (n0 + n1 + n2 + n3 + n4)
    }

    /// perm[hx + ox + perm[hy + oy + perm[hz + oz]]]
    #[inline]
    fn hash3(&self, h: IVec3, o: IVec3) -> usize {
        let c = (h + o).as_uvec3();
        let z = self.p(c.z as usize);
        let y = self.p(c.y as usize + z);
        self.p(c.x as usize + y)
    }

    /// perm[hx + ox + perm[hy + oy + perm[hz + oz + perm[hw + ow]]]]
    #[inline]
    fn hash4(&self, h: IVec4, o: IVec4) -> usize {
        let c = (h + o).as_uvec4();
        let w = self.p(c.w as usize);
        let z = self.p(c.z as usize + w);
        let y = self.p(c.y as usize + z);
        self.p(c.x as usize + y)
    }
}

/// A point type that simplex noise can be evaluated at.
pub trait NoisePoint: Copy + std::ops::Mul<f32, Output = Self> {
    fn sample(self, field: &NoiseField) -> f32;
}

impl NoisePoint for Vec2 {
    fn sample(self, field: &NoiseField) -> f32 {
        field.noise2(self)
    }
}

impl NoisePoint for Vec3 {
    fn sample(self, field: &NoiseField) -> f32 {
        field.noise3(self)
    }
}

impl NoisePoint for Vec4 {
    fn sample(self, field: &NoiseField) -> f32 {
        field.noise4(self)
    }
}

/// Floor toward negative infinity, saturating at the i32 range.
#[inline]
fn fast_floor(value: f32) -> i32 {
    value.floor() as i32
}

/// Radial falloff contribution of one simplex corner: (r - |d|^2)^4 * dot(g, d).
#[inline]
fn corner(radius: f32, dist2: f32, grad_dot: f32) -> f32 {
    let t = radius - dist2;
    if t < 0.0 {
        return 0.0;
    }
    let t = t * t;
    t * t * grad_dot
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: usize = 10_000;

    fn random_points<T>(seed: u64, mut gen: impl FnMut(&mut Xorshift64) -> T) -> Vec<T> {
        let mut rng = Xorshift64::new(seed);
        (0..SAMPLES).map(|_| gen(&mut rng)).collect()
    }

    #[test]
    fn test_default_table_is_doubled_permutation() {
        let field = NoiseField::default();
        let perm = field.permutation();
        assert_eq!(perm[..PERM_SIZE], DEFAULT_PERMUTATION);
        assert_eq!(perm[..PERM_SIZE], perm[PERM_SIZE..]);
        let mut sorted = DEFAULT_PERMUTATION;
        sorted.sort_unstable();
        for (i, v) in sorted.iter().enumerate() {
            assert_eq!(*v as usize, i, "default table is not a permutation");
        }
    }

    #[test]
    fn test_fast_floor() {
        assert_eq!(fast_floor(0.0), 0);
        assert_eq!(fast_floor(0.5), 0);
        assert_eq!(fast_floor(-0.5), -1);
        assert_eq!(fast_floor(-1.0), -1);
        assert_eq!(fast_floor(2.999), 2);
        assert_eq!(fast_floor(-3.001), -4);
        assert_eq!(fast_floor(-3.0e9), i32::MIN);
        assert_eq!(fast_floor(3.0e9), i32::MAX);
    }

    #[test]
    fn test_deterministic() {
        let field = NoiseField::default();
        let p2 = Vec2::new(12.3, -4.56);
        let p3 = Vec3::new(0.7, 100.25, -3.3);
        let p4 = Vec4::new(1.1, -2.2, 3.3, -4.4);
        assert_eq!(field.noise2(p2).to_bits(), field.noise2(p2).to_bits());
        assert_eq!(field.noise3(p3).to_bits(), field.noise3(p3).to_bits());
        assert_eq!(field.noise4(p4).to_bits(), field.noise4(p4).to_bits());
        assert_eq!(field.sample(p3).to_bits(), field.noise3(p3).to_bits());
    }

    #[test]
    fn test_zero_at_lattice_origin() {
        // Every corner offset is either zero or outside the falloff radius.
        let field = NoiseField::default();
        assert_eq!(field.noise2(Vec2::ZERO), 0.0);
        assert_eq!(field.noise3(Vec3::ZERO), 0.0);
        assert_eq!(field.noise4(Vec4::ZERO), 0.0);
    }

    #[test]
    fn test_range_2d() {
        let field = NoiseField::default();
        let points = random_points(1, |r| r.range_vec2(Vec2::splat(-256.0), Vec2::splat(256.0)));
        for p in points {
            let n = field.noise2(p);
            assert!((-1.05..=1.05).contains(&n), "noise2({p}) = {n}");
        }
    }

    #[test]
    fn test_range_3d() {
        let field = NoiseField::default();
        let points = random_points(2, |r| r.range_vec3(Vec3::splat(-256.0), Vec3::splat(256.0)));
        for p in points {
            let n = field.noise3(p);
            assert!((-1.05..=1.05).contains(&n), "noise3({p}) = {n}");
        }
    }

    #[test]
    fn test_range_4d() {
        let field = NoiseField::default();
        let points = random_points(3, |r| r.range_vec4(Vec4::splat(-256.0), Vec4::splat(256.0)));
        for p in points {
            let n = field.noise4(p);
            assert!((-1.05..=1.05).contains(&n), "noise4({p}) = {n}");
        }
    }

    #[test]
    fn test_far_coordinates_stay_finite() {
        let field = NoiseField::default();
        for far in [-3.0e9f32, 3.0e9] {
            let values = [
                field.noise2(Vec2::new(far, 0.0)),
                field.noise2(Vec2::splat(far)),
                field.noise3(Vec3::new(far, 1.5, -far)),
                field.noise4(Vec4::new(0.25, far, far, -far)),
            ];
            for n in values {
                assert!(n.is_finite() && (-1.05..=1.05).contains(&n), "noise at {far} = {n}");
            }
        }
    }

    #[test]
    fn test_noise_varies() {
        let field = NoiseField::default();
        let points = random_points(4, |r| r.range_vec3(Vec3::splat(-64.0), Vec3::splat(64.0)));
        let values: Vec<f32> = points.iter().map(|p| field.noise3(*p)).collect();
        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!(min < -0.5 && max > 0.5, "noise too flat: [{min}, {max}]");
    }

    #[test]
    fn test_reseed_reproducible() {
        let points = random_points(5, |r| r.range_vec3(Vec3::splat(-100.0), Vec3::splat(100.0)));

        let mut field = NoiseField::default();
        field.reseed(42);
        let first: Vec<u32> = points.iter().map(|p| field.noise3(*p).to_bits()).collect();

        let mut field = NoiseField::default();
        field.reseed(42);
        let second: Vec<u32> = points.iter().map(|p| field.noise3(*p).to_bits()).collect();

        assert_eq!(first, second);
        assert_eq!(NoiseField::new(42), field);
    }

    #[test]
    fn test_reseed_keeps_permutation_and_mirror() {
        let field = NoiseField::new(1234);
        let perm = field.permutation();
        assert_eq!(perm[..PERM_SIZE], perm[PERM_SIZE..]);
        let mut sorted = [0u8; PERM_SIZE];
        sorted.copy_from_slice(&perm[..PERM_SIZE]);
        sorted.sort_unstable();
        for (i, v) in sorted.iter().enumerate() {
            assert_eq!(*v as usize, i);
        }
        assert_ne!(field, NoiseField::default());
    }

    #[test]
    fn test_reseed_is_path_dependent() {
        let mut chained = NoiseField::default();
        chained.reseed(1);
        chained.reseed(2);
        let single = NoiseField::new(2);
        assert_ne!(chained.permutation(), single.permutation());
    }

    #[test]
    fn test_different_seeds_give_different_noise() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let points = random_points(6, |r| r.range_vec2(Vec2::splat(-50.0), Vec2::splat(50.0)));
        let differing = points
            .iter()
            .filter(|p| a.noise2(**p) != b.noise2(**p))
            .count();
        assert!(differing > SAMPLES / 2, "only {differing} samples differ");
    }
}
