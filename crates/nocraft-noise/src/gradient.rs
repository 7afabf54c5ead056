//! Fixed gradient sets. Reseeding only shuffles the permutation table; these never change.

use glam::{Vec3, Vec4};

/// Midpoints of the 12 edges of a cube. 2D noise uses their x and y components.
pub const GRAD3: [Vec3; 12] = [
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(-1.0, 1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(-1.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, -1.0),
    Vec3::new(-1.0, 0.0, -1.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(0.0, -1.0, 1.0),
    Vec3::new(0.0, 1.0, -1.0),
    Vec3::new(0.0, -1.0, -1.0),
];

/// Midpoints of the 32 edges of a tesseract.
pub const GRAD4: [Vec4; 32] = [
    Vec4::new(0.0, 1.0, 1.0, 1.0),
    Vec4::new(0.0, 1.0, 1.0, -1.0),
    Vec4::new(0.0, 1.0, -1.0, 1.0),
    Vec4::new(0.0, 1.0, -1.0, -1.0),
    Vec4::new(0.0, -1.0, 1.0, 1.0),
    Vec4::new(0.0, -1.0, 1.0, -1.0),
    Vec4::new(0.0, -1.0, -1.0, 1.0),
    Vec4::new(0.0, -1.0, -1.0, -1.0),
    Vec4::new(1.0, 0.0, 1.0, 1.0),
    Vec4::new(1.0, 0.0, 1.0, -1.0),
    Vec4::new(1.0, 0.0, -1.0, 1.0),
    Vec4::new(1.0, 0.0, -1.0, -1.0),
    Vec4::new(-1.0, 0.0, 1.0, 1.0),
    Vec4::new(-1.0, 0.0, 1.0, -1.0),
    Vec4::new(-1.0, 0.0, -1.0, 1.0),
    Vec4::new(-1.0, 0.0, -1.0, -1.0),
    Vec4::new(1.0, 1.0, 0.0, 1.0),
    Vec4::new(1.0, 1.0, 0.0, -1.0),
    Vec4::new(1.0, -1.0, 0.0, 1.0),
    Vec4::new(1.0, -1.0, 0.0, -1.0),
    Vec4::new(-1.0, 1.0, 0.0, 1.0),
    Vec4::new(-1.0, 1.0, 0.0, -1.0),
    Vec4::new(-1.0, -1.0, 0.0, 1.0),
    Vec4::new(-1.0, -1.0, 0.0, -1.0),
    Vec4::new(1.0, 1.0, 1.0, 0.0),
    Vec4::new(1.0, 1.0, -1.0, 0.0),
    Vec4::new(1.0, -1.0, 1.0, 0.0),
    Vec4::new(1.0, -1.0, -1.0, 0.0),
    Vec4::new(-1.0, 1.0, 1.0, 0.0),
    Vec4::new(-1.0, 1.0, -1.0, 0.0),
    Vec4::new(-1.0, -1.0, 1.0, 0.0),
    Vec4::new(-1.0, -1.0, -1.0, 0.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grad3_has_two_unit_components() {
        for g in GRAD3 {
            assert_eq!(g.abs().element_sum(), 2.0, "{g}");
            assert_eq!(g.length_squared(), 2.0);
        }
    }

    #[test]
    fn test_grad4_has_three_unit_components() {
        for g in GRAD4 {
            assert_eq!(g.abs().element_sum(), 3.0, "{g}");
        }
    }

    #[test]
    fn test_gradients_unique() {
        for i in 0..GRAD4.len() {
            for j in (i + 1)..GRAD4.len() {
                assert_ne!(GRAD4[i], GRAD4[j], "grad4 {i} == {j}");
            }
        }
        for i in 0..GRAD3.len() {
            for j in (i + 1)..GRAD3.len() {
                assert_ne!(GRAD3[i], GRAD3[j], "grad3 {i} == {j}");
            }
        }
    }
}
