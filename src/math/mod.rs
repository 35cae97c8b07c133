//! 3D math for the rasterization pipeline
//!
//! Plain value types, no runtime validation: zero-length vectors and
//! degenerate matrices are a caller contract, not a checked error.

mod fixed;
mod matrix;
mod quat;
mod vector;

pub use fixed::{Fixed, FRACBITS, FRACUNIT};
pub use matrix::Mat4;
pub use quat::Quat;
pub use vector::{intersect_plane, Vec2, Vec3, Vec4};

/// Linear interpolation between `start` and `end` at parameter `r`.
pub fn lerp(start: f32, end: f32, r: f32) -> f32 {
    start * (1.0 - r) + end * r
}

/// Quake-style approximate 1/sqrt(x) with one Newton-Raphson step.
pub fn fast_inv_sqrt(x: f32) -> f32 {
    let i = 0x5f3759df_u32.wrapping_sub(x.to_bits() >> 1);
    let y = f32::from_bits(i);
    y * (1.5 - 0.5 * x * y * y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_are_exact() {
        assert_eq!(lerp(3.0, 7.0, 0.0), 3.0);
        assert_eq!(lerp(3.0, 7.0, 1.0), 7.0);
    }

    #[test]
    fn fast_inv_sqrt_close_to_reference() {
        for &x in &[0.25f32, 1.0, 2.0, 100.0, 40000.0] {
            let approx = fast_inv_sqrt(x);
            let exact = 1.0 / x.sqrt();
            assert!((approx - exact).abs() / exact < 0.002, "x = {x}");
        }
    }
}
