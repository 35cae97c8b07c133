//! 4x4 matrices
//!
//! Row-major storage with vertices as row vectors: `transform(v)` computes
//! `v * M`, so a view matrix followed by a projection composes as
//! `view * projection`.

use super::Vec4;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Row-major 4x4 matrix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Mat4 {
    pub fn identity() -> Mat4 {
        let mut m = [0.0; 16];
        m[0] = 1.0;
        m[5] = 1.0;
        m[10] = 1.0;
        m[15] = 1.0;
        Mat4 { m }
    }

    /// Perspective projection. Assumes a non-degenerate field of view and
    /// `near != far`.
    pub fn perspective(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
        let tfov = (fov / 2.0).tan();
        let delta_z = far - near;
        let mut m = [0.0; 16];
        m[0] = 1.0 / (aspect_ratio * tfov);
        m[5] = 1.0 / tfov;
        m[10] = -(far + near) / delta_z;
        m[11] = -1.0;
        m[14] = -2.0 * far * near / delta_z;
        Mat4 { m }
    }

    /// View matrix looking from `eye` along the direction `target`.
    pub fn look_at(eye: Vec4, target: Vec4, up: Vec4) -> Mat4 {
        let z = Vec4 { x: target.x, y: target.y, z: target.z, w: target.w }.normalize();
        let x = z.cross(up).normalize();
        let y = x.cross(z);

        let mut mat = Mat4::identity();
        mat.m[0] = x.x;
        mat.m[4] = x.y;
        mat.m[8] = x.z;

        mat.m[1] = y.x;
        mat.m[5] = y.y;
        mat.m[9] = y.z;

        mat.m[2] = -z.x;
        mat.m[6] = -z.y;
        mat.m[10] = -z.z;

        mat.m[12] = -x.dot(eye);
        mat.m[13] = -y.dot(eye);
        mat.m[14] = z.dot(eye);
        mat
    }

    /// Transform a row vector: `v * M`.
    pub fn transform(&self, v: Vec4) -> Vec4 {
        let m = &self.m;
        Vec4 {
            x: m[0] * v.x + m[4] * v.y + m[8] * v.z + m[12] * v.w,
            y: m[1] * v.x + m[5] * v.y + m[9] * v.z + m[13] * v.w,
            z: m[2] * v.x + m[6] * v.y + m[10] * v.z + m[14] * v.w,
            w: m[3] * v.x + m[7] * v.y + m[11] * v.z + m[15] * v.w,
        }
    }

    pub fn transpose(&self) -> Mat4 {
        let mut out = [0.0; 16];
        for i in 0..4 {
            for j in 0..4 {
                out[i * 4 + j] = self.m[i + j * 4];
            }
        }
        Mat4 { m: out }
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, other: Mat4) -> Mat4 {
        let mut out = [0.0; 16];
        for i in 0..4 {
            for j in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.m[i * 4 + k] * other.m[k * 4 + j];
                }
                out[i * 4 + j] = sum;
            }
        }
        Mat4 { m: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_preserves_vectors() {
        let v = Vec4::new(1.0, -2.0, 3.0);
        let t = Mat4::identity().transform(v);
        assert_eq!((t.x, t.y, t.z, t.w), (1.0, -2.0, 3.0, 1.0));
    }

    #[test]
    fn transform_composes_with_multiply() {
        let a = Mat4::perspective(1.0, 1.6, 0.1, 100.0);
        let b = Mat4::look_at(
            Vec4::new(1.0, 2.0, 3.0),
            Vec4::new(0.0, 0.0, -1.0),
            Vec4::new(0.0, 1.0, 0.0),
        );
        let v = Vec4::new(5.0, -7.0, -40.0);
        let once = (b * a).transform(v);
        let twice = a.transform(b.transform(v));
        assert!((once.x - twice.x).abs() < 1e-2);
        assert!((once.y - twice.y).abs() < 1e-2);
        assert!((once.z - twice.z).abs() < 1e-2);
        assert!((once.w - twice.w).abs() < 1e-2);
    }

    #[test]
    fn look_at_origin_faces_negative_z() {
        let m = Mat4::look_at(
            Vec4::new(0.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -1.0),
            Vec4::new(0.0, 1.0, 0.0),
        );
        // view space keeps -z in front; the projection flips it positive
        let v = m.transform(Vec4::new(0.0, 0.0, -10.0));
        assert!(v.z < 0.0);
        let clip = (m * Mat4::perspective(1.0, 1.0, 0.1, 100.0)).transform(Vec4::new(0.0, 0.0, -10.0));
        assert!(clip.z > 0.0 && clip.w > 0.0);
    }

    #[test]
    fn transpose_is_involutive() {
        let m = Mat4::perspective(1.0, 1.6, 0.1, 100.0);
        let back = m.transpose().transpose();
        assert_eq!(m.m, back.m);
    }
}
