//! Quaternions, used only for rotating vectors

use super::{fast_inv_sqrt, Vec4};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Quat = Quat { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Rotation of `angle` radians about the axis (x, y, z).
    pub fn from_axis_angle(angle: f32, x: f32, y: f32, z: f32) -> Quat {
        let h = angle / 2.0;
        Quat {
            x: x * h.sin(),
            y: y * h.sin(),
            z: z * h.sin(),
            w: h.cos(),
        }
    }

    /// z-y-x Euler angles, in degrees.
    pub fn from_euler(z: f32, y: f32, x: f32) -> Quat {
        let z = z.to_radians() / 2.0;
        let y = y.to_radians() / 2.0;
        let x = x.to_radians() / 2.0;

        let (yaw_s, yaw_c) = z.sin_cos();
        let (pitch_s, pitch_c) = y.sin_cos();
        let (roll_s, roll_c) = x.sin_cos();

        Quat {
            w: yaw_c * pitch_c * roll_c + yaw_s * pitch_s * roll_s,
            x: yaw_c * pitch_c * roll_s - yaw_s * pitch_s * roll_c,
            y: yaw_s * pitch_c * roll_s + yaw_c * pitch_s * roll_c,
            z: yaw_s * pitch_c * roll_c - yaw_c * pitch_s * roll_s,
        }
    }

    pub fn mul(self, other: Quat) -> Quat {
        Quat {
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
        }
    }

    pub fn conjugate(self) -> Quat {
        Quat { x: -self.x, y: -self.y, z: -self.z, w: self.w }
    }

    pub fn normalize(self) -> Quat {
        let n = fast_inv_sqrt(self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w);
        Quat {
            x: self.x * n,
            y: self.y * n,
            z: self.z * n,
            w: self.w * n,
        }
    }

    /// Rotate a vector: `q * v * conj(q)`. Only x/y/z are touched.
    pub fn rotate_vector(self, v: Vec4) -> Vec4 {
        let vq = Quat { x: v.x, y: v.y, z: v.z, w: 0.0 };
        let r = self.mul(vq).mul(self.conjugate());
        Vec4 { x: r.x, y: r.y, z: r.z, w: v.w }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_quarter_turn_about_y() {
        let q = Quat::from_axis_angle(std::f32::consts::FRAC_PI_2, 0.0, 1.0, 0.0);
        let v = q.rotate_vector(Vec4::new(0.0, 0.0, -1.0));
        // -z rotates onto -x
        assert!((v.x + 1.0).abs() < 1e-5);
        assert!(v.z.abs() < 1e-5);
    }

    #[test]
    fn from_euler_matches_axis_angle_about_z() {
        let a = Quat::from_euler(90.0, 0.0, 0.0);
        let b = Quat::from_axis_angle(std::f32::consts::FRAC_PI_2, 0.0, 0.0, 1.0);
        assert!((a.x - b.x).abs() < 1e-5);
        assert!((a.y - b.y).abs() < 1e-5);
        assert!((a.z - b.z).abs() < 1e-5);
        assert!((a.w - b.w).abs() < 1e-5);
    }

    #[test]
    fn conjugate_undoes_rotation() {
        let q = Quat::from_axis_angle(1.1, 0.0, 1.0, 0.0);
        let v = Vec4::new(3.0, -1.0, 2.0);
        let back = q.conjugate().rotate_vector(q.rotate_vector(v));
        assert!((back.x - v.x).abs() < 1e-4);
        assert!((back.y - v.y).abs() < 1e-4);
        assert!((back.z - v.z).abs() < 1e-4);
    }
}
