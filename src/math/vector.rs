//! Vector types
//!
//! `Vec4` is the workhorse of the pipeline. Arithmetic only touches x/y/z and
//! resets `w` to 1, point semantics; build directions with
//! [`Vec4::direction`].

use super::fast_inv_sqrt;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// 2D vector, used for texture coordinates (in texel units).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 3D vector.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn normalize(self) -> Vec3 {
        let n = fast_inv_sqrt(self.dot(self));
        Vec3::new(self.x * n, self.y * n, self.z * n)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// Homogeneous 4D vector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Vec4 {
    fn default() -> Self {
        Vec4::new(0.0, 0.0, 0.0)
    }
}

impl Vec4 {
    /// A point; `w` defaults to 1.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    /// A direction; `w` is 0.
    pub fn direction(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 0.0 }
    }

    pub fn dot(self, other: Vec4) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec4) -> Vec4 {
        Vec4 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
            w: 1.0,
        }
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn inv_length(self) -> f32 {
        fast_inv_sqrt(self.length_squared())
    }

    pub fn normalize(self) -> Vec4 {
        let n = self.inv_length();
        Vec4 {
            x: self.x * n,
            y: self.y * n,
            z: self.z * n,
            w: self.w,
        }
    }

    /// Signed distance of `self` from the plane through `plane_point` with
    /// normal `normal`.
    pub fn plane_distance(self, normal: Vec4, plane_point: Vec4) -> f32 {
        normal.x * self.x + normal.y * self.y + normal.z * self.z - normal.dot(plane_point)
    }

    /// Rotate about the axis (x, y, z) by `angle` radians.
    pub fn rotate(self, angle: f32, x: f32, y: f32, z: f32) -> Vec4 {
        let h = angle / 2.0;
        let q = super::Quat {
            x: x * h.sin(),
            y: y * h.sin(),
            z: z * h.sin(),
            w: h.cos(),
        };
        q.rotate_vector(self)
    }
}

impl Add for Vec4 {
    type Output = Vec4;
    fn add(self, other: Vec4) -> Vec4 {
        Vec4::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec4 {
    type Output = Vec4;
    fn sub(self, other: Vec4) -> Vec4 {
        Vec4::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Vec4 {
    type Output = Vec4;
    fn mul(self, s: f32) -> Vec4 {
        Vec4::new(self.x * s, self.y * s, self.z * s)
    }
}

/// Intersect the segment `start`..`end` with the plane through `plane_point`
/// with normal `normal`. Returns the intersection point and the interpolation
/// parameter `t` along the segment, which clipping reuses to interpolate UVs.
pub fn intersect_plane(plane_point: Vec4, normal: Vec4, start: Vec4, end: Vec4) -> (Vec4, f32) {
    let pd = -normal.dot(plane_point);
    let ad = start.dot(normal);
    let bd = end.dot(normal);
    let t = (-pd - ad) / (bd - ad);
    let delta = end - start;
    (start + delta * t, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = Vec4::new(1.0, 0.0, 0.0);
        let y = Vec4::new(0.0, 1.0, 0.0);
        let z = x.cross(y);
        assert!((z.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_gives_unit_length() {
        let v = Vec4::new(3.0, 4.0, 0.0).normalize();
        assert!((v.length_squared() - 1.0).abs() < 0.01);
    }

    #[test]
    fn plane_distance_signs() {
        let normal = Vec4::direction(0.0, 0.0, 1.0);
        let plane = Vec4::new(0.0, 0.0, 16.0);
        assert!(Vec4::new(0.0, 0.0, 20.0).plane_distance(normal, plane) > 0.0);
        assert!(Vec4::new(0.0, 0.0, 10.0).plane_distance(normal, plane) < 0.0);
    }

    #[test]
    fn intersect_plane_midpoint() {
        let plane = Vec4::new(0.0, 0.0, 10.0);
        let normal = Vec4::direction(0.0, 0.0, 1.0);
        let (p, t) = intersect_plane(plane, normal, Vec4::new(0.0, 0.0, 0.0), Vec4::new(0.0, 0.0, 20.0));
        assert!((t - 0.5).abs() < 1e-6);
        assert!((p.z - 10.0).abs() < 1e-5);
    }

    #[test]
    fn intersect_plane_t_is_exact_at_segment_ends() {
        let plane = Vec4::new(0.0, 0.0, 5.0);
        let normal = Vec4::direction(0.0, 0.0, 1.0);
        let (_, t0) = intersect_plane(plane, normal, Vec4::new(1.0, 2.0, 5.0), Vec4::new(3.0, 4.0, 9.0));
        assert_eq!(t0, 0.0);
        let (_, t1) = intersect_plane(plane, normal, Vec4::new(1.0, 2.0, 1.0), Vec4::new(3.0, 4.0, 5.0));
        assert_eq!(t1, 1.0);
    }
}
