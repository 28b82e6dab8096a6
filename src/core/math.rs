//! Mathematical primitives: 3-vectors and Euler rotation chains.
//!
//! All attitude math in this crate composes rotations as
//! `Ry(yaw)·Rx(pitch)·Rz(roll)` (body to world in the internal frame) and
//! its inverse `Rz(-roll)·Rx(-pitch)·Ry(-yaw)` (world to body). The chain is
//! dictated by the sensor-to-internal axis remap and is not interchangeable
//! with other orders.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A 3-vector in meters (or m/s, m/s² depending on context).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Squared Euclidean norm.
    #[inline]
    pub fn squared_norm(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Euclidean norm.
    #[inline]
    pub fn norm(&self) -> f32 {
        self.squared_norm().sqrt()
    }

    /// Component-wise finiteness check.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Rotate `v` about the x axis by `angle` radians.
#[inline]
pub fn rotate_x(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x, c * v.y - s * v.z, s * v.y + c * v.z)
}

/// Rotate `v` about the y axis by `angle` radians.
#[inline]
pub fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(c * v.x + s * v.z, v.y, -s * v.x + c * v.z)
}

/// Rotate `v` about the z axis by `angle` radians.
#[inline]
pub fn rotate_z(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(c * v.x - s * v.y, s * v.x + c * v.y, v.z)
}

/// Body-to-world rotation: `Ry(yaw)·Rx(pitch)·Rz(roll)·v`.
#[inline]
pub fn rotate_to_world(v: Vec3, roll: f32, pitch: f32, yaw: f32) -> Vec3 {
    rotate_y(rotate_x(rotate_z(v, roll), pitch), yaw)
}

/// World-to-body rotation: `Rz(-roll)·Rx(-pitch)·Ry(-yaw)·v`.
///
/// Exact inverse of [`rotate_to_world`] with the same angles.
#[inline]
pub fn rotate_to_local(v: Vec3, roll: f32, pitch: f32, yaw: f32) -> Vec3 {
    rotate_z(rotate_x(rotate_y(v, -yaw), -pitch), -roll)
}
