//! IMU sample types and the orientation quaternion.

use crate::core::math::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Orientation quaternion [w, x, y, z].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    /// Identity quaternion (no rotation).
    pub fn identity() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Build from Euler angles about fixed axes X, Y, Z, i.e.
    /// `R = Rz(yaw)·Ry(pitch)·Rx(roll)` in the sensor frame.
    pub fn from_euler(roll: f32, pitch: f32, yaw: f32) -> Self {
        let (sr, cr) = (roll * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sy, cy) = (yaw * 0.5).sin_cos();
        Self {
            w: cr * cp * cy + sr * sp * sy,
            x: sr * cp * cy - cr * sp * sy,
            y: cr * sp * cy + sr * cp * sy,
            z: cr * cp * sy - sr * sp * cy,
        }
    }

    /// Normalize to unit length.
    pub fn normalize(&mut self) {
        let norm = (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        if norm > 1e-10 {
            self.w /= norm;
            self.x /= norm;
            self.y /= norm;
            self.z /= norm;
        }
    }

    /// Extract Euler angles about fixed axes X, Y, Z.
    /// Returns (roll, pitch, yaw) in radians.
    pub fn to_euler(&self) -> (f32, f32, f32) {
        // Roll (X axis rotation)
        let sinr_cosp = 2.0 * (self.w * self.x + self.y * self.z);
        let cosr_cosp = 1.0 - 2.0 * (self.x * self.x + self.y * self.y);
        let roll = sinr_cosp.atan2(cosr_cosp);

        // Pitch (Y axis rotation)
        let sinp = 2.0 * (self.w * self.y - self.z * self.x);
        let pitch = if sinp.abs() >= 1.0 {
            (PI / 2.0).copysign(sinp)
        } else {
            sinp.asin()
        };

        // Yaw (Z axis rotation)
        let siny_cosp = 2.0 * (self.w * self.z + self.x * self.y);
        let cosy_cosp = 1.0 - 2.0 * (self.y * self.y + self.z * self.z);
        let yaw = siny_cosp.atan2(cosy_cosp);

        (roll, pitch, yaw)
    }
}

/// A raw inertial sample in the sensor frame (x forward, y left, z up).
///
/// The accelerometer reading still contains gravity; removal and axis
/// remapping happen when the sample is pushed into the ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImuReading {
    /// Sample timestamp in seconds.
    pub time: f64,
    /// Absolute orientation.
    pub orientation: Quaternion,
    /// Linear acceleration in m/s², sensor frame, gravity included.
    pub linear_acceleration: Vec3,
}

impl ImuReading {
    /// Create a new reading.
    pub fn new(time: f64, orientation: Quaternion, linear_acceleration: Vec3) -> Self {
        Self {
            time,
            orientation,
            linear_acceleration,
        }
    }
}

/// One integrated slot of the IMU ring, in the internal world frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImuState {
    /// Sample timestamp in seconds.
    pub time: f64,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    /// World-frame acceleration, gravity removed.
    pub acceleration: Vec3,
    /// Velocity integrated under uniform acceleration between samples.
    pub velocity: Vec3,
    /// Position integrated under uniform acceleration between samples.
    pub shift: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_euler() {
        let (r, p, y) = Quaternion::identity().to_euler();
        assert_relative_eq!(r, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_euler_roundtrip() {
        let cases = [
            (0.1, -0.2, 0.3),
            (-0.7, 0.4, 2.5),
            (1.2, -1.0, -2.8),
            (0.0, 0.0, 3.0),
        ];
        for (roll, pitch, yaw) in cases {
            let q = Quaternion::from_euler(roll, pitch, yaw);
            let (r, p, y) = q.to_euler();
            assert_relative_eq!(r, roll, epsilon = 1e-5);
            assert_relative_eq!(p, pitch, epsilon = 1e-5);
            assert_relative_eq!(y, yaw, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_normalize() {
        let mut q = Quaternion {
            w: 2.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        };
        q.normalize();
        assert_relative_eq!(q.w, 1.0, epsilon = 1e-6);
    }
}
