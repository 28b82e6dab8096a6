//! Coordinate frame conventions.
//!
//! Two right-handed frames exist:
//!
//! - **Sensor frame**: x forward, y left, z up (how the LiDAR reports
//!   points and, after gravity removal, how IMU accelerations arrive).
//! - **Internal frame**: z forward, x left, y up.
//!
//! The remap is a pure axis permutation:
//!
//! ```text
//! internal.x = sensor.y
//! internal.y = sensor.z
//! internal.z = sensor.x
//! ```
//!
//! After remapping, attitude composes as `Ry(yaw)·Rx(pitch)·Rz(roll)`;
//! mixing in any other rotation order silently corrupts de-skew.

use crate::core::math::Vec3;

/// Remap a sensor-frame vector into the internal frame.
#[inline]
pub fn sensor_to_internal(v: Vec3) -> Vec3 {
    Vec3::new(v.y, v.z, v.x)
}

/// Remap an internal-frame vector back into the sensor frame.
#[inline]
pub fn internal_to_sensor(v: Vec3) -> Vec3 {
    Vec3::new(v.z, v.x, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_remap() {
        let sensor = Vec3::new(1.0, 2.0, 3.0);
        let internal = sensor_to_internal(sensor);
        assert_relative_eq!(internal.x, 2.0);
        assert_relative_eq!(internal.y, 3.0);
        assert_relative_eq!(internal.z, 1.0);
    }

    #[test]
    fn test_remap_involution() {
        let v = Vec3::new(-0.5, 1.25, 7.0);
        let there_and_back = sensor_to_internal(internal_to_sensor(v));
        assert_relative_eq!(there_and_back.x, v.x);
        assert_relative_eq!(there_and_back.y, v.y);
        assert_relative_eq!(there_and_back.z, v.z);

        let back_and_there = internal_to_sensor(sensor_to_internal(v));
        assert_relative_eq!(back_and_there.x, v.x);
        assert_relative_eq!(back_and_there.y, v.y);
        assert_relative_eq!(back_and_there.z, v.z);
    }
}
