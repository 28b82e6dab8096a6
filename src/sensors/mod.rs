//! Sensor-side processing: frame conventions and the IMU ring.

pub mod frame;
pub mod imu_ring;
