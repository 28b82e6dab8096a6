//! Shared data types: points, clouds, and IMU samples.

mod imu;
mod point;

pub use imu::{ImuReading, ImuState, Quaternion};
pub use point::{Point3, PointCloud3};
