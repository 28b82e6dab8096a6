//! Message types exchanged with the surrounding system.

use crate::core::types::PointCloud3;
use serde::{Deserialize, Serialize};

/// Frame id stamped on every emitted cloud.
pub const CAMERA_FRAME_ID: &str = "/camera";

/// One raw sweep from the LiDAR.
///
/// Points are unordered, in the sensor frame (x forward, y left, z up), and
/// may contain non-finite coordinates. The stamp marks the start of the
/// rotation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SweepMessage {
    /// Sweep start time in seconds.
    pub stamp: f64,
    /// Raw sensor-frame points.
    pub points: Vec<[f32; 3]>,
}

/// A stamped, frame-tagged point cloud ready for publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFrame {
    /// Output topic the cloud belongs on.
    pub topic: String,
    /// Coordinate frame id.
    pub frame_id: String,
    /// Timestamp of the originating sweep, in seconds.
    pub stamp: f64,
    pub cloud: PointCloud3,
}

/// Input topic names and queue depths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTopics {
    pub points: String,
    pub points_queue: usize,
    pub imu: String,
    pub imu_queue: usize,
}

impl Default for InputTopics {
    fn default() -> Self {
        Self {
            points: "/velodyne_points".to_string(),
            points_queue: 2,
            imu: "/imu/data".to_string(),
            imu_queue: 50,
        }
    }
}

/// Output topic names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputTopics {
    /// Full de-skewed cloud.
    pub full_cloud: String,
    pub corner_sharp: String,
    pub corner_less_sharp: String,
    pub surf_flat: String,
    pub surf_less_flat: String,
    /// Fixed 4-point IMU trajectory summary.
    pub imu_trans: String,
}

impl Default for OutputTopics {
    fn default() -> Self {
        Self {
            full_cloud: "/velodyne_cloud_2".to_string(),
            corner_sharp: "/laser_cloud_sharp".to_string(),
            corner_less_sharp: "/laser_cloud_less_sharp".to_string(),
            surf_flat: "/laser_cloud_flat".to_string(),
            surf_less_flat: "/laser_cloud_less_flat".to_string(),
            imu_trans: "/imu_trans".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_topics() {
        let input = InputTopics::default();
        assert_eq!(input.points, "/velodyne_points");
        assert_eq!(input.imu, "/imu/data");
        assert_eq!(input.points_queue, 2);
        assert_eq!(input.imu_queue, 50);

        let output = OutputTopics::default();
        assert_eq!(output.full_cloud, "/velodyne_cloud_2");
        assert_eq!(output.imu_trans, "/imu_trans");
    }
}
