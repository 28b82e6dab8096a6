//! Motion compensation: warp each point into the frame of the sweep's first
//! point using interpolated IMU state.
//!
//! Over a 100 ms sweep the platform keeps moving, so later points are
//! measured from a different pose than earlier ones. A constant-velocity
//! extrapolation from the first point is already absorbed downstream; what
//! gets corrected here is the residual from non-uniform motion:
//!
//! ```text
//! Δs_world = s_cur − s_start − v_start · t_point
//! ```
//!
//! rotated into the first point's local frame, plus a re-orientation of the
//! point through `R_start⁻¹ · R_cur`. The rotation chain is
//! `Ry(yaw)·Rx(pitch)·Rz(roll)` throughout and is not commutative with any
//! other order.

use crate::core::math::{self, Vec3};
use crate::core::types::{Point3, PointCloud3};
use crate::sensors::imu_ring::{ImuRing, ImuSnapshot};
use serde::{Deserialize, Serialize};

/// IMU trajectory summary for one sweep.
///
/// Becomes the fixed 4-point `imu_trans` cloud: starting Euler angles,
/// final Euler angles, and the de-skew displacement/velocity residuals of
/// the sweep's last point. The (pitch, yaw, roll) component order of the
/// Euler points is a downstream contract.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionSummary {
    pub start_roll: f32,
    pub start_pitch: f32,
    pub start_yaw: f32,
    pub current_roll: f32,
    pub current_pitch: f32,
    pub current_yaw: f32,
    /// Displacement residual of the last point, start-local frame.
    pub shift_residual: Vec3,
    /// Velocity residual of the last point, start-local frame.
    pub velocity_residual: Vec3,
}

impl MotionSummary {
    /// Render as the 4-point summary cloud.
    pub fn to_cloud(&self) -> PointCloud3 {
        let mut cloud = PointCloud3::with_capacity(4);
        cloud.push(Point3::new(self.start_pitch, self.start_yaw, self.start_roll));
        cloud.push(Point3::new(
            self.current_pitch,
            self.current_yaw,
            self.current_roll,
        ));
        cloud.push(Point3::new(
            self.shift_residual.x,
            self.shift_residual.y,
            self.shift_residual.z,
        ));
        cloud.push(Point3::new(
            self.velocity_residual.x,
            self.velocity_residual.y,
            self.velocity_residual.z,
        ));
        cloud
    }
}

/// Per-sweep motion compensator.
///
/// The first kept point of the sweep latches the reference pose and is left
/// untouched; every later point is interpolated, un-rotated into the start
/// frame, and shifted by the motion residual. Without IMU data the
/// compensator is a pass-through and the summary stays zero.
#[derive(Debug, Default)]
pub struct MotionCompensator {
    start: Option<ImuSnapshot>,
    current: ImuSnapshot,
    shift_residual: Vec3,
    velocity_residual: Vec3,
}

impl MotionCompensator {
    /// Create a compensator for one sweep.
    pub fn new() -> Self {
        Self::default()
    }

    /// De-skew one point given its relative time within the sweep.
    ///
    /// `sweep_time` is the sweep's start timestamp; the point's absolute
    /// time is `sweep_time + rel_time · scan_period`.
    pub fn process(
        &mut self,
        point: &mut Point3,
        ring: &mut ImuRing,
        sweep_time: f64,
        rel_time: f32,
        scan_period: f32,
    ) {
        let point_time = rel_time * scan_period;
        let snapshot = match ring.state_at(sweep_time + point_time as f64) {
            Some(s) => s,
            None => return,
        };
        self.current = snapshot;

        let start = match self.start {
            Some(s) => s,
            None => {
                self.start = Some(snapshot);
                return;
            }
        };

        // Residual displacement relative to constant-velocity extrapolation
        // from the sweep start, taken into the start-local frame.
        let shift_world = snapshot.shift - start.shift - start.velocity * point_time;
        self.shift_residual =
            math::rotate_to_local(shift_world, start.roll, start.pitch, start.yaw);
        self.velocity_residual = math::rotate_to_local(
            snapshot.velocity - start.velocity,
            start.roll,
            start.pitch,
            start.yaw,
        );

        // World frame via the current attitude, back to the start frame,
        // plus the displacement residual.
        let world = math::rotate_to_world(
            point.coords(),
            snapshot.roll,
            snapshot.pitch,
            snapshot.yaw,
        );
        let local = math::rotate_to_local(world, start.roll, start.pitch, start.yaw);
        point.set_coords(local + self.shift_residual);
    }

    /// Trajectory summary after the sweep's last point was processed.
    pub fn summary(&self) -> MotionSummary {
        let start = self.start.unwrap_or_default();
        MotionSummary {
            start_roll: start.roll,
            start_pitch: start.pitch,
            start_yaw: start.yaw,
            current_roll: self.current.roll,
            current_pitch: self.current.pitch,
            current_yaw: self.current.yaw,
            shift_residual: self.shift_residual,
            velocity_residual: self.velocity_residual,
        }
    }
}
