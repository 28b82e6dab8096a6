//! Sweep ingestion: NaN gating, beam assignment, azimuth framing, and
//! per-point relative time.
//!
//! Points arrive unordered in the sensor frame. Each finite point is
//! remapped into the internal frame, assigned to a beam from its elevation
//! angle, and given a relative time from its azimuth within the sweep. The
//! de-skewed points are collected per beam and concatenated in ascending
//! beam order, which restores the ordering that curvature estimation needs.

use crate::core::math::Vec3;
use crate::core::types::{Point3, PointCloud3};
use crate::registration::config::RegistrationConfig;
use crate::registration::deskew::{MotionCompensator, MotionSummary};
use crate::sensors::frame;
use crate::sensors::imu_ring::ImuRing;
use crate::io::messages::SweepMessage;
use crate::utils::constants::MAX_SWEEP_POINTS;
use std::f32::consts::{FRAC_PI_2, PI};

/// One ingested, de-skewed, beam-ordered sweep.
#[derive(Debug, Clone)]
pub struct AssembledSweep {
    /// Concatenated cloud: beams ascending, azimuthal order within a beam.
    pub cloud: PointCloud3,
    /// IMU trajectory summary over the sweep.
    pub motion: MotionSummary,
}

/// Normalize the end azimuth so that `π < end_ori − start_ori < 3π`.
///
/// Sensors do not wrap exactly 2π per sweep; a single correction keeps the
/// span inside the window for any pair produced by the atan2 framing.
pub(crate) fn normalize_end_azimuth(start_ori: f32, end_ori: f32) -> f32 {
    if end_ori - start_ori > 3.0 * PI {
        end_ori - 2.0 * PI
    } else if end_ori - start_ori < PI {
        end_ori + 2.0 * PI
    } else {
        end_ori
    }
}

/// Beam index from the elevation angle in degrees.
///
/// Positive elevations map directly onto the upper rows; negative ones are
/// offset onto the lower rows. VLP-16: [-15°, +15°] at 2° spacing gives
/// indices 0..=15, everything else is out of the field of view.
fn beam_index(elevation_deg: f32, num_scans: usize) -> Option<usize> {
    let rounded = elevation_deg.round() as i32;
    let id = if rounded > 0 {
        rounded
    } else {
        rounded + num_scans as i32 - 1
    };
    if id < 0 || id >= num_scans as i32 {
        None
    } else {
        Some(id as usize)
    }
}

/// Ingest one sweep: filter, assign, de-skew, and assemble.
pub fn assemble(
    config: &RegistrationConfig,
    ring: &mut ImuRing,
    msg: &SweepMessage,
) -> AssembledSweep {
    let mut finite: Vec<Vec3> = Vec::with_capacity(msg.points.len());
    for p in &msg.points {
        let v = Vec3::new(p[0], p[1], p[2]);
        if v.is_finite() {
            finite.push(v);
        }
    }
    let dropped = msg.points.len() - finite.len();
    if dropped > 0 {
        log::debug!("dropped {} non-finite points", dropped);
    }
    if finite.len() > MAX_SWEEP_POINTS {
        log::warn!(
            "sweep has {} points, truncating to {}",
            finite.len(),
            MAX_SWEEP_POINTS
        );
        finite.truncate(MAX_SWEEP_POINTS);
    }

    let mut scans: Vec<PointCloud3> = vec![PointCloud3::new(); config.num_scans];
    let mut compensator = MotionCompensator::new();
    let mut kept = 0usize;

    if let (Some(first), Some(last)) = (finite.first(), finite.last()) {
        // Negated because the sensor rotates clockwise; azimuth then grows
        // monotonically over the sweep.
        let start_ori = -first.y.atan2(first.x);
        let end_ori = normalize_end_azimuth(start_ori, -last.y.atan2(last.x) + 2.0 * PI);
        let mut half_passed = false;

        for sensor_point in &finite {
            let p = frame::sensor_to_internal(*sensor_point);

            let elevation = p.y.atan2((p.x * p.x + p.z * p.z).sqrt()).to_degrees();
            let scan_id = match beam_index(elevation, config.num_scans) {
                Some(id) => id,
                None => continue,
            };

            let mut ori = -p.x.atan2(p.z);
            if !half_passed {
                if ori < start_ori - FRAC_PI_2 {
                    ori += 2.0 * PI;
                } else if ori > start_ori + 3.0 * FRAC_PI_2 {
                    ori -= 2.0 * PI;
                }
                if ori - start_ori > PI {
                    half_passed = true;
                }
            } else {
                ori += 2.0 * PI;
                if ori < end_ori - 3.0 * FRAC_PI_2 {
                    ori += 2.0 * PI;
                } else if ori > end_ori + FRAC_PI_2 {
                    ori -= 2.0 * PI;
                }
            }

            // May fall slightly outside [0, 1] at the sweep ends; the value
            // is intentionally left unclipped.
            let rel_time = (ori - start_ori) / (end_ori - start_ori);

            let mut point = Point3::with_intensity(
                p.x,
                p.y,
                p.z,
                Point3::encode_intensity(scan_id, rel_time, config.scan_period),
            );
            compensator.process(&mut point, ring, msg.stamp, rel_time, config.scan_period);
            scans[scan_id].push(point);
            kept += 1;
        }
    }

    let mut cloud = PointCloud3::with_capacity(kept);
    for scan in &scans {
        cloud.append(scan);
    }

    AssembledSweep {
        cloud,
        motion: compensator.summary(),
    }
}
