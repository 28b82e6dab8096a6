//! Fixed-capacity IMU ring buffer with inertial integration.
//!
//! Each incoming sample has gravity removed in the sensor frame, is remapped
//! into the internal frame, rotated into the world frame, and integrated into
//! velocity and position under a uniform-acceleration assumption between
//! consecutive samples. The sweep consumer interpolates ring state at
//! arbitrary point times via [`ImuRing::state_at`].

use crate::core::math::{self, Vec3};
use crate::core::types::{ImuReading, ImuState};
use crate::utils::constants::{GRAVITY, IMU_QUEUE_LENGTH};
use std::f32::consts::PI;

/// Interpolated inertial state at a single point time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImuSnapshot {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub velocity: Vec3,
    pub shift: Vec3,
}

impl ImuSnapshot {
    fn from_state(state: &ImuState) -> Self {
        Self {
            roll: state.roll,
            pitch: state.pitch,
            yaw: state.yaw,
            velocity: state.velocity,
            shift: state.shift,
        }
    }
}

/// Circular buffer of integrated IMU samples.
///
/// Two cursors: `last` marks the most recently written slot (`None` before
/// the first sample), `front` is the consumer's time-search cursor. `front`
/// persists across sweeps as a lookup hint; point times within a sweep are
/// monotonically increasing, so the cursor rarely moves more than a few
/// slots per query.
#[derive(Debug, Clone)]
pub struct ImuRing {
    samples: Vec<ImuState>,
    last: Option<usize>,
    front: usize,
    scan_period: f32,
}

impl ImuRing {
    /// Create an empty ring with the standard capacity.
    pub fn new(scan_period: f32) -> Self {
        Self::with_capacity(IMU_QUEUE_LENGTH, scan_period)
    }

    /// Create an empty ring with an explicit capacity.
    pub fn with_capacity(capacity: usize, scan_period: f32) -> Self {
        Self {
            samples: vec![ImuState::default(); capacity.max(2)],
            last: None,
            front: 0,
            scan_period,
        }
    }

    /// Whether any sample has been received yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    /// Most recently written sample, if any.
    pub fn latest(&self) -> Option<&ImuState> {
        self.last.map(|i| &self.samples[i])
    }

    /// Ingest one raw sample: gravity removal, axis remap, world rotation,
    /// and velocity/position integration.
    pub fn push(&mut self, reading: &ImuReading) {
        let (roll, pitch, yaw) = reading.orientation.to_euler();

        // Remove gravity in the sensor frame; the component swap is the
        // sensor-to-internal axis remap folded in.
        let lin = reading.linear_acceleration;
        let acc = Vec3::new(
            lin.y - roll.sin() * pitch.cos() * GRAVITY,
            lin.z - roll.cos() * pitch.cos() * GRAVITY,
            lin.x + pitch.sin() * GRAVITY,
        );
        let acc_world = math::rotate_to_world(acc, roll, pitch, yaw);

        let capacity = self.samples.len();
        let last = match self.last {
            None => 0,
            Some(l) => (l + 1) % capacity,
        };
        let back = (last + capacity - 1) % capacity;

        // Uniform acceleration between consecutive samples. Anything slower
        // than the sweep period means startup noise or a stalled IMU, not
        // real motion: reset to rest instead of integrating across the gap.
        let dt = (reading.time - self.samples[back].time) as f32;
        let (velocity, shift) = if dt < self.scan_period {
            let prev = &self.samples[back];
            (
                prev.velocity + acc_world * dt,
                prev.shift + prev.velocity * dt + acc_world * (0.5 * dt * dt),
            )
        } else {
            log::debug!("imu gap {:.3}s >= scan period, integrating from rest", dt);
            (Vec3::zero(), Vec3::zero())
        };

        self.samples[last] = ImuState {
            time: reading.time,
            roll,
            pitch,
            yaw,
            acceleration: acc_world,
            velocity,
            shift,
        };
        self.last = Some(last);
    }

    /// Interpolate ring state at time `t`.
    ///
    /// Advances the `front` cursor until it reaches a sample at or past `t`
    /// or catches up with `last`. Past the newest sample the latest state is
    /// used as-is; otherwise roll/pitch/yaw/velocity/shift are linearly
    /// interpolated between the bracketing samples, with yaw unwrapped
    /// across the ±π seam.
    ///
    /// Returns `None` before the first sample has arrived.
    pub fn state_at(&mut self, t: f64) -> Option<ImuSnapshot> {
        let last = self.last?;
        let capacity = self.samples.len();

        while self.front != last {
            if t < self.samples[self.front].time {
                break;
            }
            self.front = (self.front + 1) % capacity;
        }

        let front_state = self.samples[self.front];
        if t > front_state.time {
            // front == last and the point is newer than everything in the
            // ring; the newest sample is the best available estimate.
            return Some(ImuSnapshot::from_state(&front_state));
        }

        let back = (self.front + capacity - 1) % capacity;
        let back_state = self.samples[back];
        let span = front_state.time - back_state.time;
        if span <= 0.0 {
            return Some(ImuSnapshot::from_state(&front_state));
        }

        let ratio_front = ((t - back_state.time) / span) as f32;
        let ratio_back = 1.0 - ratio_front;

        let mut back_yaw = back_state.yaw;
        if front_state.yaw - back_yaw > PI {
            back_yaw += 2.0 * PI;
        } else if front_state.yaw - back_yaw < -PI {
            back_yaw -= 2.0 * PI;
        }

        Some(ImuSnapshot {
            roll: front_state.roll * ratio_front + back_state.roll * ratio_back,
            pitch: front_state.pitch * ratio_front + back_state.pitch * ratio_back,
            yaw: front_state.yaw * ratio_front + back_yaw * ratio_back,
            velocity: front_state.velocity * ratio_front + back_state.velocity * ratio_back,
            shift: front_state.shift * ratio_front + back_state.shift * ratio_back,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Quaternion;
    use approx::assert_relative_eq;

    /// A reading whose accelerometer sees exactly gravity at identity
    /// attitude, plus an extra internal-frame acceleration `a`.
    fn level_reading(time: f64, a: Vec3) -> ImuReading {
        // internal (x, y, z) maps back to sensor (y, z, x)
        let lin = Vec3::new(a.z, a.x, a.y + GRAVITY);
        ImuReading::new(time, Quaternion::identity(), lin)
    }

    #[test]
    fn test_gravity_cancels_at_rest() {
        let mut ring = ImuRing::new(0.1);
        ring.push(&level_reading(100.0, Vec3::zero()));
        let state = ring.latest().unwrap();
        assert_relative_eq!(state.acceleration.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(state.acceleration.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(state.acceleration.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_constant_acceleration_integration() {
        // s(T) ~ a*T^2/2 and v(T) ~ a*T for a constant world acceleration
        let mut ring = ImuRing::new(0.1);
        let a = Vec3::new(0.0, 0.0, 2.0);
        let dt = 0.01;
        let n = 10;
        for k in 0..=n {
            ring.push(&level_reading(100.0 + k as f64 * dt, a));
        }
        let total = (n as f32) * dt as f32;
        let state = ring.latest().unwrap();
        assert_relative_eq!(state.velocity.z, a.z * total, epsilon = 1e-4);
        // discrete sum: s = sum(v_prev*dt + a*dt^2/2) = a*T^2/2 exactly
        assert_relative_eq!(state.shift.z, 0.5 * a.z * total * total, epsilon = 1e-4);
    }

    #[test]
    fn test_gap_resets_to_rest() {
        let mut ring = ImuRing::new(0.1);
        let a = Vec3::new(1.0, 0.0, 0.0);
        ring.push(&level_reading(100.0, a));
        ring.push(&level_reading(100.01, a));
        assert!(ring.latest().unwrap().velocity.x > 0.0);

        // a gap larger than the scan period discards the integrated motion
        ring.push(&level_reading(101.0, a));
        let state = ring.latest().unwrap();
        assert_relative_eq!(state.velocity.x, 0.0);
        assert_relative_eq!(state.shift.x, 0.0);
    }

    #[test]
    fn test_state_at_interpolates() {
        let mut ring = ImuRing::new(0.1);
        let mut r0 = level_reading(100.0, Vec3::zero());
        r0.orientation = Quaternion::from_euler(0.0, 0.0, 0.2);
        ring.push(&r0);
        let mut r1 = level_reading(100.01, Vec3::zero());
        r1.orientation = Quaternion::from_euler(0.0, 0.0, 0.4);
        ring.push(&r1);

        let snap = ring.state_at(100.005).unwrap();
        assert_relative_eq!(snap.yaw, 0.3, epsilon = 1e-4);
    }

    #[test]
    fn test_state_at_past_newest_uses_latest() {
        let mut ring = ImuRing::new(0.1);
        ring.push(&level_reading(100.0, Vec3::zero()));
        let mut r1 = level_reading(100.01, Vec3::zero());
        r1.orientation = Quaternion::from_euler(0.1, 0.0, 0.0);
        ring.push(&r1);

        let snap = ring.state_at(100.5).unwrap();
        assert_relative_eq!(snap.roll, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_state_at_empty_ring() {
        let mut ring = ImuRing::new(0.1);
        assert!(ring.state_at(100.0).is_none());
    }

    #[test]
    fn test_yaw_unwrap_across_pi() {
        let mut ring = ImuRing::new(0.1);
        let mut r0 = level_reading(100.0, Vec3::zero());
        r0.orientation = Quaternion::from_euler(0.0, 0.0, PI - 0.1);
        ring.push(&r0);
        let mut r1 = level_reading(100.01, Vec3::zero());
        r1.orientation = Quaternion::from_euler(0.0, 0.0, -PI + 0.1);
        ring.push(&r1);

        // halfway between +3.04 and -3.04 through the seam is ±π, not 0
        let snap = ring.state_at(100.005).unwrap();
        assert!(
            snap.yaw.abs() > PI - 0.2,
            "interpolated yaw {} should stay near the seam",
            snap.yaw
        );
    }

    #[test]
    fn test_ring_wraps() {
        let mut ring = ImuRing::with_capacity(4, 0.1);
        for k in 0..10 {
            ring.push(&level_reading(100.0 + k as f64 * 0.01, Vec3::zero()));
        }
        assert_relative_eq!(ring.latest().unwrap().time, 100.09, epsilon = 1e-9);
    }
}
