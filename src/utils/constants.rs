//! Sensor constants shared across the pipeline.

/// Standard gravity in m/s², removed from accelerometer readings on ingress.
pub const GRAVITY: f32 = 9.81;

/// Capacity of the IMU ring buffer.
///
/// At typical IMU rates (100-400 Hz) this covers well over one sweep period,
/// and bounds interpolation lookup cost to O(capacity) worst case.
pub const IMU_QUEUE_LENGTH: usize = 200;

/// Hard cap on points kept per sweep.
///
/// A VLP-16 produces ~30000 points per 0.1 s rotation; anything past this
/// cap is dropped rather than grown into.
pub const MAX_SWEEP_POINTS: usize = 40000;
