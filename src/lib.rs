//! KiranaOdom - Scan registration front-end for LOAM-family LiDAR odometry.
//!
//! For each sweep of a multi-beam rotating LiDAR this crate de-skews points
//! using inertial data, restores per-beam scan order, estimates a scalar
//! curvature per point, filters near-grazing and occlusion-edge
//! neighborhoods, and classifies the survivors into the four feature
//! categories consumed by downstream odometry: sharp corners, less-sharp
//! corners, flat surfaces, and less-flat surfaces.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      io/                            │  ← Messages, emission, dispatch
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    engine/                          │  ← Per-sweep orchestration
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                 registration/                       │  ← Ingestion, de-skew, curvature,
//! │                                                     │    feature selection
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   sensors/                          │  ← Frame remap, IMU ring
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Types, math
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Frames
//!
//! Two right-handed frames exist. The sensor frame is x-forward, y-left,
//! z-up; the internal frame is z-forward, x-left, y-up. Every sensor point
//! and every gravity-corrected IMU acceleration is remapped on ingress
//! (see [`sensors::frame`]), and all rotation chains thereafter compose as
//! `Ry(yaw)·Rx(pitch)·Rz(roll)`.
//!
//! # Processing model
//!
//! Two producer endpoints drive the core: an IMU callback and a sweep
//! callback. Both mutate shared state without locks, so dispatch is
//! single-threaded cooperative: [`io::RegistrationWorker`] serializes the
//! two over crossbeam channels, draining pending IMU samples before each
//! sweep so the ring is fully integrated when the sweep reads it.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Sensor processing (depends on core)
// ============================================================================
pub mod sensors;

// ============================================================================
// Layer 3: Registration algorithms (depends on core, sensors)
// ============================================================================
pub mod registration;

// ============================================================================
// Layer 4: Engine (depends on core, sensors, registration)
// ============================================================================
pub mod engine;

// ============================================================================
// Layer 5: I/O (depends on all layers)
// ============================================================================
pub mod io;

pub mod utils;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::math::{self, Vec3};
pub use crate::core::types::{ImuReading, ImuState, Point3, PointCloud3, Quaternion};

// Sensors
pub use crate::sensors::frame;
pub use crate::sensors::imu_ring::{ImuRing, ImuSnapshot};

// Registration
pub use crate::registration::config::RegistrationConfig;
pub use crate::registration::curvature::{PointLabel, SweepContext};
pub use crate::registration::deskew::{MotionCompensator, MotionSummary};
pub use crate::registration::features::FeatureSet;
pub use crate::registration::voxel::{VoxelGrid, VoxelGridConfig};

// Engine
pub use crate::engine::registration::{ScanRegistration, SweepOutput};

// I/O
pub use crate::io::emitter::{ChannelSink, SinkError, SweepEmitter, SweepSink};
pub use crate::io::messages::{
    CloudFrame, InputTopics, OutputTopics, SweepMessage, CAMERA_FRAME_ID,
};
pub use crate::io::RegistrationWorker;
