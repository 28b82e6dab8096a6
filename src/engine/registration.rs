//! Scan registration engine: the per-sweep pipeline behind both callbacks.

use crate::core::types::{ImuReading, PointCloud3};
use crate::io::messages::SweepMessage;
use crate::registration::config::RegistrationConfig;
use crate::registration::curvature::SweepContext;
use crate::registration::deskew::MotionSummary;
use crate::registration::features::{self, FeatureSet};
use crate::registration::sweep;
use crate::registration::voxel::{VoxelGrid, VoxelGridConfig};
use crate::sensors::imu_ring::ImuRing;

/// Everything one processed sweep produces.
#[derive(Debug, Clone)]
pub struct SweepOutput {
    /// Timestamp of the input sweep (start of rotation), in seconds.
    pub stamp: f64,
    /// Full de-skewed cloud with intensity-encoded beam and time.
    pub cloud: PointCloud3,
    /// The four feature clouds.
    pub features: FeatureSet,
    /// IMU trajectory summary over the sweep.
    pub motion: MotionSummary,
}

/// Scan registration core.
///
/// Owns the IMU ring and the startup gate; everything else is per-sweep
/// state created inside [`handle_sweep`](Self::handle_sweep). The two
/// handlers mutate shared state without locks and must never run
/// concurrently; [`crate::io::RegistrationWorker`] provides the serialized
/// dispatch.
#[derive(Debug)]
pub struct ScanRegistration {
    config: RegistrationConfig,
    imu_ring: ImuRing,
    voxel: VoxelGrid,
    sweeps_discarded: usize,
}

impl ScanRegistration {
    /// Create a new engine.
    pub fn new(config: RegistrationConfig) -> Self {
        let imu_ring = ImuRing::new(config.scan_period);
        let voxel = VoxelGrid::new(VoxelGridConfig {
            leaf_size: config.voxel_leaf,
        });
        Self {
            config,
            imu_ring,
            voxel,
            sweeps_discarded: 0,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    /// Whether the startup gate has passed.
    pub fn is_warmed_up(&self) -> bool {
        self.sweeps_discarded >= self.config.system_delay
    }

    /// Ingest one IMU sample into the ring.
    pub fn handle_imu(&mut self, reading: &ImuReading) {
        self.imu_ring.push(reading);
    }

    /// Process one sweep.
    ///
    /// Returns `None` while the startup gate is discarding warm-up sweeps;
    /// afterwards every sweep yields an output, possibly with empty feature
    /// sets. There is no retry path: the next sweep is the retry.
    pub fn handle_sweep(&mut self, msg: &SweepMessage) -> Option<SweepOutput> {
        if !self.is_warmed_up() {
            self.sweeps_discarded += 1;
            log::debug!(
                "startup gate: discarding sweep {}/{}",
                self.sweeps_discarded,
                self.config.system_delay
            );
            return None;
        }

        let assembled = sweep::assemble(&self.config, &mut self.imu_ring, msg);
        let mut ctx = SweepContext::compute(&assembled.cloud, &self.config);
        ctx.mask_unreliable(&assembled.cloud, &self.config);
        let features =
            features::select_features(&assembled.cloud, &mut ctx, &self.voxel, &self.config);

        log::debug!(
            "sweep at {:.3}: {} points, {} sharp, {} less-sharp, {} flat, {} less-flat",
            msg.stamp,
            assembled.cloud.len(),
            features.corner_sharp.len(),
            features.corner_less_sharp.len(),
            features.surf_flat.len(),
            features.surf_less_flat.len(),
        );

        Some(SweepOutput {
            stamp: msg.stamp,
            cloud: assembled.cloud,
            features,
            motion: assembled.motion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn ring_sweep(stamp: f64, n: usize) -> SweepMessage {
        let points = (0..n)
            .map(|k| {
                let az = -(k as f32) * 2.0 * PI / n as f32;
                [2.0 * az.cos(), 2.0 * az.sin(), 0.0]
            })
            .collect();
        SweepMessage { stamp, points }
    }

    #[test]
    fn test_startup_gate_discards_then_processes() {
        let config = RegistrationConfig::default();
        let delay = config.system_delay;
        let mut engine = ScanRegistration::new(config);

        for k in 0..delay {
            assert!(
                engine.handle_sweep(&ring_sweep(k as f64 * 0.1, 64)).is_none(),
                "sweep {} should be discarded",
                k
            );
        }
        assert!(engine.is_warmed_up());
        let out = engine.handle_sweep(&ring_sweep(delay as f64 * 0.1, 64));
        assert!(out.is_some(), "first sweep past the gate must be processed");
    }

    #[test]
    fn test_empty_sweep_still_produces_output() {
        let config = RegistrationConfig {
            system_delay: 0,
            ..RegistrationConfig::default()
        };
        let mut engine = ScanRegistration::new(config);
        let out = engine
            .handle_sweep(&SweepMessage {
                stamp: 1.0,
                points: Vec::new(),
            })
            .expect("warmed engine always yields output");
        assert!(out.cloud.is_empty());
        assert!(out.features.corner_sharp.is_empty());
        assert!(out.features.surf_flat.is_empty());
    }

    #[test]
    fn test_output_stamp_matches_input() {
        let config = RegistrationConfig {
            system_delay: 0,
            ..RegistrationConfig::default()
        };
        let mut engine = ScanRegistration::new(config);
        let out = engine.handle_sweep(&ring_sweep(42.5, 64)).unwrap();
        assert!((out.stamp - 42.5).abs() < 1e-9);
    }
}
