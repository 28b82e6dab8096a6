//! Registration pipeline configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the scan registration pipeline.
///
/// Defaults match a VLP-16 spinning at 10 Hz. The comparison thresholds are
/// empirical; they interact with each other and with beam spacing, so change
/// them together or not at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Duration of one full sweep in seconds.
    pub scan_period: f32,

    /// Number of initial sweeps to discard while buffers warm up.
    pub system_delay: usize,

    /// Number of vertical beams (scan lines).
    ///
    /// VLP-16: 16 beams covering [-15°, +15°] at 2° spacing.
    pub num_scans: usize,

    /// Curvature above which a point is a corner candidate, below which a
    /// flat candidate.
    pub curvature_threshold: f32,

    /// Minimum squared gap between consecutive points before the occlusion
    /// test applies.
    pub occlusion_min_gap: f32,

    /// Depth-ratio threshold of the occlusion test: smaller means the
    /// neighborhood lies on a surface nearly parallel to the beam.
    pub occlusion_depth_ratio: f32,

    /// Outlier test ratio: points whose gaps to both neighbors exceed this
    /// fraction of their squared depth are dropped from candidacy.
    pub outlier_ratio: f32,

    /// Squared-distance gate for the neighbor spread mask around each
    /// selected feature.
    pub spread_threshold: f32,

    /// Sharp corners kept per sector.
    pub sharp_per_sector: usize,

    /// Less-sharp corners kept per sector (includes the sharp picks).
    pub less_sharp_per_sector: usize,

    /// Flat surface points kept per sector.
    pub flat_per_sector: usize,

    /// Sectors per beam; enforces even angular feature distribution.
    pub sectors_per_scan: usize,

    /// Voxel leaf size in meters for less-flat downsampling.
    pub voxel_leaf: f32,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            scan_period: 0.1,
            system_delay: 20,
            num_scans: 16,
            curvature_threshold: 0.1,
            occlusion_min_gap: 0.1,
            occlusion_depth_ratio: 0.1,
            outlier_ratio: 2e-4,
            spread_threshold: 0.05,
            sharp_per_sector: 2,
            less_sharp_per_sector: 20,
            flat_per_sector: 4,
            sectors_per_scan: 6,
            voxel_leaf: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistrationConfig::default();
        assert_eq!(config.num_scans, 16);
        assert_eq!(config.system_delay, 20);
        assert_eq!(config.sharp_per_sector, 2);
        assert_eq!(config.less_sharp_per_sector, 20);
        assert_eq!(config.flat_per_sector, 4);
        assert_eq!(config.sectors_per_scan, 6);
        assert!((config.scan_period - 0.1).abs() < 1e-6);
        assert!((config.voxel_leaf - 0.2).abs() < 1e-6);
    }
}
