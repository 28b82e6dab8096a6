//! Voxel-grid downsampling for 3D point clouds.
//!
//! Replaces each occupied cell of a cubic lattice with the centroid of its
//! member points. Output order follows first occupancy, so results are
//! deterministic for a given input ordering.

use crate::core::types::{Point3, PointCloud3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for voxel-grid downsampling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VoxelGridConfig {
    /// Cubic cell edge length in meters.
    pub leaf_size: f32,
}

impl Default for VoxelGridConfig {
    fn default() -> Self {
        Self { leaf_size: 0.2 }
    }
}

/// Centroid-per-cell voxel grid filter.
#[derive(Debug, Clone, Default)]
pub struct VoxelGrid {
    config: VoxelGridConfig,
}

struct CellAccum {
    x: f64,
    y: f64,
    z: f64,
    intensity: f64,
    count: u32,
}

impl VoxelGrid {
    /// Create a filter with the given configuration.
    pub fn new(config: VoxelGridConfig) -> Self {
        Self { config }
    }

    /// Downsample a cloud to one centroid per occupied cell.
    ///
    /// All point fields are averaged, intensity included. A non-positive
    /// leaf size passes the cloud through unchanged.
    pub fn apply(&self, cloud: &PointCloud3) -> PointCloud3 {
        if self.config.leaf_size <= 0.0 || cloud.is_empty() {
            return cloud.clone();
        }

        let inv_leaf = 1.0 / self.config.leaf_size;
        let mut cells: HashMap<(i32, i32, i32), usize> = HashMap::new();
        let mut accums: Vec<CellAccum> = Vec::new();

        for p in cloud.iter() {
            let key = (
                (p.x * inv_leaf).floor() as i32,
                (p.y * inv_leaf).floor() as i32,
                (p.z * inv_leaf).floor() as i32,
            );
            let idx = *cells.entry(key).or_insert_with(|| {
                accums.push(CellAccum {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                    intensity: 0.0,
                    count: 0,
                });
                accums.len() - 1
            });
            let cell = &mut accums[idx];
            cell.x += p.x as f64;
            cell.y += p.y as f64;
            cell.z += p.z as f64;
            cell.intensity += p.intensity as f64;
            cell.count += 1;
        }

        let mut out = PointCloud3::with_capacity(accums.len());
        for cell in &accums {
            let n = cell.count as f64;
            out.push(Point3::with_intensity(
                (cell.x / n) as f32,
                (cell.y / n) as f32,
                (cell.z / n) as f32,
                (cell.intensity / n) as f32,
            ));
        }
        out
    }
}
