//! Per-sweep curvature estimation and reliability masking.
//!
//! Curvature here is not geometric curvature: it is the squared magnitude of
//! an 11-tap centered difference over consecutive same-beam points, used
//! only to rank candidates. Points whose neighborhoods straddle an occlusion
//! edge or lie on a surface nearly parallel to the beam are masked out of
//! candidacy before selection.

use crate::core::types::PointCloud3;
use crate::registration::config::RegistrationConfig;

/// Classification of a point after feature selection.
///
/// `Sharp`/`LessSharp` are corner labels, `Flat` a selected surface point,
/// and `Unassigned` the less-flat residue. Less-flat membership covers both
/// `Unassigned` and `Flat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointLabel {
    Sharp,
    LessSharp,
    #[default]
    Unassigned,
    Flat,
}

impl PointLabel {
    /// Whether the point belongs in the less-flat residue.
    #[inline]
    pub fn is_surface_candidate(self) -> bool {
        matches!(self, PointLabel::Unassigned | PointLabel::Flat)
    }
}

/// Per-sweep scratch state indexed by position in the concatenated cloud.
///
/// Created fresh for every sweep; nothing here survives across callbacks.
#[derive(Debug, Clone)]
pub struct SweepContext {
    /// 11-tap squared-difference curvature (zero outside the valid band).
    pub curvature: Vec<f32>,
    /// Masked out of feature candidacy.
    pub picked: Vec<bool>,
    /// Selection result per point.
    pub label: Vec<PointLabel>,
    /// First usable curvature index per beam.
    pub scan_start: Vec<usize>,
    /// One past the last usable curvature index per beam.
    pub scan_end: Vec<usize>,
}

impl SweepContext {
    /// Compute curvature and beam boundaries for an assembled cloud.
    ///
    /// The outer 5 points of each beam never become candidates: curvature is
    /// only defined for `5 <= i < n - 5`, and beam transitions (detected via
    /// the intensity integer part) push each beam's usable range 5 points
    /// inward from both sides.
    pub fn compute(cloud: &PointCloud3, config: &RegistrationConfig) -> Self {
        let n = cloud.len();
        let mut ctx = Self {
            curvature: vec![0.0; n],
            picked: vec![false; n],
            label: vec![PointLabel::Unassigned; n],
            scan_start: vec![0; config.num_scans],
            scan_end: vec![0; config.num_scans],
        };

        if n >= 11 {
            let pts = &cloud.points;
            let mut scan_count: i32 = -1;
            for i in 5..n - 5 {
                let mut dx = -10.0 * pts[i].x;
                let mut dy = -10.0 * pts[i].y;
                let mut dz = -10.0 * pts[i].z;
                for k in 1..=5 {
                    dx += pts[i - k].x + pts[i + k].x;
                    dy += pts[i - k].y + pts[i + k].y;
                    dz += pts[i - k].z + pts[i + k].z;
                }
                ctx.curvature[i] = dx * dx + dy * dy + dz * dz;

                // Curvature across a beam boundary mixes unrelated ranges;
                // shrink each beam's range clear of the seam.
                let line = pts[i].scan_line() as i32;
                if line != scan_count {
                    scan_count = line;
                    if scan_count > 0 && (scan_count as usize) < config.num_scans {
                        ctx.scan_start[scan_count as usize] = i + 5;
                        ctx.scan_end[scan_count as usize - 1] = i.saturating_sub(5);
                    }
                }
            }
        }

        if let Some(first) = ctx.scan_start.first_mut() {
            *first = 5;
        }
        if let Some(last) = ctx.scan_end.last_mut() {
            *last = n.saturating_sub(5);
        }
        ctx
    }

    /// Mask occlusion edges and near-parallel surfaces.
    ///
    /// Occlusion: where consecutive points jump in depth, the points on the
    /// farther side of the edge may disappear from the next sweep's
    /// viewpoint, so the edge-adjacent run of 6 points on the occluded side
    /// is masked. Parallel surfaces: points whose gaps to both neighbors are
    /// large relative to their depth sit on grazing surfaces or are isolated
    /// returns, and are masked as outliers.
    pub fn mask_unreliable(&mut self, cloud: &PointCloud3, config: &RegistrationConfig) {
        let n = cloud.len();
        if n < 12 {
            return;
        }
        let pts = &cloud.points;

        for i in 5..n - 6 {
            let diff = pts[i + 1].squared_distance(&pts[i]);

            if diff > config.occlusion_min_gap {
                let depth1 = pts[i].norm();
                let depth2 = pts[i + 1].norm();

                if depth1 > depth2 {
                    // Pull the nearer point's ray out to the farther depth
                    // and compare laterally.
                    let dx = pts[i + 1].x - pts[i].x * depth2 / depth1;
                    let dy = pts[i + 1].y - pts[i].y * depth2 / depth1;
                    let dz = pts[i + 1].z - pts[i].z * depth2 / depth1;
                    if (dx * dx + dy * dy + dz * dz).sqrt() / depth2
                        < config.occlusion_depth_ratio
                    {
                        for p in self.picked[i - 5..=i].iter_mut() {
                            *p = true;
                        }
                    }
                } else {
                    let dx = pts[i + 1].x * depth1 / depth2 - pts[i].x;
                    let dy = pts[i + 1].y * depth1 / depth2 - pts[i].y;
                    let dz = pts[i + 1].z * depth1 / depth2 - pts[i].z;
                    if (dx * dx + dy * dy + dz * dz).sqrt() / depth1
                        < config.occlusion_depth_ratio
                    {
                        for p in self.picked[i + 1..=i + 6].iter_mut() {
                            *p = true;
                        }
                    }
                }
            }

            let diff2 = pts[i].squared_distance(&pts[i - 1]);
            let dis = pts[i].squared_norm();
            if diff > config.outlier_ratio * dis && diff2 > config.outlier_ratio * dis {
                self.picked[i] = true;
            }
        }
    }
}
