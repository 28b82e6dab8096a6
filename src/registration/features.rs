//! Feature selection: sharp/less-sharp corners and flat/less-flat surfaces.
//!
//! Each beam's usable range is split into six contiguous sectors so that
//! features spread evenly around the sweep instead of clustering on one
//! structure. Within a sector, candidates are ranked by curvature; a spread
//! mask around every pick suppresses its immediate neighbors. Corner counts
//! differ from flat counts because downstream odometry wants many less-sharp
//! corners for robustness but few sharp ones for tight constraints, while
//! planes are abundant enough that the residue is voxel-downsampled instead.

use crate::core::types::PointCloud3;
use crate::registration::config::RegistrationConfig;
use crate::registration::curvature::{PointLabel, SweepContext};
use crate::registration::voxel::VoxelGrid;

/// The four feature clouds extracted from one sweep.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    /// Highest-curvature corners, at most 2 per sector.
    pub corner_sharp: PointCloud3,
    /// Corner candidates, at most 20 per sector; superset of `corner_sharp`.
    pub corner_less_sharp: PointCloud3,
    /// Lowest-curvature surface points, at most 4 per sector.
    pub surf_flat: PointCloud3,
    /// Voxel-downsampled residue of everything not labelled a corner.
    pub surf_less_flat: PointCloud3,
}

/// Select features over an assembled cloud.
///
/// `ctx` must have curvature computed and reliability masks applied; labels
/// and pick marks are written back into it as selection proceeds.
pub fn select_features(
    cloud: &PointCloud3,
    ctx: &mut SweepContext,
    voxel: &VoxelGrid,
    config: &RegistrationConfig,
) -> FeatureSet {
    let mut set = FeatureSet::default();
    let sectors = config.sectors_per_scan.max(1) as isize;

    for s in 0..config.num_scans {
        let mut less_flat_scan = PointCloud3::new();
        let start = ctx.scan_start[s] as isize;
        let end = ctx.scan_end[s] as isize;

        for j in 0..sectors {
            let sp = (start * (sectors - j) + end * j) / sectors;
            let ep = (start * (sectors - 1 - j) + end * (j + 1)) / sectors - 1;
            if ep < sp {
                continue;
            }
            let (sp, ep) = (sp as usize, ep as usize);

            let mut order: Vec<usize> = (sp..=ep).collect();
            order.sort_by(|&a, &b| ctx.curvature[a].total_cmp(&ctx.curvature[b]));

            // Corners, highest curvature first.
            let mut corners_picked = 0;
            for &i in order.iter().rev() {
                if ctx.picked[i] || ctx.curvature[i] <= config.curvature_threshold {
                    continue;
                }
                corners_picked += 1;
                if corners_picked <= config.sharp_per_sector {
                    ctx.label[i] = PointLabel::Sharp;
                    set.corner_sharp.push(cloud.points[i]);
                    set.corner_less_sharp.push(cloud.points[i]);
                } else if corners_picked <= config.less_sharp_per_sector {
                    ctx.label[i] = PointLabel::LessSharp;
                    set.corner_less_sharp.push(cloud.points[i]);
                } else {
                    break;
                }
                ctx.picked[i] = true;
                spread_mask(cloud, ctx, i, config.spread_threshold);
            }

            // Flats, lowest curvature first.
            let mut flats_picked = 0;
            for &i in order.iter() {
                if ctx.picked[i] || ctx.curvature[i] >= config.curvature_threshold {
                    continue;
                }
                ctx.label[i] = PointLabel::Flat;
                set.surf_flat.push(cloud.points[i]);
                flats_picked += 1;
                if flats_picked >= config.flat_per_sector {
                    break;
                }
                ctx.picked[i] = true;
                spread_mask(cloud, ctx, i, config.spread_threshold);
            }

            for k in sp..=ep {
                if ctx.label[k].is_surface_candidate() {
                    less_flat_scan.push(cloud.points[k]);
                }
            }
        }

        // The less-flat residue dwarfs the other categories; thin it per
        // beam before it joins the global cloud.
        set.surf_less_flat.append(&voxel.apply(&less_flat_scan));
    }

    set
}

/// Mask up to 5 neighbors on each side of a selected feature, stopping at
/// the first gap wider than the spread threshold.
fn spread_mask(cloud: &PointCloud3, ctx: &mut SweepContext, center: usize, threshold: f32) {
    let n = cloud.len();
    for l in 1..=5usize {
        let i = center + l;
        if i >= n {
            break;
        }
        if cloud.points[i].squared_distance(&cloud.points[i - 1]) > threshold {
            break;
        }
        ctx.picked[i] = true;
    }
    for l in 1..=5usize {
        if l > center {
            break;
        }
        let i = center - l;
        if cloud.points[i].squared_distance(&cloud.points[i + 1]) > threshold {
            break;
        }
        ctx.picked[i] = true;
    }
}
