//! Initial-configuration filling strategies.
//!
//! Two strategies, grounded in the original `fillAnnularCell` /
//! `fillMissingRods` C++ routines: random rejection (the primary strategy)
//! and a deterministic ring-packing strategy layered on top of it as an
//! optimization for high packing fractions. Both return the count of rods
//! still at the sentinel pose when they finish; the caller decides whether
//! to proceed, retry, or abort.

use std::f64::consts::{FRAC_PI_2, TAU};

use rand::Rng;
use rods_core::Rod;

use crate::cell::{sentinel_rod, AnnularCell};

const POSITION_TRIALS: usize = 1000;
const MISSING_POSITION_TRIALS: usize = 500;
const MISSING_ORIENTATION_TRIALS: usize = 100;

fn random_rod(rng: &mut impl Rng, outer_radius: f64) -> Rod {
    let x = rng.gen_range(-outer_radius..=outer_radius);
    let y = rng.gen_range(-outer_radius..=outer_radius);
    let angle = rng.gen_range(-FRAC_PI_2..=FRAC_PI_2);
    Rod::new(x, y, angle)
}

/// Random-rejection fill: for each index in turn, draw up to
/// [`POSITION_TRIALS`] candidate poses uniformly over the bounding square
/// and `[-pi/2, pi/2]`, accepting the first that clears the walls and every
/// already-placed rod. On exhausting the trial budget, the index is left
/// at the sentinel pose and recorded as missing.
///
/// Returns the number of indices still missing.
pub fn fill(cell: &mut AnnularCell, rng: &mut impl Rng) -> usize {
    let outer_radius = cell.params().cell.outer_radius;
    let n = cell.params().num_rods;
    cell.missing_mut().clear();

    for i in 0..n {
        let mut placed = false;
        let mut candidate = sentinel_rod(cell.params());
        for _ in 0..POSITION_TRIALS {
            candidate = random_rod(rng, outer_radius);
            if !cell.inside_walls(&candidate) {
                continue;
            }
            let overlaps_existing = (0..i)
                .any(|j| candidate.overlaps(&cell.rods()[j], &cell.params().rod));
            if !overlaps_existing {
                placed = true;
                break;
            }
        }
        if placed {
            cell.rods_mut()[i] = candidate;
        } else {
            tracing::warn!(index = i, "rod not included during initial fill");
            cell.missing_mut().push(i);
        }
    }

    rebuild_grid(cell);
    cell.missing().len()
}

/// Retry-fill for indices recorded as missing by a prior [`fill`] call:
/// for each, try up to [`MISSING_POSITION_TRIALS`] random positions, and
/// for each position up to [`MISSING_ORIENTATION_TRIALS`] random
/// orientations — every trial independent, matching the original's nested
/// retry loop rather than the cumulative-offset variant flagged as a bug
/// in the source this was distilled from.
///
/// Returns the number of indices still missing.
pub fn fill_missing(cell: &mut AnnularCell, rng: &mut impl Rng) -> usize {
    let outer_radius = cell.params().cell.outer_radius;
    let n = cell.params().num_rods;
    let missing = cell.missing().to_vec();
    let mut still_missing = Vec::new();

    for i in missing {
        let mut placed = false;
        'positions: for _ in 0..MISSING_POSITION_TRIALS {
            let x = rng.gen_range(-outer_radius..=outer_radius);
            let y = rng.gen_range(-outer_radius..=outer_radius);
            for _ in 0..MISSING_ORIENTATION_TRIALS {
                let angle = rng.gen_range(-FRAC_PI_2..=FRAC_PI_2);
                let candidate = Rod::new(x, y, angle);
                if !cell.inside_walls(&candidate) {
                    continue;
                }
                let overlaps_existing = (0..n)
                    .filter(|&j| j != i)
                    .any(|j| candidate.overlaps(&cell.rods()[j], &cell.params().rod));
                if !overlaps_existing {
                    let old = cell.rod(i);
                    cell.grid_mut()
                        .relocate(i, old.x, old.y, candidate.x, candidate.y)
                        .expect("missing rod was present in its grid box");
                    cell.rods_mut()[i] = candidate;
                    placed = true;
                    break 'positions;
                }
            }
        }
        if !placed {
            still_missing.push(i);
        }
    }

    tracing::info!(remaining = still_missing.len(), "fill_missing finished");
    *cell.missing_mut() = still_missing;
    cell.missing().len()
}

/// Deterministic ring-packing fill: place rods tangent to successively
/// shrinking concentric rings, spaced so consecutive rods on the same ring
/// just clear each other lengthwise. Any indices the packing could not
/// place (radial remainder too thin for another ring, or the ensemble is
/// larger than the packing's capacity) are handed to [`fill`] for a
/// random-rejection pass restricted to exactly those indices.
///
/// Returns the number of indices still missing after both passes.
pub fn fill_ring_packing(cell: &mut AnnularCell, rng: &mut impl Rng) -> usize {
    let params = *cell.params();
    let half_width = params.rod.half_width;
    let half_length = params.rod.half_length;
    let ring_pitch = params.rod.length + 0.1 * params.rod.width;
    let min_radius = params.cell.inner_radius + half_width;

    let mut radius = params.cell.outer_radius - half_width;
    let mut next_index = 0usize;

    while radius >= min_radius && next_index < params.num_rods {
        let clearance = (radius - half_width).max(half_width);
        let angular_step = 2.0 * (half_length / clearance).atan();
        if !angular_step.is_finite() || angular_step <= 0.0 {
            break;
        }
        let count = (TAU / angular_step).floor() as usize;
        if count == 0 {
            radius -= ring_pitch;
            continue;
        }
        let step = TAU / count as f64;
        for slot in 0..count {
            if next_index >= params.num_rods {
                break;
            }
            let theta = slot as f64 * step;
            let candidate = Rod::new(
                radius * theta.cos(),
                radius * theta.sin(),
                theta + FRAC_PI_2,
            );
            if !cell.inside_walls(&candidate) {
                continue;
            }
            let overlaps_existing = (0..next_index)
                .any(|j| candidate.overlaps(&cell.rods()[j], &cell.params().rod));
            if !overlaps_existing {
                cell.rods_mut()[next_index] = candidate;
                next_index += 1;
            }
        }
        radius -= ring_pitch;
    }

    for i in next_index..params.num_rods {
        cell.rods_mut()[i] = sentinel_rod(&params);
    }
    *cell.missing_mut() = (next_index..params.num_rods).collect();
    rebuild_grid(cell);

    if cell.missing().is_empty() {
        0
    } else {
        fill_missing(cell, rng)
    }
}

fn rebuild_grid(cell: &mut AnnularCell) {
    let rods = cell.rods().to_vec();
    let missing = cell.missing().to_vec();
    cell.load_rods(rods, missing);
}
