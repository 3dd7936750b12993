//! [`AnnularCell`]: ownership of the rod ensemble and its spatial index,
//! wall predicates, and single-rod validation.

use std::f64::consts::PI;

use rods_core::{Parameters, Rod};
use rods_space::Grid;

use crate::error::CellError;

/// Owns a fixed-size ensemble of rods and the grid indexing them, inside an
/// annulus of inner radius `R_in` and outer radius `R_out`.
///
/// Invariant in any "valid" state: every rod lies strictly inside the
/// annular region and no two rods overlap. During filling (see
/// [`crate::fill`]) this is relaxed: rods that could not be placed sit at a
/// sentinel pose outside the cell, and their indices are tracked in
/// [`AnnularCell::missing`].
pub struct AnnularCell {
    params: Parameters,
    rods: Vec<Rod>,
    grid: Grid,
    missing: Vec<usize>,
}

impl AnnularCell {
    /// Construct an empty cell: every rod sits at the sentinel pose and is
    /// recorded as missing. Call a filling strategy from [`crate::fill`]
    /// before using the cell for anything else.
    pub fn new(params: Parameters) -> Self {
        let grid = Grid::new(&params);
        let sentinel = sentinel_rod(&params);
        let rods = vec![sentinel; params.num_rods];
        let mut cell = Self {
            params,
            rods,
            grid,
            missing: (0..params.num_rods).collect(),
        };
        for k in 0..cell.rods.len() {
            let r = cell.rods[k];
            cell.grid.insert(k, r.x, r.y);
        }
        cell
    }

    /// The shared parameter bundle this cell was built from.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// The full rod ensemble, in index order.
    pub fn rods(&self) -> &[Rod] {
        &self.rods
    }

    /// The rod at `index`.
    pub fn rod(&self, index: usize) -> Rod {
        self.rods[index]
    }

    /// The spatial index over the current rod positions.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Indices currently sitting at the sentinel pose rather than a valid
    /// position.
    pub fn missing(&self) -> &[usize] {
        &self.missing
    }

    pub(crate) fn missing_mut(&mut self) -> &mut Vec<usize> {
        &mut self.missing
    }

    pub(crate) fn rods_mut(&mut self) -> &mut Vec<Rod> {
        &mut self.rods
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// `true` if `rod` overlaps the inner wall.
    ///
    /// Fast bracketing on center distance, falling back to the exact
    /// trig-region formula grounded in the original `rodIsTouchingInnerWall`.
    pub fn touches_inner_wall(&self, rod: &Rod) -> bool {
        let rp = &self.params.rod;
        let r_in = self.params.cell.inner_radius;

        let r_plus_half_l = r_in + rp.half_length;
        let r_plus_half_w = r_in + rp.half_width;
        let half_d_over_r = rp.half_diagonal / r_in;
        let phi_one = rp.half_width.atan2(r_plus_half_l);
        let phi_two = r_plus_half_w.atan2(rp.half_length);
        let inner_min_dist = r_in + rp.half_width;
        let inner_max_dist = r_in + rp.half_diagonal;

        let distance = (rod.x * rod.x + rod.y * rod.y).sqrt();
        if distance > inner_max_dist {
            return false;
        }
        if distance < inner_min_dist {
            return true;
        }

        let theta = rod.y.atan2(rod.x);
        let mut phi = (rod.angle - theta).abs();
        if phi > PI {
            phi -= PI;
        }
        if phi > PI / 2.0 {
            phi = PI - phi;
        }

        let min_dist = if phi < phi_one {
            r_plus_half_l / phi.cos()
        } else if phi > phi_two {
            r_plus_half_w / phi.sin()
        } else {
            let lambda = (half_d_over_r * (rp.alpha - phi).sin()).asin();
            if phi < rp.alpha {
                (rp.half_length + r_in * (phi - lambda).cos()) / phi.cos()
            } else {
                (rp.half_width + r_in * (phi - lambda).sin()) / phi.sin()
            }
        };

        distance < min_dist
    }

    /// `true` if `rod` overlaps the outer wall.
    pub fn touches_outer_wall(&self, rod: &Rod) -> bool {
        let rp = &self.params.rod;
        let r_out = self.params.cell.outer_radius;

        let outer_min_dist = r_out - rp.half_width;
        let outer_max_dist = r_out - rp.half_diagonal;

        let distance = (rod.x * rod.x + rod.y * rod.y).sqrt();
        if distance > outer_min_dist {
            return true;
        }
        if distance < outer_max_dist {
            return false;
        }

        let theta = rod.y.atan2(rod.x);
        let mut phi = rod.angle - theta;
        if phi < -PI / 2.0 {
            phi += PI;
        } else if phi > PI / 2.0 {
            phi -= PI;
        }

        let rho = (rp.alpha - phi.abs()).cos();
        let bound = (r_out * r_out - rp.half_diagonal * rp.half_diagonal * (1.0 - rho * rho)).sqrt()
            - rp.half_diagonal * rho;
        distance > bound
    }

    /// `true` if `rod` is inside both walls (touches neither).
    pub fn inside_walls(&self, rod: &Rod) -> bool {
        !self.touches_inner_wall(rod) && !self.touches_outer_wall(rod)
    }

    /// `true` if `rod` is inside the walls and overlaps no rod in the
    /// ensemble other than `exclude` (its own index, if it is already a
    /// member).
    pub fn is_valid(&self, rod: &Rod, exclude: Option<usize>) -> bool {
        if !self.inside_walls(rod) {
            return false;
        }
        let candidates = self.grid.neighbors(rod.x, rod.y);
        candidates
            .into_iter()
            .filter(|&j| Some(j) != exclude)
            .all(|j| !rod.overlaps(&self.rods[j], &self.params.rod))
    }

    /// Replace the entire rod ensemble, rebuilding the spatial index from
    /// scratch.
    ///
    /// `rods.len()` must equal `params().num_rods`. `missing` records which
    /// indices still sit at a sentinel pose rather than a validated one.
    /// Positions are not checked against the walls or each other here;
    /// callers loading a snapshot file are trusted to supply a consistent
    /// ensemble, matching the original's direct `m_bundle` assignment in
    /// `fillFromFile` / `fillAnnularCellFromFile`.
    pub fn load_rods(&mut self, rods: Vec<Rod>, missing: Vec<usize>) {
        let params = self.params;
        self.grid = Grid::new(&params);
        for (k, r) in rods.iter().enumerate() {
            self.grid.insert(k, r.x, r.y);
        }
        self.rods = rods;
        self.missing = missing;
    }

    /// Validate a candidate pose for rod `k`, committing it on acceptance.
    ///
    /// Enumerates the 3x3 grid neighborhood of `candidate`'s box (including
    /// `k` itself, excluded by index comparison) and short-circuits on the
    /// first overlap. On accept, also commits: relocates `k` in the grid
    /// from its old box to the new one and overwrites the ensemble entry.
    /// On reject, no state changes. Returns `Ok(true)` on commit,
    /// `Ok(false)` on rejection.
    pub fn is_internal_position_valid(
        &mut self,
        k: usize,
        candidate: Rod,
    ) -> Result<bool, CellError> {
        if !self.is_valid(&candidate, Some(k)) {
            return Ok(false);
        }
        let old = self.rods[k];
        self.grid
            .relocate(k, old.x, old.y, candidate.x, candidate.y)?;
        self.rods[k] = candidate;
        Ok(true)
    }
}

/// The sentinel pose used for unplaced rods: the original's placeholder at
/// the outer corner, angle `-alpha`.
pub(crate) fn sentinel_rod(params: &Parameters) -> Rod {
    Rod::new(
        params.cell.outer_radius,
        params.cell.outer_radius,
        -params.rod.alpha,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Parameters {
        Parameters::with_defaults(1.0, 4.0, 20.0, 70.0, 10, 0).unwrap()
    }

    #[test]
    fn rod_at_origin_touches_inner_wall() {
        let cell = AnnularCell::new(params());
        let rod = Rod::new(0.0, 0.0, 0.0);
        assert!(cell.touches_inner_wall(&rod));
        assert!(!cell.touches_outer_wall(&rod));
    }

    #[test]
    fn rod_far_outside_touches_outer_wall() {
        let cell = AnnularCell::new(params());
        let rod = Rod::new(200.0, 0.0, 0.0);
        assert!(cell.touches_outer_wall(&rod));
        assert!(!cell.touches_inner_wall(&rod));
    }

    #[test]
    fn rod_clearly_inside_touches_neither_wall() {
        let cell = AnnularCell::new(params());
        let rod = Rod::new(30.0, 0.0, 0.0);
        assert!(!cell.touches_inner_wall(&rod));
        assert!(!cell.touches_outer_wall(&rod));
        assert!(cell.inside_walls(&rod));
    }

    #[test]
    fn empty_ensemble_rod_clearly_inside_is_valid() {
        let cell = AnnularCell::new(params());
        let rod = Rod::new(30.0, 0.0, 0.0);
        assert!(cell.is_valid(&rod, None));
    }

    #[test]
    fn new_cell_has_all_indices_missing() {
        let cell = AnnularCell::new(params());
        assert_eq!(cell.missing().len(), cell.params().num_rods);
    }
}
