//! A uniform box-grid spatial index over the bounding square of the annular
//! cell.
//!
//! Box side is chosen `>= D` (the rod diagonal) so that two overlapping rods
//! always have centers in the same box or one of its 8 neighbors. One extra,
//! permanently empty ring of boxes surrounds the occupied area, so every
//! occupied box has a full 3x3 neighborhood and no corner/edge case needs
//! special-casing when walking it.

use rods_core::Parameters;
use smallvec::SmallVec;

use crate::error::GridError;

/// Box coordinates of the occupied area's neighbor-coordinate lists.
///
/// The original implementation precomputes a full `boxes x boxes` grid of
/// neighbor-coordinate pairs, but each list only ever depends on one of the
/// two box indices (the x-neighbor list is the same for every box in a
/// given column, and likewise for y). Storing one list per column and one
/// per row is equivalent and avoids the redundant `boxes^2` table.
type NeighborCoords = SmallVec<[usize; 3]>;

/// Uniform box-grid spatial index.
pub struct Grid {
    boxes_per_side: usize,
    box_side: f64,
    half_extent: f64,
    boxes: Vec<Vec<SmallVec<[usize; 8]>>>,
    nb_x: Vec<NeighborCoords>,
    nb_y: Vec<NeighborCoords>,
}

impl Grid {
    /// Build an empty grid sized from `params`.
    ///
    /// The box side is derived as `2*R_out / (boxes_per_side - 2)`, leaving
    /// one empty box of frame on every side of the occupied area (matching
    /// the original's `GP::GRID::BOX_W`). Feasibility of `box_side >= D` is
    /// checked by `rods-engine::config` before a `Grid` is constructed.
    pub fn new(params: &Parameters) -> Self {
        let n = params.grid.boxes_per_side;
        let box_side = 2.0 * params.cell.outer_radius / (n as f64 - 2.0);
        let half_extent = 0.5 * n as f64 * box_side;

        let last = n - 1;
        let nb_x = (0..n)
            .map(|i| neighbor_coords_1d(i, last))
            .collect::<Vec<_>>();
        let nb_y = nb_x.clone();

        Self {
            boxes_per_side: n,
            box_side,
            half_extent,
            boxes: vec![vec![SmallVec::new(); n]; n],
            nb_x,
            nb_y,
        }
    }

    /// Number of boxes along one side of the bounding square.
    pub fn boxes_per_side(&self) -> usize {
        self.boxes_per_side
    }

    /// Side length of a single box.
    pub fn box_side(&self) -> f64 {
        self.box_side
    }

    /// Box coordinates containing the point `(x, y)`.
    pub fn box_coords(&self, x: f64, y: f64) -> (usize, usize) {
        let ix = ((x + self.half_extent) / self.box_side).floor() as isize;
        let iy = ((y + self.half_extent) / self.box_side).floor() as isize;
        let last = self.boxes_per_side as isize - 1;
        (ix.clamp(0, last) as usize, iy.clamp(0, last) as usize)
    }

    /// Insert index `k`, whose center is `(x, y)`, into its box.
    pub fn insert(&mut self, k: usize, x: f64, y: f64) {
        let (ix, iy) = self.box_coords(x, y);
        self.boxes[ix][iy].push(k);
    }

    /// Move index `k` from the box containing `(old_x, old_y)` to the box
    /// containing `(new_x, new_y)`.
    ///
    /// No-op if both points map to the same box. Removal from the old box
    /// is swap-remove, matching the original's `moveIndex`: order within a
    /// box is not meaningful.
    pub fn relocate(
        &mut self,
        k: usize,
        old_x: f64,
        old_y: f64,
        new_x: f64,
        new_y: f64,
    ) -> Result<(), GridError> {
        let old = self.box_coords(old_x, old_y);
        let new = self.box_coords(new_x, new_y);
        if old == new {
            return Ok(());
        }
        let src = &mut self.boxes[old.0][old.1];
        let pos = src.iter().position(|&idx| idx == k);
        match pos {
            Some(pos) => {
                src.swap_remove(pos);
                self.boxes[new.0][new.1].push(k);
                Ok(())
            }
            None => {
                tracing::error!(index = k, ?old, ?new, "rod not found in expected grid box");
                Err(GridError::IndexNotFound { index: k })
            }
        }
    }

    /// All indices in the box at `(x, y)` and its (up to 8) neighbors.
    ///
    /// Includes the query box's own contents; callers that must exclude a
    /// particular index (typically their own) do so by comparison.
    pub fn neighbors(&self, x: f64, y: f64) -> Vec<usize> {
        let (ix, iy) = self.box_coords(x, y);
        self.neighbors_of_box(ix, iy)
    }

    /// Same as [`Grid::neighbors`], addressed directly by box coordinates.
    pub fn neighbors_of_box(&self, ix: usize, iy: usize) -> Vec<usize> {
        let xs = &self.nb_x[ix];
        let ys = &self.nb_y[iy];
        let capacity: usize = xs
            .iter()
            .flat_map(|&x| ys.iter().map(move |&y| self.boxes[x][y].len()))
            .sum();
        let mut out = Vec::with_capacity(capacity);
        for &x in xs {
            for &y in ys {
                out.extend_from_slice(&self.boxes[x][y]);
            }
        }
        out
    }

    /// Iterate over all occupied box coordinates, in row-major order.
    ///
    /// Used by `rods-mc`'s by-box sweep variant to permute the visit order
    /// at box granularity.
    pub fn box_coordinates(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.boxes_per_side)
            .flat_map(move |ix| (0..self.boxes_per_side).map(move |iy| (ix, iy)))
    }

    /// Indices stored directly in the box at `(ix, iy)`, excluding its
    /// neighbors.
    pub fn box_contents(&self, ix: usize, iy: usize) -> &[usize] {
        &self.boxes[ix][iy]
    }
}

fn neighbor_coords_1d(i: usize, last: usize) -> NeighborCoords {
    let mut v = NeighborCoords::new();
    if i > 0 {
        v.push(i - 1);
    }
    v.push(i);
    if i < last {
        v.push(i + 1);
    }
    v
}
