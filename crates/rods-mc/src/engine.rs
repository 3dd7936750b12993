//! The Metropolis sweep engine: proposal generation, acceptance, and
//! adaptive step-size control.

use rand::seq::SliceRandom;
use rand::Rng;

use rods_cell::AnnularCell;
use rods_core::Rod;

use crate::error::McError;

/// Outcome of a single sweep: every rod was proposed exactly once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepReport {
    /// Number of rods in the ensemble (every sweep proposes each exactly once).
    pub attempted: u64,
    /// Number of proposals committed.
    pub successes: u64,
    /// `successes / attempted`.
    pub acceptance: f64,
}

/// Holds the adaptive proposal step sizes between sweeps.
///
/// Distinct from [`rods_core::Parameters`], whose `mc.step_translation` /
/// `mc.step_angle` only seed the initial values: the engine's step sizes
/// change every sweep, while `Parameters` stays immutable.
pub struct McEngine {
    step_translation: f64,
    step_angle: f64,
    target_acceptance: f64,
}

impl McEngine {
    /// Seed an engine from a parameter bundle's initial step sizes and
    /// target acceptance ratio.
    pub fn new(params: &rods_core::Parameters) -> Self {
        Self {
            step_translation: params.mc.step_translation,
            step_angle: params.mc.step_angle,
            target_acceptance: params.mc.target_acceptance,
        }
    }

    /// Current half-width of the position proposal.
    pub fn step_translation(&self) -> f64 {
        self.step_translation
    }

    /// Current half-width of the angle proposal.
    pub fn step_angle(&self) -> f64 {
        self.step_angle
    }

    fn adapt(&mut self, report: &SweepReport) {
        let factor = 1.0 - self.target_acceptance + report.acceptance;
        self.step_translation *= factor;
        self.step_angle *= factor;
    }

    /// Propose a new pose for rod `i`, clamped back inside the bounding
    /// square if the raw displacement would carry it outside
    /// `[-R_out, R_out]`, matching the original's fold-back-to-`MAX_RADIUS`
    /// behavior rather than a hard clamp to the boundary.
    fn propose(&self, cell: &AnnularCell, i: usize, rng: &mut impl Rng) -> Rod {
        let rod = cell.rod(i);
        let outer = cell.params().cell.outer_radius;
        let max_radius = outer - cell.params().rod.half_diagonal;

        let dx = rng.gen_range(-self.step_translation..=self.step_translation);
        let dy = rng.gen_range(-self.step_translation..=self.step_translation);
        let da = rng.gen_range(-self.step_angle..=self.step_angle);

        let mut x = rod.x + dx;
        let mut y = rod.y + dy;
        if x > outer {
            x = max_radius;
        } else if x < -outer {
            x = -max_radius;
        }
        if y > outer {
            y = max_radius;
        } else if y < -outer {
            y = -max_radius;
        }

        Rod::new(x, y, rod.angle + da)
    }

    /// One sweep, visiting rods in a uniformly random permutation.
    ///
    /// Every rod is proposed exactly once. Step sizes adapt toward
    /// `target_acceptance` afterward.
    pub fn sweep(&mut self, cell: &mut AnnularCell, rng: &mut impl Rng) -> Result<SweepReport, McError> {
        let n = cell.rods().len();
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);

        let mut successes = 0u64;
        for i in order {
            let candidate = self.propose(cell, i, rng);
            if cell.is_internal_position_valid(i, candidate)? {
                successes += 1;
            }
        }

        let report = SweepReport {
            attempted: n as u64,
            successes,
            acceptance: successes as f64 / n as f64,
        };
        self.adapt(&report);
        Ok(report)
    }

    /// One sweep, visiting rods in box order rather than a single flat
    /// permutation: the grid's boxes are visited in a random order, and
    /// the rods within each box are visited in their stored order.
    ///
    /// Grounded in the original's `stepMontecarloNeighbourhood`: the
    /// contract (every rod proposed exactly once) is identical, only the
    /// visit order differs.
    pub fn sweep_by_box(
        &mut self,
        cell: &mut AnnularCell,
        rng: &mut impl Rng,
    ) -> Result<SweepReport, McError> {
        let n = cell.rods().len();
        let mut boxes: Vec<(usize, usize)> = cell.grid().box_coordinates().collect();
        boxes.shuffle(rng);

        let mut successes = 0u64;
        for (bx, by) in boxes {
            let members: Vec<usize> = cell.grid().box_contents(bx, by).to_vec();
            for i in members {
                let candidate = self.propose(cell, i, rng);
                if cell.is_internal_position_valid(i, candidate)? {
                    successes += 1;
                }
            }
        }

        let report = SweepReport {
            attempted: n as u64,
            successes,
            acceptance: successes as f64 / n as f64,
        };
        self.adapt(&report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rods_cell::fill;
    use rods_core::Parameters;

    fn filled_cell(n: usize, seed: u64) -> AnnularCell {
        let mut cell = AnnularCell::new(Parameters::with_defaults(1.0, 4.0, 20.0, 70.0, n, seed).unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        assert_eq!(fill::fill(&mut cell, &mut rng), 0);
        cell
    }

    #[test]
    fn sweep_visits_every_rod_exactly_once() {
        let mut cell = filled_cell(15, 11);
        let mut engine = McEngine::new(cell.params());
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let report = engine.sweep(&mut cell, &mut rng).unwrap();
        assert_eq!(report.attempted, 15);
        assert!(report.successes <= 15);
    }

    #[test]
    fn sweep_preserves_non_overlap() {
        let mut cell = filled_cell(15, 12);
        let mut engine = McEngine::new(cell.params());
        let mut rng = ChaCha8Rng::seed_from_u64(100);
        for _ in 0..20 {
            engine.sweep(&mut cell, &mut rng).unwrap();
        }
        let rods = cell.rods().to_vec();
        let rp = &cell.params().rod;
        for i in 0..rods.len() {
            assert!(cell.inside_walls(&rods[i]));
            for j in (i + 1)..rods.len() {
                assert!(!rods[i].overlaps(&rods[j], rp));
            }
        }
    }

    #[test]
    fn step_sizes_adapt_toward_target_acceptance() {
        let mut cell = filled_cell(10, 21);
        let mut engine = McEngine::new(cell.params());
        let initial_step = engine.step_translation();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..50 {
            engine.sweep(&mut cell, &mut rng).unwrap();
        }
        // Step sizes should have moved away from their initial seed value
        // after enough sweeps of adaptation.
        assert_ne!(engine.step_translation(), initial_step);
    }

    #[test]
    fn sweep_by_box_visits_every_rod_exactly_once() {
        let mut cell = filled_cell(15, 33);
        let mut engine = McEngine::new(cell.params());
        let mut rng = ChaCha8Rng::seed_from_u64(34);
        let report = engine.sweep_by_box(&mut cell, &mut rng).unwrap();
        assert_eq!(report.attempted, 15);
    }
}
