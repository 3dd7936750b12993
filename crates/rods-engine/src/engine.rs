//! The simulation driver: fill, thermalize, simulate, and snapshot output,
//! wired together and instrumented with tracing spans.
//!
//! Grounded in the original's `main.cpp` driving loop: fill the cell,
//! discard a thermalization run, then alternate sweeps and reporting for a
//! fixed number of iterations.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rods_analysis::{cluster, order, Component, LocalOrder};
use rods_cell::{fill, AnnularCell};
use rods_core::Parameters;
use rods_mc::{McEngine, SweepReport};

use crate::error::ConfigError;

/// Where the driver is in its fill / thermalize / simulate lifecycle.
///
/// Purely informational: every method can be called in any order, but
/// calling [`SimulationEngine::simulate`] before [`SimulationEngine::fill`]
/// runs against an ensemble still sitting at the sentinel pose, which is
/// harmless but pointless. Callers that care can check [`Self::state`]
/// first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EngineState {
    /// No fill strategy has run yet; every rod sits at the sentinel pose.
    Uninitialized,
    /// A fill strategy has run. `missing` is its leftover unplaced count.
    Filled {
        /// Rods still at the sentinel pose after filling.
        missing: usize,
    },
    /// Thermalization sweeps have completed.
    Thermalized,
    /// Simulation iterations are in progress or have completed, at
    /// `iteration` (zero-based, the last one started).
    Running {
        /// Most recently started iteration.
        iteration: u64,
    },
}

/// The report for one simulation iteration: the final sweep of that
/// iteration's acceptance statistics, plus the local order parameters
/// computed on the ensemble at the end of the iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationReport {
    /// Zero-based iteration index.
    pub iteration: u64,
    /// The last sweep's acceptance report (step sizes have already adapted
    /// through every sweep in the iteration by this point).
    pub sweep_report: SweepReport,
    /// Per-rod local order parameters at the end of the iteration.
    pub orders: Vec<LocalOrder>,
}

/// Orchestrates an [`AnnularCell`] and [`McEngine`] through a full run.
pub struct SimulationEngine {
    params: Parameters,
    cell: AnnularCell,
    mc: McEngine,
    rng: ChaCha8Rng,
    state: EngineState,
}

impl SimulationEngine {
    /// Build a fresh engine: an empty cell (every rod at the sentinel
    /// pose) and an RNG seeded from `params.seed`.
    pub fn new(params: Parameters) -> Self {
        let cell = AnnularCell::new(params);
        let mc = McEngine::new(&params);
        let rng = ChaCha8Rng::seed_from_u64(params.seed);
        Self {
            params,
            cell,
            mc,
            rng,
            state: EngineState::Uninitialized,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The shared parameter bundle.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// The annular cell, for read-only inspection (snapshotting, tests).
    pub fn cell(&self) -> &AnnularCell {
        &self.cell
    }

    /// The annular cell, mutably — intended for `rods_io::load_snapshot`
    /// and similar callers that replace the ensemble in place. Callers
    /// that do so should follow up with [`Self::note_loaded`] to keep
    /// [`Self::state`] consistent.
    pub fn cell_mut(&mut self) -> &mut AnnularCell {
        &mut self.cell
    }

    /// Record that the cell's ensemble was just replaced out-of-band
    /// (e.g. by `rods_io::load_snapshot` via [`Self::cell_mut`]),
    /// advancing the state to [`EngineState::Filled`].
    pub fn note_loaded(&mut self) {
        self.state = EngineState::Filled {
            missing: self.cell.missing().len(),
        };
    }

    /// Fill the cell with the ring-packing strategy, falling back to
    /// random rejection for any rods it could not place.
    ///
    /// Returns the number of rods still unplaced. Logs a warning if any
    /// remain; the caller decides whether that is acceptable.
    #[tracing::instrument(skip(self))]
    pub fn fill(&mut self) -> usize {
        let missing = fill::fill_ring_packing(&mut self.cell, &mut self.rng);
        if missing > 0 {
            tracing::warn!(missing, num_rods = self.params.num_rods, "fill left rods unplaced");
        } else {
            tracing::info!(num_rods = self.params.num_rods, "fill placed every rod");
        }
        self.state = EngineState::Filled { missing };
        missing
    }

    /// Run `params.mc.thermal_sweeps` sweeps and discard their reports.
    ///
    /// Aborts on the first sweep that breaks the cell's invariant.
    pub fn thermalize(&mut self) -> Result<(), ConfigError> {
        let span = tracing::info_span!("thermalize", sweeps = self.params.mc.thermal_sweeps);
        let _enter = span.enter();

        for sweep in 0..self.params.mc.thermal_sweeps {
            let report = self.mc.sweep(&mut self.cell, &mut self.rng)?;
            if sweep % 10_000 == 0 {
                tracing::debug!(sweep, acceptance = report.acceptance, "thermalization progress");
            }
        }

        tracing::info!(
            step_translation = self.mc.step_translation(),
            step_angle = self.mc.step_angle(),
            "thermalization complete"
        );
        self.state = EngineState::Thermalized;
        Ok(())
    }

    /// Run `params.mc.iterations` reported iterations, each
    /// `params.mc.sweeps_per_iteration` sweeps, returning one
    /// [`IterationReport`] per iteration.
    ///
    /// Aborts on the first sweep that breaks the cell's invariant; any
    /// iterations already completed are still returned via the error's
    /// absence of partial results is intentional — callers that want
    /// partial output should snapshot after each iteration themselves via
    /// [`Self::cell`].
    pub fn simulate(&mut self) -> Result<Vec<IterationReport>, ConfigError> {
        let mut reports = Vec::with_capacity(self.params.mc.iterations as usize);

        for iteration in 0..self.params.mc.iterations {
            self.state = EngineState::Running { iteration };
            let span = tracing::info_span!("iteration", iteration);
            let _enter = span.enter();

            let mut last = SweepReport {
                attempted: 0,
                successes: 0,
                acceptance: 0.0,
            };
            for _ in 0..self.params.mc.sweeps_per_iteration {
                last = self.mc.sweep(&mut self.cell, &mut self.rng)?;
            }

            let orders = order::local_order_parameters_with_grid(
                self.cell.rods(),
                self.cell.grid(),
                &self.params.analysis,
            );
            tracing::info!(
                iteration,
                acceptance = last.acceptance,
                mean_q2 = orders.iter().map(|o| o.q2).sum::<f64>() / orders.len() as f64,
                "iteration complete"
            );

            reports.push(IterationReport {
                iteration,
                sweep_report: last,
                orders,
            });
        }

        Ok(reports)
    }

    /// Local order parameters for the cell's current configuration.
    pub fn order_parameters(&self) -> Vec<LocalOrder> {
        order::local_order_parameters_with_grid(self.cell.rods(), self.cell.grid(), &self.params.analysis)
    }

    /// Clusters surviving `analysis.cluster_min_size`, given this
    /// configuration's local order parameters.
    pub fn clusters(&self) -> Vec<Component> {
        let links = cluster::cluster_links(self.cell.rods(), self.cell.grid(), &self.params.analysis);
        let mut trees = cluster::group_links(&links);
        cluster::erase_small_components(&mut trees, self.params.analysis.cluster_min_size);
        cluster::components(&trees, self.cell.rods())
    }

    /// Defects surviving `analysis.defect_min_size`, given precomputed
    /// per-rod tetratic order parameters (from [`Self::order_parameters`]).
    ///
    /// Errors if `orders` does not hold one entry per rod in the cell.
    pub fn defects(&self, orders: &[LocalOrder]) -> Result<Vec<Component>, ConfigError> {
        let q4: Vec<f64> = orders.iter().map(|o| o.q4).collect();
        let links = cluster::defect_links(self.cell.rods(), &q4, &self.params.analysis)?;
        let mut trees = cluster::group_links(&links);
        cluster::erase_small_components(&mut trees, self.params.analysis.defect_min_size);
        Ok(cluster::components(&trees, self.cell.rods()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> Parameters {
        Parameters::with_defaults(1.0, 4.0, 20.0, 70.0, 20, 3).unwrap()
    }

    #[test]
    fn fill_transitions_to_filled_state() {
        let mut engine = SimulationEngine::new(small_params());
        assert_eq!(engine.state(), EngineState::Uninitialized);
        let missing = engine.fill();
        assert_eq!(missing, 0);
        assert_eq!(engine.state(), EngineState::Filled { missing: 0 });
    }

    #[test]
    fn thermalize_preserves_the_ensemble_invariant() {
        let mut params = small_params();
        params.mc.thermal_sweeps = 5;
        let mut engine = SimulationEngine::new(params);
        engine.fill();
        engine.thermalize().unwrap();
        assert_eq!(engine.state(), EngineState::Thermalized);
        let rods = engine.cell().rods().to_vec();
        let rp = &engine.params().rod;
        for i in 0..rods.len() {
            assert!(engine.cell().inside_walls(&rods[i]));
            for j in (i + 1)..rods.len() {
                assert!(!rods[i].overlaps(&rods[j], rp));
            }
        }
    }

    #[test]
    fn simulate_reports_one_entry_per_iteration() {
        let mut params = small_params();
        params.mc.thermal_sweeps = 0;
        params.mc.sweeps_per_iteration = 2;
        params.mc.iterations = 3;
        let mut engine = SimulationEngine::new(params);
        engine.fill();
        let reports = engine.simulate().unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[2].iteration, 2);
        assert_eq!(reports[0].orders.len(), 20);
    }

    #[test]
    fn clusters_and_defects_do_not_panic_on_a_filled_cell() {
        let mut engine = SimulationEngine::new(small_params());
        engine.fill();
        let orders = engine.order_parameters();
        let _ = engine.clusters();
        engine.defects(&orders).unwrap();
    }
}
