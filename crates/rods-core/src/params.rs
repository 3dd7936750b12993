//! The immutable parameter bundle shared by every simulation component.
//!
//! Generalizes the original implementation's file-scope `extern const double`
//! constants into a single value constructed once and passed by shared
//! reference. Nothing here is process-global or mutable.

use crate::error::RodError;

/// Rod dimensions and the geometric quantities derived from them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RodParams {
    /// Rod width (short side).
    pub width: f64,
    /// Rod length (long side). Always `>= width`.
    pub length: f64,
    /// `width / 2`.
    pub half_width: f64,
    /// `length / 2`.
    pub half_length: f64,
    /// `sqrt(width^2 + length^2)`, the rectangle's diagonal.
    pub diagonal: f64,
    /// `diagonal / 2`.
    pub half_diagonal: f64,
    /// `atan2(width, length)`, the rectangle's interior diagonal angle.
    pub alpha: f64,
}

impl RodParams {
    fn new(width: f64, length: f64) -> Result<Self, RodError> {
        if !width.is_finite() || !length.is_finite() {
            let (field, value) = if !width.is_finite() {
                ("width", width)
            } else {
                ("length", length)
            };
            return Err(RodError::NonFinite { field, value });
        }
        if !(width > 0.0 && width <= length) {
            return Err(RodError::InvalidDimensions { width, length });
        }
        let diagonal = (width * width + length * length).sqrt();
        Ok(Self {
            width,
            length,
            half_width: 0.5 * width,
            half_length: 0.5 * length,
            diagonal,
            half_diagonal: 0.5 * diagonal,
            alpha: width.atan2(length),
        })
    }
}

/// Annular cell radii.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellParams {
    /// Inner radius of the annulus.
    pub inner_radius: f64,
    /// Outer radius of the annulus. Always `> inner_radius`.
    pub outer_radius: f64,
}

impl CellParams {
    fn new(inner_radius: f64, outer_radius: f64) -> Result<Self, RodError> {
        if !inner_radius.is_finite() || !outer_radius.is_finite() {
            let (field, value) = if !inner_radius.is_finite() {
                ("inner_radius", inner_radius)
            } else {
                ("outer_radius", outer_radius)
            };
            return Err(RodError::NonFinite { field, value });
        }
        if !(inner_radius > 0.0 && inner_radius < outer_radius) {
            return Err(RodError::InvalidDimensions {
                width: inner_radius,
                length: outer_radius,
            });
        }
        Ok(Self {
            inner_radius,
            outer_radius,
        })
    }
}

/// Grid tiling tunable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridParams {
    /// Number of boxes along one side of the bounding square, including the
    /// one-box empty frame. Odd, matching the original's parity requirement
    /// so a central box exists.
    pub boxes_per_side: usize,
}

/// Metropolis sweep tuning and schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct McParams {
    /// Current half-width of the uniform position proposal, in each of x and y.
    pub step_translation: f64,
    /// Current half-width of the uniform angle proposal.
    pub step_angle: f64,
    /// Target per-sweep acceptance ratio the step sizes adapt toward.
    pub target_acceptance: f64,
    /// Number of sweeps discarded during thermalization.
    pub thermal_sweeps: u64,
    /// Number of sweeps per reported iteration during simulation.
    pub sweeps_per_iteration: u64,
    /// Number of reported iterations.
    pub iterations: u64,
}

/// Order-parameter and cluster/defect extraction thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalysisParams {
    /// Squared averaging radius `r_avg^2` for local order parameters.
    pub averaging_radius_sq: f64,
    /// Expected inverse smectic layer spacing, `1/lambda`.
    pub inverse_layer_spacing: f64,
    /// Maximum center distance for two rods to share a cluster link.
    pub cluster_max_dist: f64,
    /// Maximum reduced orientation difference for a cluster link.
    pub cluster_max_angle: f64,
    /// Minimum component size retained as a cluster.
    pub cluster_min_size: usize,
    /// Maximum center distance for two rods to share a defect link.
    pub defect_max_dist: f64,
    /// Tetratic order parameter ceiling below which a rod is "low order".
    pub defect_q4_ceiling: f64,
    /// Minimum component size retained as a defect.
    pub defect_min_size: usize,
}

/// The full, immutable set of simulation constants.
///
/// Constructed once (typically by `rods-engine::config`) and shared by
/// reference with every component that needs it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parameters {
    /// Rod geometry.
    pub rod: RodParams,
    /// Annular cell geometry.
    pub cell: CellParams,
    /// Grid tiling tunable.
    pub grid: GridParams,
    /// Monte Carlo schedule and step sizes.
    pub mc: McParams,
    /// Order-parameter and cluster/defect thresholds.
    pub analysis: AnalysisParams,
    /// Number of rods in the ensemble.
    pub num_rods: usize,
    /// RNG seed.
    pub seed: u64,
}

/// Primary, user-facing inputs from which a [`Parameters`] bundle is derived.
///
/// Mirrors the "PRIMARY PARAMETERS" / "AUXILIARY PARAMETERS" split of the
/// original `parameters.cpp`: callers supply these, everything else is
/// computed once in [`Parameters::new`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimaryParameters {
    /// Rod width.
    pub width: f64,
    /// Rod length.
    pub length: f64,
    /// Annular cell inner radius.
    pub inner_radius: f64,
    /// Annular cell outer radius.
    pub outer_radius: f64,
    /// Number of rods.
    pub num_rods: usize,
    /// RNG seed.
    pub seed: u64,
    /// Initial position proposal half-width.
    pub step_translation: f64,
    /// Initial angle proposal half-width.
    pub step_angle: f64,
    /// Target acceptance ratio.
    pub target_acceptance: f64,
    /// Thermalization sweep count.
    pub thermal_sweeps: u64,
    /// Sweeps per reported simulation iteration.
    pub sweeps_per_iteration: u64,
    /// Reported simulation iteration count.
    pub iterations: u64,
    /// Grid boxes per side (must be odd).
    pub boxes_per_side: usize,
    /// Averaging radius for local order parameters.
    pub averaging_radius: f64,
    /// Expected smectic layer spacing `lambda`.
    pub layer_spacing: f64,
    /// Cluster-link max center distance.
    pub cluster_max_dist: f64,
    /// Cluster-link max reduced orientation difference.
    pub cluster_max_angle: f64,
    /// Minimum cluster size retained.
    pub cluster_min_size: usize,
    /// Defect-link max center distance.
    pub defect_max_dist: f64,
    /// Tetratic order ceiling for the "low order" subset.
    pub defect_q4_ceiling: f64,
    /// Minimum defect size retained.
    pub defect_min_size: usize,
}

impl Parameters {
    /// Build the derived parameter bundle from the primary, user-facing inputs.
    ///
    /// Validates only rod- and cell-local geometric invariants (positivity,
    /// finiteness, `width <= length`, `inner_radius < outer_radius`).
    /// System-level feasibility (does `num_rods` actually fit, does
    /// `outer_radius` leave room for a full-length rod clear of the inner
    /// wall) is a configuration-level concern checked by
    /// `rods-engine::config::SimulationConfig`, which has the full picture
    /// needed to report `ConfigError::Infeasible` with a precise reason.
    pub fn new(primary: PrimaryParameters) -> Result<Self, RodError> {
        let rod = RodParams::new(primary.width, primary.length)?;
        let cell = CellParams::new(primary.inner_radius, primary.outer_radius)?;
        Ok(Self {
            rod,
            cell,
            grid: GridParams {
                boxes_per_side: primary.boxes_per_side,
            },
            mc: McParams {
                step_translation: primary.step_translation,
                step_angle: primary.step_angle,
                target_acceptance: primary.target_acceptance,
                thermal_sweeps: primary.thermal_sweeps,
                sweeps_per_iteration: primary.sweeps_per_iteration,
                iterations: primary.iterations,
            },
            analysis: AnalysisParams {
                averaging_radius_sq: primary.averaging_radius * primary.averaging_radius,
                inverse_layer_spacing: 1.0 / primary.layer_spacing,
                cluster_max_dist: primary.cluster_max_dist,
                cluster_max_angle: primary.cluster_max_angle,
                cluster_min_size: primary.cluster_min_size,
                defect_max_dist: primary.defect_max_dist,
                defect_q4_ceiling: primary.defect_q4_ceiling,
                defect_min_size: primary.defect_min_size,
            },
            num_rods: primary.num_rods,
            seed: primary.seed,
        })
    }

    /// Convenience constructor matching the original's default tunables,
    /// used by tests and by `rods-engine::config` as the base that a
    /// loaded TOML file overrides.
    pub fn with_defaults(
        width: f64,
        length: f64,
        inner_radius: f64,
        outer_radius: f64,
        num_rods: usize,
        seed: u64,
    ) -> Result<Self, RodError> {
        use std::f64::consts::PI;
        Self::new(PrimaryParameters {
            width,
            length,
            inner_radius,
            outer_radius,
            num_rods,
            seed,
            step_translation: 0.01 * width,
            step_angle: 0.01 * PI,
            target_acceptance: 0.5,
            thermal_sweeps: 1_000_000,
            sweeps_per_iteration: 10_000,
            iterations: 24,
            boxes_per_side: 35,
            averaging_radius: 4.0 * length,
            layer_spacing: 1.01 * length,
            cluster_max_dist: 1.8 * width,
            cluster_max_angle: PI / 18.0,
            cluster_min_size: 2,
            defect_max_dist: 2.0 * (width * width + length * length).sqrt(),
            defect_q4_ceiling: 0.4,
            defect_min_size: 5,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_width_greater_than_length() {
        let err = RodParams::new(4.0, 1.0).unwrap_err();
        assert!(matches!(err, RodError::InvalidDimensions { .. }));
    }

    #[test]
    fn rejects_non_positive_width() {
        assert!(RodParams::new(0.0, 1.0).is_err());
        assert!(RodParams::new(-1.0, 1.0).is_err());
    }

    #[test]
    fn rejects_degenerate_cell() {
        assert!(CellParams::new(20.0, 20.0).is_err());
        assert!(CellParams::new(20.0, 10.0).is_err());
    }

    #[test]
    fn derives_diagonal_and_alpha() {
        let rod = RodParams::new(1.0, 4.0).unwrap();
        assert!((rod.diagonal - (17.0f64).sqrt()).abs() < 1e-12);
        assert!((rod.alpha - (1.0f64).atan2(4.0)).abs() < 1e-12);
    }

    #[test]
    fn with_defaults_matches_reference_constants() {
        let params = Parameters::with_defaults(1.0, 4.0, 20.0, 70.0, 2983, 42).unwrap();
        assert_eq!(params.num_rods, 2983);
        assert!((params.rod.diagonal - (17.0f64).sqrt()).abs() < 1e-12);
        assert!((params.analysis.averaging_radius_sq - 16.0 * 16.0).abs() < 1e-9);
    }
}
