//! TOML-backed simulation configuration.
//!
//! Mirrors the original's "PRIMARY PARAMETERS" / "AUXILIARY PARAMETERS"
//! split (`parameters.cpp`, `GlobalParameters.hpp`): a configuration file
//! supplies the primary, user-facing values; everything derived is
//! computed once by [`rods_core::Parameters::new`]. System-level
//! feasibility (does the packing fraction fit, does the geometry leave
//! room for a rod clear of both walls, is the grid box large enough for
//! the rod diagonal) is checked here, where the full parameter picture is
//! available, rather than in `rods-core`.

use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use rods_core::{Parameters, PrimaryParameters};

use crate::error::ConfigError;

/// The TOML-deserializable shape of a configuration file.
///
/// Every field mirrors a [`PrimaryParameters`] field; `#[serde(default)]`
/// tunables fall back to the original's documented defaults (see
/// [`Parameters::with_defaults`]) when the file omits them.
#[derive(Clone, Debug, Deserialize)]
pub struct SimulationConfig {
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
    #[serde(default)]
    pub step_translation: Option<f64>,
    /// Initial angle proposal half-width.
    #[serde(default)]
    pub step_angle: Option<f64>,
    /// Target acceptance ratio.
    #[serde(default)]
    pub target_acceptance: Option<f64>,
    /// Thermalization sweep count.
    #[serde(default)]
    pub thermal_sweeps: Option<u64>,
    /// Sweeps per reported simulation iteration.
    #[serde(default)]
    pub sweeps_per_iteration: Option<u64>,
    /// Reported simulation iteration count.
    #[serde(default)]
    pub iterations: Option<u64>,
    /// Grid boxes per side (must be odd).
    #[serde(default)]
    pub boxes_per_side: Option<usize>,
    /// Averaging radius for local order parameters.
    #[serde(default)]
    pub averaging_radius: Option<f64>,
    /// Expected smectic layer spacing `lambda`.
    #[serde(default)]
    pub layer_spacing: Option<f64>,
    /// Cluster-link max center distance.
    #[serde(default)]
    pub cluster_max_dist: Option<f64>,
    /// Cluster-link max reduced orientation difference.
    #[serde(default)]
    pub cluster_max_angle: Option<f64>,
    /// Minimum cluster size retained.
    #[serde(default)]
    pub cluster_min_size: Option<usize>,
    /// Defect-link max center distance.
    #[serde(default)]
    pub defect_max_dist: Option<f64>,
    /// Tetratic order ceiling for the "low order" subset.
    #[serde(default)]
    pub defect_q4_ceiling: Option<f64>,
    /// Minimum defect size retained.
    #[serde(default)]
    pub defect_min_size: Option<usize>,
}

impl SimulationConfig {
    /// Load and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Fill in any tunables the file omitted with the original's documented
    /// defaults (same values as [`Parameters::with_defaults`]). Geometric
    /// validity of `width`/`length`/the radii is not checked here; it is
    /// checked once, authoritatively, by [`Parameters::new`] in
    /// [`Self::into_parameters`].
    fn primary_parameters(&self) -> PrimaryParameters {
        PrimaryParameters {
            width: self.width,
            length: self.length,
            inner_radius: self.inner_radius,
            outer_radius: self.outer_radius,
            num_rods: self.num_rods,
            seed: self.seed,
            step_translation: self.step_translation.unwrap_or(0.01 * self.width),
            step_angle: self.step_angle.unwrap_or(0.01 * PI),
            target_acceptance: self.target_acceptance.unwrap_or(0.5),
            thermal_sweeps: self.thermal_sweeps.unwrap_or(1_000_000),
            sweeps_per_iteration: self.sweeps_per_iteration.unwrap_or(10_000),
            iterations: self.iterations.unwrap_or(24),
            boxes_per_side: self.boxes_per_side.unwrap_or(35),
            averaging_radius: self.averaging_radius.unwrap_or(4.0 * self.length),
            layer_spacing: self.layer_spacing.unwrap_or(1.01 * self.length),
            cluster_max_dist: self.cluster_max_dist.unwrap_or(1.8 * self.width),
            cluster_max_angle: self.cluster_max_angle.unwrap_or(PI / 18.0),
            cluster_min_size: self.cluster_min_size.unwrap_or(2),
            defect_max_dist: self
                .defect_max_dist
                .unwrap_or(2.0 * (self.width * self.width + self.length * self.length).sqrt()),
            defect_q4_ceiling: self.defect_q4_ceiling.unwrap_or(0.4),
            defect_min_size: self.defect_min_size.unwrap_or(5),
        }
    }

    /// Build a validated [`Parameters`] bundle, checking both the local
    /// geometric invariants ([`Parameters::new`]) and the system-level
    /// feasibility checks the original encodes as `static_assert`s in
    /// `GlobalParameters.hpp`.
    pub fn into_parameters(self) -> Result<Parameters, ConfigError> {
        let primary = self.primary_parameters();
        let params = Parameters::new(primary)?;

        let rod = &params.rod;
        let cell = &params.cell;

        let space_requirement = cell.outer_radius * cell.outer_radius
            > (cell.inner_radius + rod.width) * (cell.inner_radius + rod.width)
                + 0.25 * rod.length * rod.length;
        if !space_requirement {
            return Err(ConfigError::Infeasible {
                reason: format!(
                    "outer_radius^2 ({:.6}) must exceed (inner_radius + width)^2 + length^2/4 ({:.6})",
                    cell.outer_radius * cell.outer_radius,
                    (cell.inner_radius + rod.width) * (cell.inner_radius + rod.width)
                        + 0.25 * rod.length * rod.length
                ),
            });
        }

        let annulus_area = PI * (cell.outer_radius * cell.outer_radius - cell.inner_radius * cell.inner_radius);
        let packed_area = params.num_rods as f64 * rod.width * rod.length;
        if !(packed_area < annulus_area) {
            return Err(ConfigError::Infeasible {
                reason: format!(
                    "num_rods*width*length ({packed_area:.6}) must be less than the annulus area ({annulus_area:.6})"
                ),
            });
        }

        let box_side = 2.0 * cell.outer_radius / (params.grid.boxes_per_side as f64 - 2.0);
        if box_side < rod.diagonal {
            return Err(ConfigError::Infeasible {
                reason: format!(
                    "grid box side ({box_side:.6}) must be at least the rod diagonal ({:.6}); increase outer_radius or reduce boxes_per_side",
                    rod.diagonal
                ),
            });
        }
        if params.grid.boxes_per_side % 2 == 0 {
            return Err(ConfigError::Infeasible {
                reason: "boxes_per_side must be odd".to_string(),
            });
        }

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SimulationConfig {
        SimulationConfig {
            width: 1.0,
            length: 4.0,
            inner_radius: 20.0,
            outer_radius: 70.0,
            num_rods: 2983,
            seed: 42,
            step_translation: None,
            step_angle: None,
            target_acceptance: None,
            thermal_sweeps: None,
            sweeps_per_iteration: None,
            iterations: None,
            boxes_per_side: None,
            averaging_radius: None,
            layer_spacing: None,
            cluster_max_dist: None,
            cluster_max_angle: None,
            cluster_min_size: None,
            defect_max_dist: None,
            defect_q4_ceiling: None,
            defect_min_size: None,
        }
    }

    #[test]
    fn reference_configuration_is_feasible() {
        let params = base_config().into_parameters().unwrap();
        assert_eq!(params.num_rods, 2983);
    }

    #[test]
    fn overpacked_configuration_is_infeasible() {
        let mut cfg = base_config();
        cfg.num_rods = 1_000_000;
        let err = cfg.into_parameters().unwrap_err();
        assert!(matches!(err, ConfigError::Infeasible { .. }));
    }

    #[test]
    fn too_small_outer_radius_is_infeasible() {
        let mut cfg = base_config();
        cfg.outer_radius = 21.0;
        cfg.num_rods = 2;
        let err = cfg.into_parameters().unwrap_err();
        assert!(matches!(err, ConfigError::Infeasible { .. }));
    }

    #[test]
    fn parses_a_minimal_toml_document() {
        let toml_text = r#"
            width = 1.0
            length = 4.0
            inner_radius = 20.0
            outer_radius = 70.0
            num_rods = 100
            seed = 7
        "#;
        let cfg: SimulationConfig = toml::from_str(toml_text).unwrap();
        let params = cfg.into_parameters().unwrap();
        assert_eq!(params.num_rods, 100);
        assert_eq!(params.mc.iterations, 24);
    }
}
