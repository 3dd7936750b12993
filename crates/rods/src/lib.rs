//! Rods: a 2D hard-rod Monte Carlo simulation of a confined annular liquid
//! crystal.
//!
//! This is the top-level facade crate that re-exports the public API from
//! every `rods-*` sub-crate. For most users, adding `rods` as a single
//! dependency is sufficient; the `rods` binary built from this crate drives
//! a simulation from the command line.
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `rods-core` | Rod geometry, parameter bundle, error types |
//! | [`space`] | `rods-space` | The box-grid spatial index |
//! | [`cell`] | `rods-cell` | The annular cell and initial-fill strategies |
//! | [`mc`] | `rods-mc` | The Metropolis sweep engine |
//! | [`analysis`] | `rods-analysis` | Local order parameters, clusters, defects |
//! | [`io`] | `rods-io` | Snapshot and analysis-output file formats |
//! | [`engine`] | `rods-engine` | Configuration loading and the simulation driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Rod geometry, parameter bundle, and error types (`rods-core`).
pub use rods_core as core;

/// The box-grid spatial index (`rods-space`).
pub use rods_space as space;

/// The annular cell and initial-fill strategies (`rods-cell`).
pub use rods_cell as cell;

/// The Metropolis sweep engine (`rods-mc`).
pub use rods_mc as mc;

/// Local order parameters, clusters, and defects (`rods-analysis`).
pub use rods_analysis as analysis;

/// Snapshot and analysis-output file formats (`rods-io`).
pub use rods_io as io;

/// Configuration loading and the simulation driver (`rods-engine`).
pub use rods_engine as engine;

/// Common imports for typical `rods` usage.
///
/// ```rust
/// use rods::prelude::*;
/// ```
pub mod prelude {
    pub use rods_core::{Parameters, PrimaryParameters, Rod, RodError};

    pub use rods_cell::{AnnularCell, CellError};

    pub use rods_mc::{McEngine, McError, SweepReport};

    pub use rods_analysis::{Component, LocalOrder};

    pub use rods_io::SnapshotError;

    pub use rods_engine::{ConfigError, EngineState, IterationReport, SimulationConfig, SimulationEngine};
}
