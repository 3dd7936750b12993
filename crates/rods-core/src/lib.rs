//! Core rod geometry and the shared parameter bundle for the annular-cell
//! rod simulation.
//!
//! This is the leaf crate with zero internal dependencies on the rest of
//! the workspace. It defines the [`Rod`] type and its hard-core overlap
//! predicate, the [`Parameters`] bundle every other crate is built around,
//! and the geometry-level error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod params;
pub mod rod;

pub use error::RodError;
pub use params::{AnalysisParams, CellParams, GridParams, McParams, Parameters, PrimaryParameters, RodParams};
pub use rod::Rod;
