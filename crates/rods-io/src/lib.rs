//! CSV-like file formats for rod configurations and analysis output.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod analysis_output;
pub mod error;
pub mod snapshot;

pub use analysis_output::save_analysis_output;
pub use error::SnapshotError;
pub use snapshot::{load_legacy_snapshot, load_snapshot, save_snapshot};
