//! Uniform box-grid spatial index over the annular cell's bounding square.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;

pub use error::GridError;
pub use grid::Grid;
