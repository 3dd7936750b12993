//! The annular cell: ownership of the rod ensemble and its spatial index,
//! wall predicates, and initial-configuration filling strategies.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod fill;

pub use cell::AnnularCell;
pub use error::CellError;
