//! Local order-parameter computation and cluster/defect extraction over a
//! frozen rod configuration.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod order;

pub use cluster::{
    cluster_links, components, defect_links, erase_small_components, group_links, Component, Link,
};
pub use error::AnalysisError;
pub use order::{
    local_order_parameters, local_order_parameters_with_grid, regions_grid, regions_pairwise,
    LocalOrder,
};
