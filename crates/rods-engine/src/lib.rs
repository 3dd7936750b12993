//! Configuration loading and the simulation driver: the orchestration
//! layer tying `rods-core`, `rods-space`, `rods-cell`, `rods-mc`,
//! `rods-analysis`, and `rods-io` together into a runnable simulation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;

pub use config::SimulationConfig;
pub use engine::{EngineState, IterationReport, SimulationEngine};
pub use error::ConfigError;
