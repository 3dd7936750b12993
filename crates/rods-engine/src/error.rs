//! Error type for configuration loading and the simulation driver.

use std::error::Error;
use std::fmt;
use std::io;

use rods_analysis::AnalysisError;
use rods_core::RodError;
use rods_io::SnapshotError;
use rods_mc::McError;

/// Errors from loading a configuration or running the driver.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(io::Error),
    /// The configuration file's TOML could not be parsed.
    Parse(toml::de::Error),
    /// A rod- or cell-local geometric invariant was violated.
    InvalidParameters(RodError),
    /// The primary parameters are locally valid but do not describe a
    /// feasible system (the rods cannot all fit, or the geometry leaves no
    /// room for a rod clear of both walls).
    Infeasible {
        /// Human-readable explanation of which feasibility check failed.
        reason: String,
    },
    /// A snapshot failed to load or save.
    Snapshot(SnapshotError),
    /// A sweep aborted because an internal invariant broke.
    Sweep(McError),
    /// A per-rod analysis input (e.g. a `q4` vector) did not match the
    /// rod count it was indexed against.
    Analysis(AnalysisError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "could not read configuration file: {e}"),
            Self::Parse(e) => write!(f, "could not parse configuration: {e}"),
            Self::InvalidParameters(e) => write!(f, "invalid parameters: {e}"),
            Self::Infeasible { reason } => write!(f, "infeasible configuration: {reason}"),
            Self::Snapshot(e) => write!(f, "snapshot error: {e}"),
            Self::Sweep(e) => write!(f, "{e}"),
            Self::Analysis(e) => write!(f, "analysis error: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::InvalidParameters(e) => Some(e),
            Self::Infeasible { .. } => None,
            Self::Snapshot(e) => Some(e),
            Self::Sweep(e) => Some(e),
            Self::Analysis(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<RodError> for ConfigError {
    fn from(e: RodError) -> Self {
        Self::InvalidParameters(e)
    }
}

impl From<SnapshotError> for ConfigError {
    fn from(e: SnapshotError) -> Self {
        Self::Snapshot(e)
    }
}

impl From<McError> for ConfigError {
    fn from(e: McError) -> Self {
        Self::Sweep(e)
    }
}

impl From<AnalysisError> for ConfigError {
    fn from(e: AnalysisError) -> Self {
        Self::Analysis(e)
    }
}
