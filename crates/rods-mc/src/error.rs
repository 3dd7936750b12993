//! Error type for the Metropolis sweep engine.

use std::error::Error;
use std::fmt;

use rods_cell::CellError;

/// Errors from a Metropolis sweep.
///
/// The only failure mode is the annular cell's own invariant breaking
/// mid-sweep (see [`rods_cell::CellError`]); rejected proposals are the
/// normal path and are not errors.
#[derive(Clone, Debug, PartialEq)]
pub enum McError {
    /// A rod commit during the sweep broke the cell's invariant.
    Cell(CellError),
}

impl fmt::Display for McError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell(e) => write!(f, "sweep aborted: {e}"),
        }
    }
}

impl Error for McError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Cell(e) => Some(e),
        }
    }
}

impl From<CellError> for McError {
    fn from(e: CellError) -> Self {
        Self::Cell(e)
    }
}
