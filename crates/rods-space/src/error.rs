//! Error type for the box-grid spatial index.

use std::error::Error;
use std::fmt;

/// Errors from the [`crate::Grid`] spatial index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridError {
    /// [`crate::Grid::relocate`] could not find the moving index in its
    /// expected source box. The grid's invariant (every live index appears
    /// in exactly the box containing its center) has been broken by the
    /// caller; this is a fatal bug, not a recoverable condition.
    IndexNotFound {
        /// The index that could not be located.
        index: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexNotFound { index } => {
                write!(f, "rod #{index} not found in its expected grid box")
            }
        }
    }
}

impl Error for GridError {}
