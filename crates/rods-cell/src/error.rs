//! Error type for the annular cell's rod ensemble.

use std::error::Error;
use std::fmt;

use rods_space::GridError;

/// Errors from [`crate::AnnularCell`].
///
/// Both variants indicate a broken invariant rather than a recoverable
/// condition: a committed rod is expected to always be inside the walls and
/// always be found in its grid box. Fill shortfalls are not modeled as
/// errors — they are reported as a count, per the core/engine split in
/// the ambient error-handling policy.
#[derive(Clone, Debug, PartialEq)]
pub enum CellError {
    /// The grid's `relocate` could not find a committed rod's index.
    GridInvariantBroken(GridError),
    /// A rod that was supposed to have been committed as valid is outside
    /// the annular walls.
    RodOutsideWalls {
        /// The offending rod's index.
        index: usize,
    },
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridInvariantBroken(e) => write!(f, "grid invariant broken: {e}"),
            Self::RodOutsideWalls { index } => {
                write!(f, "rod #{index} is outside the annular walls")
            }
        }
    }
}

impl Error for CellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::GridInvariantBroken(e) => Some(e),
            Self::RodOutsideWalls { .. } => None,
        }
    }
}

impl From<GridError> for CellError {
    fn from(e: GridError) -> Self {
        Self::GridInvariantBroken(e)
    }
}
