//! Error type for snapshot and analysis-output file I/O.

use std::error::Error;
use std::fmt;
use std::io;

/// Errors from reading or writing a snapshot file.
#[derive(Debug)]
pub enum SnapshotError {
    /// The file could not be opened, read, or written.
    Io(io::Error),
    /// A data line could not be parsed into the expected number of fields.
    MalformedLine {
        /// One-based line number within the file.
        line: usize,
        /// The offending line's content.
        content: String,
    },
    /// The file held fewer rods than the caller required.
    TooFewRods {
        /// Rods actually read.
        found: usize,
        /// Rods required.
        expected: usize,
    },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "snapshot I/O error: {e}"),
            Self::MalformedLine { line, content } => {
                write!(f, "malformed snapshot line {line}: {content:?}")
            }
            Self::TooFewRods { found, expected } => {
                write!(f, "snapshot held {found} rods, expected at least {expected}")
            }
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
