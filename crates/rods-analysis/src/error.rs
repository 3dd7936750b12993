//! Error type for order-parameter and cluster/defect analysis.

use std::error::Error;
use std::fmt;

/// Errors from the analysis routines.
#[derive(Clone, Debug, PartialEq)]
pub enum AnalysisError {
    /// The rod slice and the requested index count disagree, so per-rod
    /// outputs cannot be matched back to rod indices.
    LengthMismatch {
        /// Number of rods supplied.
        rods: usize,
        /// Number of entries expected (e.g. a `q4` vector passed separately).
        expected: usize,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { rods, expected } => write!(
                f,
                "rod count {rods} does not match expected entry count {expected}"
            ),
        }
    }
}

impl Error for AnalysisError {}
