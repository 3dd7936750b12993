//! Error types for rod geometry and the shared parameter bundle.

use std::error::Error;
use std::fmt;

/// Errors raised while constructing a [`crate::Parameters`] bundle.
///
/// Rod geometric predicates themselves are total (see [`crate::Rod::overlaps`]);
/// the only fallible operation in this crate is validating the primary
/// parameters before deriving the rest of the bundle.
#[derive(Clone, Debug, PartialEq)]
pub enum RodError {
    /// Rod width must be strictly positive and not exceed length.
    InvalidDimensions {
        /// Rod width as given.
        width: f64,
        /// Rod length as given.
        length: f64,
    },
    /// An angle or position input was not finite (NaN or infinite).
    NonFinite {
        /// Name of the offending field, for diagnostics.
        field: &'static str,
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for RodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, length } => write!(
                f,
                "invalid rod dimensions: width={width} length={length} (require 0 < width <= length)"
            ),
            Self::NonFinite { field, value } => {
                write!(f, "non-finite value for {field}: {value}")
            }
        }
    }
}

impl Error for RodError {}
