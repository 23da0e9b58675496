//! Dense vector and matrix containers.
//!
//! These are the numeric workhorses of the trainer: a growable 1-D vector
//! with a doubling capacity policy and a row-major 2-D matrix with the
//! arithmetic, transpose, and Gaussian-elimination inversion the regression
//! engine relies on. Everything is `f64`; shape errors surface as
//! [`LinalgError`] rather than panics.

use std::fmt;

pub mod matrix;
pub mod vector;

pub use matrix::Matrix;
pub use vector::Vector;

/// Error type for vector and matrix operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinalgError {
    /// Operand shapes are incompatible for the requested operation.
    DimensionMismatch { expected: String, got: String },
    /// Index outside the valid range of the container.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for LinalgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinalgError::DimensionMismatch { expected, got } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, got)
            }
            LinalgError::IndexOutOfRange { index, len } => {
                write!(f, "Index out of range: {} (length {})", index, len)
            }
        }
    }
}

impl std::error::Error for LinalgError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_dimension_mismatch() {
        let err = LinalgError::DimensionMismatch {
            expected: "3x2".to_string(),
            got: "2x3".to_string(),
        };
        assert!(err.to_string().contains("Dimension mismatch"));
    }

    #[test]
    fn test_error_display_index_out_of_range() {
        let err = LinalgError::IndexOutOfRange { index: 7, len: 3 };
        assert!(err.to_string().contains("Index out of range"));
    }

    #[test]
    fn test_error_is_std_error() {
        let err = LinalgError::IndexOutOfRange { index: 0, len: 0 };
        let _: &dyn std::error::Error = &err;
    }
}
