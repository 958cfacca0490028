/// Errors raised by the numeric kernels.
///
/// Singular inversions are fatal to the call that hit them: nothing is
/// written as a best-effort inverse and nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MathError {
    #[error("Singular matrix: |determinant| {determinant:e} is below {threshold:e}")]
    SingularDeterminant { determinant: f32, threshold: f32 },

    #[error("Singular matrix: zero pivot in column {column}")]
    ZeroPivot { column: usize },

    #[error("Dimension mismatch: expected {expected} elements, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Degenerate axis {axis}: linear column has zero length")]
    DegenerateAxis { axis: usize },
}

impl MathError {
    /// Whether this error reports a non-invertible matrix.
    pub fn is_singular(&self) -> bool {
        matches!(
            self,
            MathError::SingularDeterminant { .. } | MathError::ZeroPivot { .. }
        )
    }
}

/// Fail fast unless `actual == expected`.
pub(crate) fn check_len(expected: usize, actual: usize) -> Result<(), MathError> {
    if expected == actual {
        Ok(())
    } else {
        Err(MathError::DimensionMismatch { expected, actual })
    }
}
