use thiserror::Error;

/// A vector or bounds argument disagrees with the fixed dimension.
///
/// These are never coerced away: a proposal object checks every input
/// against the dimension fixed at construction time.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionError {
    #[error("input has wrong dimension ({actual} instead of {expected})")]
    Mismatch { expected: usize, actual: usize },
    #[error("invalid bounds, found upper < lower at axis {axis}")]
    InvertedBounds { axis: usize },
}

/// A numerical precondition on the proposal parameters failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("covariance matrix is not symmetric positive definite")]
    NotPositiveDefinite,
    #[error("covariance matrix must be square, got {nrows}x{ncols}")]
    NotSquare { nrows: usize, ncols: usize },
    #[error("covariance matrix must have at least one dimension")]
    EmptyCovariance,
    #[error("degrees of freedom must be positive, got {0}")]
    NonPositiveDof(f64),
    #[error("need at least two points to estimate a covariance, got {0}")]
    InsufficientHistory(usize),
}

/// Umbrella error for the proposal capability traits.
///
/// All failures are deterministic functions of malformed input, so
/// there is nothing to retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProposalError {
    #[error(transparent)]
    Dimension(#[from] DimensionError),
    #[error(transparent)]
    Math(#[from] MathError),
}

impl DimensionError {
    pub(crate) fn check_len(expected: usize, actual: usize) -> Result<(), DimensionError> {
        if actual == expected {
            Ok(())
        } else {
            Err(DimensionError::Mismatch { expected, actual })
        }
    }
}
