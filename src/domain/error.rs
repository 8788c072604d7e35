//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree's construction or indexing rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("adding {delta} to element {index} ({value}) overflows i64")]
    Overflow { index: usize, value: i64, delta: i64 },
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
