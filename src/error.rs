//! Error taxonomy for table construction and cursor misuse.
//!
//! Missing keys are not errors: lookups and removals report them as `None`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// Requested initial capacity was zero.
    #[error("initial capacity must be greater than 0, got {0}")]
    InvalidCapacity(usize),
    /// Load factor threshold was zero, negative, NaN or infinite.
    #[error("load factor must be a finite number greater than 0, got {0}")]
    InvalidLoadFactor(f64),
    /// Capacity ceiling was zero or not a power of two.
    #[error("maximum capacity must be a non-zero power of two, got {0}")]
    InvalidMaxCapacity(usize),
    /// `try_next` was called on a view iterator that already yielded every entry.
    #[error("no more elements")]
    IteratorExhausted,
}

impl TableError {
    /// True for the argument-validation failures raised at construction.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            TableError::InvalidCapacity(_)
                | TableError::InvalidLoadFactor(_)
                | TableError::InvalidMaxCapacity(_)
        )
    }
}
