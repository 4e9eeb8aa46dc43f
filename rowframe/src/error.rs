//! Error types for the engine.

use thiserror::Error;

/// Invalid options detected while building an engine.
///
/// These are raised once, at construction time, so that a bad configuration
/// never produces a half-working table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `min_column_width` is larger than `max_column_width`.
    #[error("min column width ({min}) exceeds max column width ({max})")]
    InvalidColumnBounds {
        /// The configured minimum.
        min: u32,
        /// The configured maximum.
        max: u32,
    },

    /// The base row height used by the built-in estimators is zero.
    #[error("row height must be greater than zero")]
    ZeroRowHeight,

    /// The expanded-row multiplier would shrink rows.
    #[error("expanded row factor must be at least 1, got {0}")]
    InvalidExpandFactor(u32),

    /// Two columns share the same id.
    #[error("duplicate column id '{0}'")]
    DuplicateColumn(String),
}

/// Errors raised by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// An index outside `[0, len)` was passed in. This is an integration bug
    /// in the caller and is never clamped.
    #[error("index {index} out of range for {len} rows")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The current row count.
        len: usize,
    },

    /// No column with the given id exists.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Two rows share the same id.
    #[error("duplicate row id '{0}'")]
    DuplicateRowId(String),

    /// Row data handed in for sorting doesn't line up with the rows the
    /// engine was given.
    #[error("expected {expected} data rows, got {actual}")]
    DataLengthMismatch {
        /// Rows known to the engine.
        expected: usize,
        /// Rows supplied.
        actual: usize,
    },

    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Fail fast when `index` is outside `[0, len)`.
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(EngineError::IndexOutOfRange { index, len })
    }
}
