//! Error types for statement building.

use thiserror::Error;

/// Errors raised while rendering a statement.
///
/// Building is atomic: a statement is either returned complete or one of
/// these errors is returned and nothing is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A filter key names a mnemonic that is not registered.
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    /// A value outside the supported set of literal kinds.
    #[error("unmappable value: {0}")]
    UnmappableValue(String),

    /// An INSERT was requested without any rows.
    #[error("insert requires at least one row")]
    EmptyInsert,

    /// The combination of arguments cannot produce a statement.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Result type alias for statement building.
pub type Result<T> = std::result::Result<T, Error>;
