use thiserror::Error;

/// Errors produced by type parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("unknown zoning type: {0}")]
    UnknownZoning(String),

    #[error("principal must not be empty")]
    EmptyPrincipal,
}
