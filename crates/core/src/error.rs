//! Identifier error model.

use thiserror::Error;

/// Result type used when parsing identifiers.
pub type IdResult<T> = Result<T, IdError>;

/// Identifier validation failure.
///
/// Directory identifiers arrive from request parameters and backend responses;
/// both are untrusted, so construction is fallible.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The identifier was empty or whitespace only.
    #[error("{0}: identifier must not be empty")]
    Empty(&'static str),

    /// The identifier contained characters the directory never produces.
    #[error("{kind}: invalid character {ch:?} in identifier")]
    InvalidCharacter { kind: &'static str, ch: char },
}
