//! Fault injection error types.

use thiserror::Error;

/// The error type for a value that fails range or format validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    /// Modulus outside `1..=10000`.
    #[error("invalid modulus")]
    InvalidModulus,
    /// Percent outside `1..=100`.
    #[error("invalid percent")]
    InvalidPercent,
    /// Status code outside `0..=16`.
    #[error("invalid code")]
    InvalidCode,
    /// A token that does not parse as a decimal integer.
    #[error("invalid integer: {0}")]
    Parse(#[from] std::num::ParseIntError),
}

/// The error type for an invalid fault config.
///
/// Carries the first violation found, wrapped with the field it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The client trigger value is out of range for its mode.
    #[error("client fault value: {0}")]
    Client(#[source] ValidateError),
    /// The server trigger value is out of range for its mode.
    #[error("server fault value: {0}")]
    Server(#[source] ValidateError),
    /// The status code pool contains an unparsable or out-of-range entry.
    #[error("fault codes: {0}")]
    Codes(#[source] ValidateError),
    /// The status code pool cannot be encoded as a metadata value.
    #[error("fault codes: invalid metadata value")]
    CodesValue,
}

/// The error type for an unrecognized trigger mode spelling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid mode: {0:?}")]
pub struct ParseModeError(pub(crate) String);
