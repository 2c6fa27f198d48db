//! Error types for rate decoding and summary computation.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatesError {
    /// A refill period (or the `REFILL_DAYS` value it came from) cannot be used.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Input text is not a hex or decimal 256-bit integer.
    #[error("Invalid encoded rate: {0}")]
    InvalidEncoding(String),
}

pub type Result<T> = std::result::Result<T, RatesError>;
