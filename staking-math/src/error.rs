use thiserror::Error;

/// Errors produced by the staking arithmetic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    /// The stake's duration is not one of the pool's duration thresholds, so
    /// no penalty group can be resolved for it.
    #[error("duration {duration}s does not match any configured duration threshold")]
    UnknownDurationGroup { duration: u64 },

    /// A decimal string could not be converted to a fixed-point integer.
    #[error("invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// A fixed-point value does not fit in 128 bits.
    #[error("fixed-point overflow")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, MathError>;
