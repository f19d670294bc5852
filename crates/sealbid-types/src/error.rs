//! Error types for SealBid.
//!
//! All errors use the `SB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Structural errors (malformed encodings)
//! - 2xx: Domain errors (side, amounts, price)
//! - 3xx: Puzzle errors
//! - 4xx: Solver pipeline errors
//! - 5xx: Envelope errors
//! - 6xx: Auction round errors
//! - 9xx: General / internal errors

use std::fmt;

use thiserror::Error;

use crate::AuctionId;

/// Central error enum for all SealBid operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SealbidError {
    // =================================================================
    // Structural Errors (1xx)
    // =================================================================
    /// The encoded bytes end before a required field.
    #[error("SB_ERR_100: Encoding too short: need at least {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },

    /// Bytes remain after the last field was decoded.
    #[error("SB_ERR_101: {count} trailing bytes after decoding")]
    TrailingBytes { count: usize },

    /// A length prefix does not fit in this platform's address space.
    #[error("SB_ERR_102: Length prefix {0} overflows")]
    LengthOverflow(u64),

    // =================================================================
    // Domain Errors (2xx)
    // =================================================================
    /// Side is neither buy nor sell.
    #[error("SB_ERR_200: Invalid side {0:?}, must be buy or sell")]
    InvalidSide(String),

    /// `amount_want` is zero, so no price can be computed.
    #[error("SB_ERR_201: Amount wanted is 0, no price can be calculated")]
    DivideByZero,

    /// Price must be a finite value greater than zero.
    #[error("SB_ERR_202: Invalid price {0}, must be greater than 0")]
    InvalidPrice(f64),

    /// The amount derived from a price does not fit in a `u64`.
    #[error("SB_ERR_203: Amount derived from price {price} is out of range")]
    AmountOutOfRange { price: f64 },

    // =================================================================
    // Puzzle Errors (3xx)
    // =================================================================
    /// Puzzle generation failed.
    #[error("SB_ERR_300: Puzzle creation failed: {reason}")]
    PuzzleCreate { reason: String },

    /// Puzzle solving or decryption of the ciphertext failed.
    #[error("SB_ERR_301: Puzzle solve failed: {reason}")]
    PuzzleSolve { reason: String },

    // =================================================================
    // Pipeline Errors (4xx)
    // =================================================================
    /// The puzzle solved, but the recovered bytes are not a valid order.
    #[error("SB_ERR_400: Solved bytes are not a valid auction order: {0}")]
    DecodeAfterSolve(Box<SealbidError>),

    // =================================================================
    // Envelope Errors (5xx)
    // =================================================================
    /// Envelope carries a puzzle tag with no registered decoder.
    #[error("SB_ERR_500: Unknown puzzle variant tag {0}")]
    UnknownVariant(u8),

    // =================================================================
    // Round Errors (6xx)
    // =================================================================
    /// An order is bound to a different auction than expected.
    #[error("SB_ERR_600: Auction mismatch: expected {expected}, got {actual}")]
    AuctionMismatch {
        expected: AuctionId,
        actual: AuctionId,
    },

    /// The order signature did not verify against its signable bytes.
    #[error("SB_ERR_601: Order signature verification failed")]
    SignatureInvalid,

    /// Every order in the round failed, so the round cannot clear.
    #[error("SB_ERR_602: All {count} orders in the round failed")]
    AllOrdersFailed { count: usize },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SB_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Configuration error (invalid values, unparsable file, etc.).
    #[error("SB_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// Serialization error outside the binary codecs.
    #[error("SB_ERR_902: Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification used when reporting failed orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Structural,
    Domain,
    PuzzleSolve,
    DecodeAfterSolve,
    UnknownVariant,
    Round,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "STRUCTURAL"),
            Self::Domain => write!(f, "DOMAIN"),
            Self::PuzzleSolve => write!(f, "PUZZLE_SOLVE"),
            Self::DecodeAfterSolve => write!(f, "DECODE_AFTER_SOLVE"),
            Self::UnknownVariant => write!(f, "UNKNOWN_VARIANT"),
            Self::Round => write!(f, "ROUND"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl SealbidError {
    /// Which failure class this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TooShort { .. } | Self::TrailingBytes { .. } | Self::LengthOverflow(_) => {
                ErrorCategory::Structural
            }
            Self::InvalidSide(_)
            | Self::DivideByZero
            | Self::InvalidPrice(_)
            | Self::AmountOutOfRange { .. } => ErrorCategory::Domain,
            Self::PuzzleCreate { .. } | Self::PuzzleSolve { .. } => ErrorCategory::PuzzleSolve,
            Self::DecodeAfterSolve(_) => ErrorCategory::DecodeAfterSolve,
            Self::UnknownVariant(_) => ErrorCategory::UnknownVariant,
            Self::AuctionMismatch { .. } | Self::SignatureInvalid | Self::AllOrdersFailed { .. } => {
                ErrorCategory::Round
            }
            Self::Internal(_) | Self::Configuration(_) | Self::Serialization(_) => {
                ErrorCategory::Internal
            }
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SealbidError>;

impl From<serde_json::Error> for SealbidError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = SealbidError::TooShort {
            needed: 101,
            actual: 3,
        };
        let msg = format!("{err}");
        assert!(msg.starts_with("SB_ERR_100"), "Got: {msg}");
        assert!(msg.contains("101"));
    }

    #[test]
    fn decode_after_solve_wraps_cause() {
        let err = SealbidError::DecodeAfterSolve(Box::new(SealbidError::TrailingBytes { count: 4 }));
        let msg = format!("{err}");
        assert!(msg.contains("SB_ERR_400"));
        assert!(msg.contains("SB_ERR_101"));
        assert_eq!(err.category(), ErrorCategory::DecodeAfterSolve);
    }

    #[test]
    fn categories() {
        assert_eq!(SealbidError::DivideByZero.category(), ErrorCategory::Domain);
        assert_eq!(
            SealbidError::AmountOutOfRange { price: 1.0 }.category(),
            ErrorCategory::Domain
        );
        assert_eq!(
            SealbidError::UnknownVariant(9).category(),
            ErrorCategory::UnknownVariant
        );
        assert_eq!(
            SealbidError::PuzzleSolve { reason: "x".into() }.category(),
            ErrorCategory::PuzzleSolve
        );
        assert_eq!(
            SealbidError::LengthOverflow(u64::MAX).category(),
            ErrorCategory::Structural
        );
    }

    #[test]
    fn all_errors_have_sb_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(SealbidError::DivideByZero),
            Box::new(SealbidError::InvalidPrice(-1.0)),
            Box::new(SealbidError::SignatureInvalid),
            Box::new(SealbidError::Internal("test".into())),
            Box::new(SealbidError::AuctionMismatch {
                expected: AuctionId([1u8; 32]),
                actual: AuctionId([2u8; 32]),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("SB_ERR_"),
                "Error missing SB_ERR_ prefix: {msg}"
            );
        }
    }
}
