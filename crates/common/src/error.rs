//! Marketplace error taxonomy
//!
//! Settlement, visibility, ranking and every catalog mutation report
//! failures through [`MarketError`]. Failures are synchronous and leave the
//! catalog untouched.

use thiserror::Error;

use crate::ids::TransactionId;

/// Errors raised by marketplace operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    /// Referenced user, product, request or transaction does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller lacks the rights for this mutation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Winning bid does not reach the seller's reserve price
    #[error("Reserve not met: max bid {max_bid} is below the reserve of {reserve}")]
    ReserveNotMet {
        /// The winning request's ceiling
        max_bid: f64,
        /// The seller's reserve price
        reserve: f64,
    },

    /// Malformed amounts or fields
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The caller already reviewed this transaction
    #[error("Transaction {0} already reviewed by this party")]
    AlreadyReviewed(TransactionId),

    /// Entity is not in a state that allows the operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Assistive service failed or returned malformed data
    #[error("External service failure: {0}")]
    ExternalServiceFailure(String),
}

/// Result type alias using [`MarketError`]
pub type Result<T> = std::result::Result<T, MarketError>;

impl MarketError {
    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            MarketError::NotFound(_) => "not_found",
            MarketError::Unauthorized(_) => "unauthorized",
            MarketError::ReserveNotMet { .. } => "reserve_not_met",
            MarketError::InvalidInput(_) => "invalid_input",
            MarketError::AlreadyReviewed(_) => "already_reviewed",
            MarketError::InvalidState(_) => "invalid_state",
            MarketError::ExternalServiceFailure(_) => "external_service_failure",
        }
    }
}

/// Reject NaN, infinite and negative currency amounts
pub fn ensure_amount(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(MarketError::invalid_input(format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(MarketError::invalid_input(format!("{field} must not be negative")));
    }
    Ok(value)
}
