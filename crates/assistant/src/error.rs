//! Assistant error types

use common::MarketError;
use thiserror::Error;

/// Errors returned by an [`AssistantClient`](crate::AssistantClient)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssistantError {
    /// Transport failure or non-success status
    #[error("Assistant unavailable: {0}")]
    Unavailable(String),

    /// The response did not match the expected shape
    #[error("Malformed assistant response: {0}")]
    Malformed(String),

    /// No endpoint configured
    #[error("Assistant not configured")]
    NotConfigured,

    #[error("Assistant timed out after {0}s")]
    Timeout(u64),
}

/// Result type for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

impl From<AssistantError> for MarketError {
    fn from(err: AssistantError) -> Self {
        MarketError::ExternalServiceFailure(err.to_string())
    }
}
