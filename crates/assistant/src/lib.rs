//! Listing and search assistance for ClosetSwap
//!
//! The assistant is an external service: it drafts descriptions, screens
//! listings for mature content, searches the catalog from natural language,
//! and suggests prices and shipping costs. It may fail at any time.
//!
//! [`AssistantClient`] is the raw, fallible contract. [`Assistant`] wraps a
//! client and never fails: every error becomes a neutral fallback value so
//! listing and bidding flows carry on.
//!
//! # Feature Flags
//!
//! - `client` - Enable the HTTP client

pub mod client;
pub mod error;
pub mod fallback;
pub mod types;

pub use client::{AssistantClient, DisabledAssistantClient, MockAssistantClient};
pub use error::{AssistantError, Result};
pub use fallback::{Assistant, PRICE_FALLBACK_REASONING, SEARCH_FALLBACK_SUMMARY};
pub use types::{CandidateProduct, ListingDraft, MarketSample, PriceSuggestion, SearchResult};

#[cfg(feature = "client")]
pub use client::http::HttpAssistantClient;
