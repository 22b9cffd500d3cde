//! Common types and utilities for ClosetSwap
//!
//! This crate provides the domain model shared by every ClosetSwap crate:
//! users, listings, purchase requests, transactions and reviews, together
//! with the marketplace error taxonomy.
//!
//! # Modules
//!
//! - [`error`] - Marketplace error taxonomy
//! - [`ids`] - Typed entity identifiers
//! - [`types`] - Domain entities and enums
//! - [`time`] - Injectable time provider

pub mod error;
pub mod ids;
pub mod time;
pub mod types;

pub use error::{MarketError, Result};
pub use ids::{ProductId, RequestId, ReviewId, TransactionId, UserId};
pub use time::{MockTime, SystemTimeProvider, TimeProvider};
pub use types::*;
