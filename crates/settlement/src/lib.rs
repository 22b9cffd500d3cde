//! Settlement for ClosetSwap
//!
//! This crate resolves competing purchase requests into a single sale and
//! owns the listing and account state machines.
//!
//! # Modules
//!
//! - [`auction`] - Clearing price and winner/loser resolution
//! - [`lifecycle`] - Listing status transitions and the expiry sweep
//! - [`moderation`] - Reports, moderator reviews, suspensions
//!
//! Everything here is pure: functions take the relevant entities and the
//! acting principal and either return the computed result or mutate only
//! the entities handed in. Persisting the result is the caller's job.

pub mod auction;
pub mod lifecycle;
pub mod moderation;

pub use auction::{SettlementEngine, SettlementOutcome, SettlementPolicy};
pub use lifecycle::{apply_expiry, transition, ExpiryOutcome};
pub use moderation::{
    reinstate_user, report_product, report_user, review_reported_product, review_reported_user,
    suspend_user,
};
