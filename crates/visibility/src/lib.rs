//! Content visibility policy for ClosetSwap
//!
//! Decides, per viewer, whether a listing or a profile may be shown. The
//! policy is a pure function of the current snapshot: it never caches and
//! never mutates, so it must be re-evaluated on every read.
//!
//! Product rules, first match decides:
//!
//! 1. A listing pending NSFW review is shown to admins only.
//! 2. A suspended seller's listings are shown to the seller and admins only.
//! 3. An effectively NSFW listing (listing flag OR seller account flag) is
//!    hidden from anonymous and non-age-verified viewers.
//! 4. Everything else is visible.

pub mod lookup;
pub mod product;
pub mod profile;

pub use lookup::UserLookup;
pub use product::{effective_visibility, filter_visible, is_effectively_nsfw, is_product_visible};
pub use profile::{is_user_visible, user_visibility};

use serde::Serialize;

/// Why a listing or profile is withheld from a viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenReason {
    /// Reported and waiting for a moderator
    PendingReview,
    /// The listing's seller is suspended
    SellerSuspended,
    /// The profile itself is suspended
    AccountSuspended,
    /// NSFW content and the viewer is not age verified
    AgeRestricted,
}

/// Outcome of a visibility decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum Visibility {
    Visible,
    Hidden(HiddenReason),
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible)
    }

    /// The reason, if hidden
    pub fn hidden_reason(&self) -> Option<HiddenReason> {
        match self {
            Visibility::Visible => None,
            Visibility::Hidden(reason) => Some(*reason),
        }
    }
}
