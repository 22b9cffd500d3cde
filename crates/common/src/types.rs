//! Marketplace domain types
//!
//! This module defines the entities owned by the catalog: users, listings,
//! purchase requests, transactions and reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_amount, MarketError, Result};
use crate::ids::{ProductId, RequestId, ReviewId, TransactionId, UserId};

/// Marketplace role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Buyer,
    Seller,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Buyer => write!(f, "buyer"),
            UserRole::Seller => write!(f, "seller"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// Payout settings of a seller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethods {
    /// PayPal account email
    #[serde(default)]
    pub paypal: Option<String>,
}

/// Feedback left on a user after a completed sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub author_id: UserId,
    pub author_name: String,
    pub target_id: UserId,
    /// 1 to 5 stars
    pub rating: u8,
    pub text: String,
    pub transaction_id: TransactionId,
    pub created_at: DateTime<Utc>,
}

/// Marketplace account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: u32,
    pub role: UserRole,
    /// Append-only
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub payment_methods: Option<PaymentMethods>,
    /// Only meaningful for sellers
    #[serde(default)]
    pub fees_owed: f64,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub age_verified: bool,
    /// Self-declared account-level NSFW flag
    #[serde(default)]
    pub is_nsfw: bool,
    /// Pending moderation, not a confirmed classification
    #[serde(default)]
    pub reported_nsfw: bool,
    #[serde(default)]
    pub is_suspended: bool,
}

impl User {
    /// Create an account with every flag cleared
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: u32, role: UserRole) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            age,
            role,
            reviews: Vec::new(),
            payment_methods: None,
            fees_owed: 0.0,
            is_admin: role == UserRole::Admin,
            age_verified: false,
            is_nsfw: false,
            reported_nsfw: false,
            is_suspended: false,
        }
    }

    /// Admin rights come from either the role or the explicit flag
    pub fn is_administrator(&self) -> bool {
        self.is_admin || self.role == UserRole::Admin
    }

    pub fn is_seller(&self) -> bool {
        self.role == UserRole::Seller
    }

    /// Fees the platform is owed; always zero for non-sellers
    pub fn outstanding_fees(&self) -> f64 {
        if self.is_seller() {
            self.fees_owed
        } else {
            0.0
        }
    }

    /// Mean star rating, `None` without reviews
    pub fn average_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let total: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        Some(f64::from(total) / self.reviews.len() as f64)
    }
}

/// Condition grade of a listed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCondition {
    #[serde(rename = "New with tags")]
    NewWithTags,
    #[serde(rename = "Like new")]
    LikeNew,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Fair")]
    Fair,
}

impl ProductCondition {
    pub const ALL: [ProductCondition; 4] = [
        ProductCondition::NewWithTags,
        ProductCondition::LikeNew,
        ProductCondition::Good,
        ProductCondition::Fair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCondition::NewWithTags => "New with tags",
            ProductCondition::LikeNew => "Like new",
            ProductCondition::Good => "Good",
            ProductCondition::Fair => "Fair",
        }
    }
}

impl std::fmt::Display for ProductCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductCondition {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().to_lowercase() == normalized)
            .ok_or_else(|| MarketError::invalid_input(format!("unknown condition: {s}")))
    }
}

/// Listing lifecycle; `Sold` and `Expired` are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Available,
    Sold,
    Expired,
}

impl ProductStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProductStatus::Sold | ProductStatus::Expired)
    }

    /// Only `available -> sold` and `available -> expired` are legal
    pub fn can_transition_to(&self, next: ProductStatus) -> bool {
        matches!(
            (self, next),
            (ProductStatus::Available, ProductStatus::Sold)
                | (ProductStatus::Available, ProductStatus::Expired)
        )
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Available => write!(f, "available"),
            ProductStatus::Sold => write!(f, "sold"),
            ProductStatus::Expired => write!(f, "expired"),
        }
    }
}

/// Seller-disclosed defect with supporting photos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Never disclosed to bidders; see [`Product::without_reserve`]
    #[serde(default)]
    pub reserve_price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: String,
    pub condition: ProductCondition,
    pub seller_id: UserId,
    pub shipping_cost: f64,
    pub status: ProductStatus,
    #[serde(default)]
    pub is_nsfw: bool,
    #[serde(default)]
    pub reported_nsfw: bool,
    #[serde(default)]
    pub documented_damage: Vec<DamageReport>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Product {
    pub fn is_available(&self) -> bool {
        self.status == ProductStatus::Available
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.seller_id == *user_id
    }

    /// True once `now` has reached `expires_at`
    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Copy with the reserve price removed, for bidder-facing views
    pub fn without_reserve(&self) -> Self {
        Self {
            reserve_price: None,
            ..self.clone()
        }
    }
}

/// Bid status; terminal once not pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Accepted => write!(f, "accepted"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A buyer's standing offer on one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub id: RequestId,
    pub product_id: ProductId,
    pub buyer_id: UserId,
    pub min_bid: f64,
    pub max_bid: f64,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub status: RequestStatus,
}

impl PurchaseRequest {
    /// Create a pending request after validating the bid range
    pub fn new(
        product_id: ProductId,
        buyer_id: UserId,
        min_bid: f64,
        max_bid: f64,
        comment: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        validate_bid_range(min_bid, max_bid)?;
        Ok(Self {
            id: RequestId::new(),
            product_id,
            buyer_id,
            min_bid,
            max_bid,
            comment: comment.into(),
            created_at,
            status: RequestStatus::Pending,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// Bids must be finite, non-negative and `max >= min`
pub fn validate_bid_range(min_bid: f64, max_bid: f64) -> Result<()> {
    ensure_amount("min bid", min_bid)?;
    ensure_amount("max bid", max_bid)?;
    if max_bid < min_bid {
        return Err(MarketError::invalid_input(format!(
            "max bid {max_bid} is below min bid {min_bid}"
        )));
    }
    Ok(())
}

/// Which side of a sale a user was on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    Buyer,
    Seller,
}

/// Record of a completed sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub product_id: ProductId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    /// Clearing price
    pub price: f64,
    pub shipping_cost: f64,
    /// Computed once at creation
    pub fee: f64,
    pub created_at: DateTime<Utc>,
    pub reviewed_by_buyer: bool,
    pub reviewed_by_seller: bool,
}

impl Transaction {
    /// Role of `user_id` in this sale, if any
    pub fn party_role(&self, user_id: &UserId) -> Option<PartyRole> {
        if self.buyer_id == *user_id {
            Some(PartyRole::Buyer)
        } else if self.seller_id == *user_id {
            Some(PartyRole::Seller)
        } else {
            None
        }
    }

    /// The user a party reviews
    pub fn counterparty(&self, role: PartyRole) -> UserId {
        match role {
            PartyRole::Buyer => self.seller_id,
            PartyRole::Seller => self.buyer_id,
        }
    }

    pub fn is_reviewed_by(&self, role: PartyRole) -> bool {
        match role {
            PartyRole::Buyer => self.reviewed_by_buyer,
            PartyRole::Seller => self.reviewed_by_seller,
        }
    }

    /// Flip the party's reviewed flag; each flag flips exactly once
    pub fn mark_reviewed(&mut self, role: PartyRole) -> Result<()> {
        if self.is_reviewed_by(role) {
            return Err(MarketError::AlreadyReviewed(self.id));
        }
        match role {
            PartyRole::Buyer => self.reviewed_by_buyer = true,
            PartyRole::Seller => self.reviewed_by_seller = true,
        }
        Ok(())
    }

    /// What the buyer pays in total
    pub fn total_charged(&self) -> f64 {
        self.price + self.shipping_cost
    }
}

/// Moderator decision on a reported product or user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    /// Clear the report, keep the NSFW classification as is
    Dismiss,
    /// Clear the report and mark the target NSFW
    Confirm,
}

impl std::str::FromStr for ModerationAction {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dismiss" => Ok(ModerationAction::Dismiss),
            "confirm" => Ok(ModerationAction::Confirm),
            _ => Err(MarketError::invalid_input(format!("unknown moderation action: {s}"))),
        }
    }
}
