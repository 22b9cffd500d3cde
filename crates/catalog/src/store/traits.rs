//! CatalogStore trait definition

use common::{
    Product, ProductId, PurchaseRequest, RequestId, Result, Transaction, TransactionId, User,
    UserId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every entity collection at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub users: HashMap<UserId, User>,
    pub products: HashMap<ProductId, Product>,
    pub requests: HashMap<RequestId, PurchaseRequest>,
    pub transactions: HashMap<TransactionId, Transaction>,
}

impl CatalogSnapshot {
    /// Build a snapshot from flat entity lists
    pub fn from_parts(
        users: Vec<User>,
        products: Vec<Product>,
        requests: Vec<PurchaseRequest>,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            products: products.into_iter().map(|p| (p.id, p)).collect(),
            requests: requests.into_iter().map(|r| (r.id, r)).collect(),
            transactions: transactions.into_iter().map(|t| (t.id, t)).collect(),
        }
    }
}

/// Entities to insert or replace in one atomic step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub users: Vec<User>,
    pub products: Vec<Product>,
    pub requests: Vec<PurchaseRequest>,
    pub transactions: Vec<Transaction>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    pub fn request(mut self, request: PurchaseRequest) -> Self {
        self.requests.push(request);
        self
    }

    pub fn transaction(mut self, transaction: Transaction) -> Self {
        self.transactions.push(transaction);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.products.is_empty()
            && self.requests.is_empty()
            && self.transactions.is_empty()
    }
}

/// CatalogStore trait - the interface for catalog storage
///
/// Reads return owned copies. [`CatalogStore::commit`] must apply a whole
/// change set or nothing, and must reject a user whose email is already
/// held by a different user.
pub trait CatalogStore: Send + Sync {
    /// Copy of every collection
    fn snapshot(&self) -> CatalogSnapshot;

    fn user(&self, id: &UserId) -> Option<User>;

    /// Case-insensitive email lookup
    fn user_by_email(&self, email: &str) -> Option<User>;

    fn product(&self, id: &ProductId) -> Option<Product>;

    fn request(&self, id: &RequestId) -> Option<PurchaseRequest>;

    fn transaction(&self, id: &TransactionId) -> Option<Transaction>;

    fn users(&self) -> Vec<User>;

    /// All listings ordered by creation time, then id
    fn products(&self) -> Vec<Product>;

    /// Every request on `product`, any status, oldest first
    fn requests_for_product(&self, product: &ProductId) -> Vec<PurchaseRequest>;

    /// Every request placed by `buyer`, newest first
    fn requests_by_buyer(&self, buyer: &UserId) -> Vec<PurchaseRequest>;

    /// Transactions where `user` is buyer or seller, newest first
    fn transactions_for_user(&self, user: &UserId) -> Vec<Transaction>;

    /// Apply `changes` atomically
    fn commit(&self, changes: ChangeSet) -> Result<()>;
}
