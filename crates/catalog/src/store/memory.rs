//! In-memory catalog store

use common::{
    MarketError, Product, ProductId, PurchaseRequest, RequestId, Result, Transaction,
    TransactionId, User, UserId,
};
use parking_lot::RwLock;

use crate::store::traits::{CatalogSnapshot, CatalogStore, ChangeSet};

/// In-memory catalog store for tests, demos and single-process deployments
pub struct InMemoryCatalogStore {
    state: RwLock<CatalogSnapshot>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::with_snapshot(CatalogSnapshot::default())
    }

    /// Start from pre-seeded state
    pub fn with_snapshot(snapshot: CatalogSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_unique_emails(state: &CatalogSnapshot, users: &[User]) -> Result<()> {
    for (i, user) in users.iter().enumerate() {
        let taken_in_store = state
            .users
            .values()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email));
        let taken_in_batch = users[..i]
            .iter()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email));
        if taken_in_store || taken_in_batch {
            return Err(MarketError::invalid_input(format!(
                "email {} is already registered",
                user.email
            )));
        }
    }
    Ok(())
}

impl CatalogStore for InMemoryCatalogStore {
    fn snapshot(&self) -> CatalogSnapshot {
        self.state.read().clone()
    }

    fn user(&self, id: &UserId) -> Option<User> {
        self.state.read().users.get(id).cloned()
    }

    fn user_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim();
        self.state
            .read()
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    fn product(&self, id: &ProductId) -> Option<Product> {
        self.state.read().products.get(id).cloned()
    }

    fn request(&self, id: &RequestId) -> Option<PurchaseRequest> {
        self.state.read().requests.get(id).cloned()
    }

    fn transaction(&self, id: &TransactionId) -> Option<Transaction> {
        self.state.read().transactions.get(id).cloned()
    }

    fn users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.state.read().users.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        users
    }

    fn products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.state.read().products.values().cloned().collect();
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        products
    }

    fn requests_for_product(&self, product: &ProductId) -> Vec<PurchaseRequest> {
        let mut requests: Vec<PurchaseRequest> = self
            .state
            .read()
            .requests
            .values()
            .filter(|r| r.product_id == *product)
            .cloned()
            .collect();
        requests.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        requests
    }

    fn requests_by_buyer(&self, buyer: &UserId) -> Vec<PurchaseRequest> {
        let mut requests: Vec<PurchaseRequest> = self
            .state
            .read()
            .requests
            .values()
            .filter(|r| r.buyer_id == *buyer)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        requests
    }

    fn transactions_for_user(&self, user: &UserId) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self
            .state
            .read()
            .transactions
            .values()
            .filter(|t| t.party_role(user).is_some())
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        transactions
    }

    fn commit(&self, changes: ChangeSet) -> Result<()> {
        let mut state = self.state.write();
        check_unique_emails(&state, &changes.users)?;

        for user in changes.users {
            state.users.insert(user.id, user);
        }
        for product in changes.products {
            state.products.insert(product.id, product);
        }
        for request in changes.requests {
            state.requests.insert(request.id, request);
        }
        for transaction in changes.transactions {
            state.transactions.insert(transaction.id, transaction);
        }
        Ok(())
    }
}
