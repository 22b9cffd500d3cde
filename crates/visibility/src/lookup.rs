//! Read-only user directory used to resolve a listing's seller

use common::{User, UserId};
use std::collections::HashMap;

/// Anything that can resolve a user by id
pub trait UserLookup {
    fn find_user(&self, id: &UserId) -> Option<&User>;
}

impl UserLookup for HashMap<UserId, User> {
    fn find_user(&self, id: &UserId) -> Option<&User> {
        self.get(id)
    }
}

impl UserLookup for [User] {
    fn find_user(&self, id: &UserId) -> Option<&User> {
        self.iter().find(|u| u.id == *id)
    }
}

impl UserLookup for Vec<User> {
    fn find_user(&self, id: &UserId) -> Option<&User> {
        self.as_slice().find_user(id)
    }
}
