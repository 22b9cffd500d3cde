//! Accounts: provider login, registration, role upgrade, payments, fees

use common::{MarketError, PaymentMethods, Result, User, UserId, UserRole};
use tracing::info;

use super::CatalogService;
use crate::store::traits::ChangeSet;

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(MarketError::invalid_input(format!("malformed email: {}", email)));
    }
    Ok(email)
}

/// `jane.doe_smith@...` becomes `Jane Doe Smith`
fn display_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    local
        .split(['.', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn require_self(caller: &UserId, target: &UserId) -> Result<()> {
    if caller != target {
        return Err(MarketError::unauthorized("users may only change their own account"));
    }
    Ok(())
}

impl CatalogService {
    fn is_admin_email(&self, email: &str) -> bool {
        self.settings
            .admin_emails
            .iter()
            .any(|a| a.trim().eq_ignore_ascii_case(email))
    }

    /// Find or auto-provision the account behind a provider login
    pub fn login_with_provider(&self, email: &str) -> Result<User> {
        let email = normalize_email(email)?;
        let _guard = self.begin();

        if let Some(mut user) = self.store.user_by_email(&email) {
            if self.is_admin_email(&email) && !user.is_administrator() {
                user.role = UserRole::Admin;
                user.is_admin = true;
                self.store.commit(ChangeSet::new().user(user.clone()))?;
                info!(user_id = %user.id, "Promoted configured admin on login");
            }
            return Ok(user);
        }

        let role = if self.is_admin_email(&email) {
            UserRole::Admin
        } else {
            UserRole::Buyer
        };
        let mut user = User::new(display_name(&email), email, self.settings.default_age, role);
        user.age_verified = user.age >= self.settings.age_of_majority;

        self.store.commit(ChangeSet::new().user(user.clone()))?;
        info!(user_id = %user.id, role = %user.role, "Provisioned account on first login");
        Ok(user)
    }

    /// Add a pre-built account; the email must be unused
    pub fn register_user(&self, mut user: User) -> Result<User> {
        user.email = normalize_email(&user.email)?;
        if user.name.trim().is_empty() {
            return Err(MarketError::invalid_input("name is required"));
        }
        let _guard = self.begin();
        if self.store.user_by_email(&user.email).is_some() {
            return Err(MarketError::invalid_input(format!(
                "email {} is already registered",
                user.email
            )));
        }
        self.store.commit(ChangeSet::new().user(user.clone()))?;
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Turn a buyer into a seller; sellers and admins are left as they are
    pub fn upgrade_to_seller(&self, caller: &UserId, user_id: &UserId) -> Result<User> {
        require_self(caller, user_id)?;
        let _guard = self.begin();
        let mut user = self.require_user(user_id)?;
        if user.role != UserRole::Buyer {
            return Ok(user);
        }
        user.role = UserRole::Seller;
        user.payment_methods = Some(PaymentMethods::default());
        user.fees_owed = 0.0;
        self.store.commit(ChangeSet::new().user(user.clone()))?;
        info!(user_id = %user.id, "Upgraded to seller");
        Ok(user)
    }

    pub fn update_payment_methods(
        &self,
        caller: &UserId,
        user_id: &UserId,
        methods: PaymentMethods,
    ) -> Result<User> {
        require_self(caller, user_id)?;
        let _guard = self.begin();
        let mut user = self.require_user(user_id)?;
        user.payment_methods = Some(methods);
        self.store.commit(ChangeSet::new().user(user.clone()))?;
        info!(user_id = %user.id, "Payment methods updated");
        Ok(user)
    }

    /// Settle the platform fees a seller owes; returns the amount paid
    pub fn pay_fees(&self, caller: &UserId, user_id: &UserId) -> Result<f64> {
        require_self(caller, user_id)?;
        let _guard = self.begin();
        let mut user = self.require_user(user_id)?;
        let amount = user.outstanding_fees();
        if amount <= 0.0 {
            return Ok(0.0);
        }
        user.fees_owed = 0.0;
        self.store.commit(ChangeSet::new().user(user.clone()))?;
        info!(user_id = %user.id, amount, "Fees paid");
        Ok(amount)
    }

    /// Self-declared account-level NSFW flag
    pub fn set_account_nsfw(&self, caller: &UserId, is_nsfw: bool) -> Result<User> {
        let _guard = self.begin();
        let mut user = self.require_user(caller)?;
        if user.is_nsfw != is_nsfw {
            user.is_nsfw = is_nsfw;
            self.store.commit(ChangeSet::new().user(user.clone()))?;
            info!(user_id = %user.id, is_nsfw, "Account NSFW flag changed");
        }
        Ok(user)
    }
}
