use crate::*;
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Marketplace name is required")]
    MissingMarketplaceName,

    #[error("Marketplace description is required")]
    MissingMarketplaceDescription,

    #[error("Invalid version format: {0}. Must be in format X.Y.Z (e.g., 1.0.0)")]
    InvalidVersionFormat(String),

    #[error("fees.rate must be in [0, 1), got: {0}")]
    InvalidFeeRate(f64),

    #[error("auction.bid_increment must be a positive number, got: {0}")]
    InvalidBidIncrement(f64),

    #[error("Listing durations must satisfy 1 <= min ({min}) <= default ({default}) <= max ({max})")]
    InvalidDurationBounds { min: u32, default: u32, max: u32 },

    #[error("At least one listing category must be defined")]
    NoCategories,

    #[error("Duplicate listing category '{0}'")]
    DuplicateCategory(String),

    #[error("Invalid admin email '{0}'")]
    InvalidAdminEmail(String),

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Assistant: {message}")]
    InvalidAssistant { message: String },

    #[error("Environment variable '{var}' is missing or invalid: {message}")]
    InvalidEnvVar { var: String, message: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &MarketplaceConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_marketplace(&config.marketplace, &mut report);
    validate_fees(&config.fees, &config.auction, &mut report);
    validate_listings(&config.listings, &mut report);
    validate_accounts(&config.accounts, &mut report);
    validate_preferences(&config.preferences, &mut report);
    validate_assistant(config.assistant.as_ref(), &mut report);

    if LOG_FORMATS
        .iter()
        .all(|f| !f.eq_ignore_ascii_case(config.logging.format.trim()))
    {
        report.add_error(ValidationError::InvalidLogFormat(
            config.logging.format.clone(),
        ));
    }

    if config.monitoring.metrics_port == Some(0) {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "monitoring.metrics_port".to_string(),
        });
    }

    report
}

const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

fn validate_marketplace(marketplace: &MarketplaceInfo, report: &mut ValidationReport) {
    if marketplace.name.trim().is_empty() {
        report.add_error(ValidationError::MissingMarketplaceName);
    }

    if marketplace.description.trim().is_empty() {
        report.add_error(ValidationError::MissingMarketplaceDescription);
    }

    let valid_version = Regex::new(r"^\d+\.\d+\.\d+$")
        .map(|re| re.is_match(&marketplace.version))
        .unwrap_or(false);
    if !valid_version {
        report.add_error(ValidationError::InvalidVersionFormat(
            marketplace.version.clone(),
        ));
    }
}

fn validate_fees(fees: &FeesConfig, auction: &AuctionConfig, report: &mut ValidationReport) {
    if !(fees.rate.is_finite() && (0.0..1.0).contains(&fees.rate)) {
        report.add_error(ValidationError::InvalidFeeRate(fees.rate));
    } else if fees.rate == 0.0 {
        report.add_warning("fees.rate", "Platform fee is zero; sales will not accrue fees");
    }

    if !(auction.bid_increment.is_finite() && auction.bid_increment > 0.0) {
        report.add_error(ValidationError::InvalidBidIncrement(auction.bid_increment));
    }
}

fn validate_listings(listings: &ListingsConfig, report: &mut ValidationReport) {
    let (min, default, max) = (
        listings.min_duration_days,
        listings.default_duration_days,
        listings.max_duration_days,
    );
    if min == 0 || min > default || default > max {
        report.add_error(ValidationError::InvalidDurationBounds { min, default, max });
    }

    if listings.categories.is_empty() {
        report.add_error(ValidationError::NoCategories);
    } else {
        let mut seen = HashSet::new();
        for category in &listings.categories {
            if !seen.insert(category.trim().to_lowercase()) {
                report.add_error(ValidationError::DuplicateCategory(category.clone()));
            }
        }
        if !seen.contains("nsfw") {
            report.add_warning(
                "listings.categories",
                "No 'NSFW' category defined; mature listings can only be flagged, not categorised",
            );
        }
    }

    match listings.expiry_sweep_interval_seconds {
        None => report.add_default(
            "listings.expiry_sweep_interval_seconds",
            &default_expiry_sweep_interval_seconds().to_string(),
        ),
        Some(0) => report.add_error(ValidationError::InvalidPositiveInteger {
            field: "listings.expiry_sweep_interval_seconds".to_string(),
        }),
        Some(_) => {}
    }
}

fn validate_accounts(accounts: &AccountsConfig, report: &mut ValidationReport) {
    for email in &accounts.admin_emails {
        let valid = email
            .trim()
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !valid {
            report.add_error(ValidationError::InvalidAdminEmail(email.clone()));
        }
    }

    if accounts.admin_emails.is_empty() {
        report.add_warning(
            "accounts.admin_emails",
            "No admin accounts configured; the moderation queue will be unreachable",
        );
    }

    if accounts.age_of_majority == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "accounts.age_of_majority".to_string(),
        });
    } else if accounts.default_age < accounts.age_of_majority {
        report.add_warning(
            "accounts.default_age",
            "Accounts provisioned on login will not be age-verified",
        );
    }
}

fn validate_preferences(preferences: &PreferencesConfig, report: &mut ValidationReport) {
    match preferences.search_history_limit {
        None => report.add_default(
            "preferences.search_history_limit",
            &default_search_history_limit().to_string(),
        ),
        Some(0) => report.add_error(ValidationError::InvalidPositiveInteger {
            field: "preferences.search_history_limit".to_string(),
        }),
        Some(_) => {}
    }

    match &preferences.storage_path {
        None => report.add_default("preferences.storage_path", "in-memory"),
        Some(path) => check_env_placeholders(path, report),
    }
}

fn validate_assistant(assistant: Option<&AssistantConfig>, report: &mut ValidationReport) {
    let Some(assistant) = assistant else {
        report.add_default("assistant", "disabled (fallback values only)");
        return;
    };

    check_env_placeholders(&assistant.endpoint, report);
    if let Some(key) = &assistant.api_key {
        check_env_placeholders(key, report);
    }

    let endpoint = assistant.endpoint.trim();
    if !has_unresolved_env_vars(endpoint)
        && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
    {
        report.add_error(ValidationError::InvalidAssistant {
            message: format!("endpoint must be an http(s) URL, got: '{}'", endpoint),
        });
    }

    match assistant.timeout_seconds {
        None => report.add_default(
            "assistant.timeout_seconds",
            &default_assistant_timeout_seconds().to_string(),
        ),
        Some(0) => report.add_error(ValidationError::InvalidPositiveInteger {
            field: "assistant.timeout_seconds".to_string(),
        }),
        Some(_) => {}
    }
}

fn check_env_placeholders(value: &str, report: &mut ValidationReport) {
    for var in unresolved_env_vars(value) {
        report.add_error(ValidationError::InvalidEnvVar {
            var,
            message: "not set".to_string(),
        });
    }
}
