//! ClosetSwap configuration
//!
//! A single YAML document with `${VAR}` environment substitution. Every
//! section except `marketplace` may be omitted and falls back to defaults.

use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketplaceInfo {
    pub name: String,
    pub description: String,
    pub version: String,
}

/// Platform fee charged to the seller on every sale
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeesConfig {
    #[serde(default = "default_fee_rate")]
    pub rate: f64,
}

impl Default for FeesConfig {
    fn default() -> Self {
        Self {
            rate: default_fee_rate(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuctionConfig {
    /// Added to the strongest competing bid when clearing
    #[serde(default = "default_bid_increment")]
    pub bid_increment: f64,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            bid_increment: default_bid_increment(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingsConfig {
    #[serde(default = "default_duration_days")]
    pub default_duration_days: u32,
    #[serde(default = "default_min_duration_days")]
    pub min_duration_days: u32,
    #[serde(default = "default_max_duration_days")]
    pub max_duration_days: u32,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_sweep_interval_seconds: Option<u64>,
}

impl ListingsConfig {
    pub fn expiry_sweep_interval_seconds(&self) -> u64 {
        self.expiry_sweep_interval_seconds
            .unwrap_or_else(default_expiry_sweep_interval_seconds)
    }
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            default_duration_days: default_duration_days(),
            min_duration_days: default_min_duration_days(),
            max_duration_days: default_max_duration_days(),
            categories: default_categories(),
            expiry_sweep_interval_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountsConfig {
    /// Promoted to admin on provider login
    #[serde(default)]
    pub admin_emails: Vec<String>,
    /// Age assigned to accounts provisioned on first login
    #[serde(default = "default_age")]
    pub default_age: u32,
    #[serde(default = "default_age_of_majority")]
    pub age_of_majority: u32,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            admin_emails: Vec::new(),
            default_age: default_age(),
            age_of_majority: default_age_of_majority(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PreferencesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_history_limit: Option<usize>,
    /// JSON document for wishlists and search history. In-memory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
}

impl PreferencesConfig {
    pub fn search_history_limit(&self) -> usize {
        self.search_history_limit
            .unwrap_or_else(default_search_history_limit)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssistantConfig {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl AssistantConfig {
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
            .unwrap_or_else(default_assistant_timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// pretty, json or compact
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MonitoringConfig {
    /// Prometheus exporter port. No exporter when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketplaceConfig {
    pub marketplace: MarketplaceInfo,
    #[serde(default)]
    pub fees: FeesConfig,
    #[serde(default)]
    pub auction: AuctionConfig,
    #[serde(default)]
    pub listings: ListingsConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant: Option<AssistantConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}
