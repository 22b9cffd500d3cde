use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MarketplaceConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    let config = parse_config(&content)?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Substitute environment variables, then parse YAML
pub fn parse_config(content: &str) -> Result<MarketplaceConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    serde_yaml::from_str(&substituted).with_context(|| "Failed to parse YAML configuration")
}

#[instrument]
pub fn generate_default_config() -> MarketplaceConfig {
    MarketplaceConfig {
        marketplace: MarketplaceInfo {
            name: "ClosetSwap".to_string(),
            description: "A second-hand clothing marketplace".to_string(),
            version: "1.0.0".to_string(),
        },
        fees: FeesConfig::default(),
        auction: AuctionConfig::default(),
        listings: ListingsConfig::default(),
        accounts: AccountsConfig {
            admin_emails: vec!["admin@closetswap.test".to_string()],
            ..AccountsConfig::default()
        },
        preferences: PreferencesConfig::default(),
        assistant: None,
        logging: LoggingConfig::default(),
        monitoring: MonitoringConfig::default(),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(
    config: &MarketplaceConfig,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml).with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let yaml = r#"
marketplace:
  name: ClosetSwap
  description: Pre-loved fashion
  version: 1.2.0
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.fees.rate, 0.10);
        assert_eq!(config.auction.bid_increment, 1.0);
        assert_eq!(config.listings.default_duration_days, 90);
        assert_eq!(config.listings.categories.len(), 7);
        assert_eq!(config.listings.expiry_sweep_interval_seconds(), 60);
        assert_eq!(config.preferences.search_history_limit(), 5);
        assert_eq!(config.accounts.age_of_majority, 18);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.assistant.is_none());
        assert!(config.monitoring.metrics_port.is_none());
    }

    #[test]
    fn test_overrides_are_read() {
        let yaml = r#"
marketplace:
  name: ClosetSwap
  description: Pre-loved fashion
  version: 1.2.0
fees:
  rate: 0.05
auction:
  bid_increment: 0.5
assistant:
  endpoint: https://assistant.closetswap.test
  timeout_seconds: 3
monitoring:
  metrics_port: 9100
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.fees.rate, 0.05);
        assert_eq!(config.auction.bid_increment, 0.5);
        let assistant = config.assistant.unwrap();
        assert_eq!(assistant.timeout_seconds(), 3);
        assert!(assistant.api_key.is_none());
        assert_eq!(config.monitoring.metrics_port, Some(9100));
    }

    #[test]
    fn test_missing_marketplace_section_fails() {
        assert!(parse_config("fees:\n  rate: 0.1\n").is_err());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "closetswap-config-{}.yaml",
            uuid::Uuid::new_v4().simple()
        ));
        let config = generate_default_config();
        save_config(&config, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.marketplace.name, "ClosetSwap");
        assert_eq!(loaded.accounts.admin_emails, config.accounts.admin_emails);
        assert!(validate_config(&loaded).is_valid());

        std::fs::remove_file(&path).unwrap();
    }
}
