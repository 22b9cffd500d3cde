use anyhow::Result;
use regex::Regex;
use std::env;
use tracing::{debug, warn};

const PLACEHOLDER: &str = r"\$\{(\w+)\}";

/// Substitute environment variables written as `${VAR_NAME}`
///
/// Unset variables keep their placeholder; the validator reports them.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(PLACEHOLDER)?;
    let mut missing_vars = Vec::new();

    let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
        let var_name = &caps[1];
        match env::var(var_name) {
            Ok(value) => {
                debug!(var = var_name, "Substituting environment variable");
                value
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
                missing_vars.push(var_name.to_string());
                caps[0].to_string()
            }
        }
    });

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (may fail validation): {:?}",
            missing_vars
        );
    }

    Ok(result.into_owned())
}

/// Names of `${VAR}` placeholders still present in `content`
pub fn unresolved_env_vars(content: &str) -> Vec<String> {
    match Regex::new(PLACEHOLDER) {
        Ok(re) => re
            .captures_iter(content)
            .map(|caps| caps[1].to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}

pub fn has_unresolved_env_vars(content: &str) -> bool {
    !unresolved_env_vars(content).is_empty()
}
