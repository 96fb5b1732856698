use crate::config::settings::{LogFormat, LoggingConfig, ServiceConfig};
use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

/// Load and validate config from YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig> {
    let raw = fs::read_to_string(path)?;
    let mut config: ServiceConfig = serde_yaml::from_str(&raw)?;

    // Apply defaults
    if config.settings.logging.is_none() {
        config.settings.logging = Some(LoggingConfig::new("info".into(), LogFormat::Compact));
    }

    // Validate provider endpoints
    if config.provider.api_key.trim().is_empty() {
        bail!("provider.api_key must not be empty");
    }
    for (name, url) in [
        ("provider.account_url", &config.provider.account_url),
        ("provider.token_url", &config.provider.token_url),
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("{} must be an http(s) URL, got '{}'", name, url);
        }
        if url.ends_with('/') {
            bail!("{} must not have a trailing slash", name);
        }
    }

    if let Some(bootstrap) = &config.provider.bootstrap {
        if bootstrap.refresh_token.trim().is_empty() {
            bail!("provider.bootstrap.refresh_token must not be empty");
        }
    }

    Ok(config)
}
