use serde::Deserialize;

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub provider: ProviderConfig,
    pub settings: SettingsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    pub metrics: MetricsConfig,
    pub server: ServerConfig,
    pub logging: Option<LoggingConfig>,
    /// Fixed offset of the countdown display, minutes east of UTC.
    /// Defaults to UTC when absent.
    pub countdown_utc_offset_minutes: Option<i32>,
}

/// ================================
/// Identity provider
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Account-management endpoint base, no trailing slash
    pub account_url: String,
    /// Token mint endpoint base, no trailing slash
    pub token_url: String,
    pub api_key: String,
    /// Session handed to the agent at startup. Sign-in itself is owned by the
    /// provider; the agent only needs the resulting refresh token.
    pub bootstrap: Option<BootstrapSession>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapSession {
    pub email: String,
    pub refresh_token: String,
    pub full_name: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: String,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}
