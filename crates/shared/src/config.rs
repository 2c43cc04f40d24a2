//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Outgoing email configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Document store configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expiry_secs: default_access_token_expiry(),
            refresh_token_expiry_secs: default_refresh_token_expiry(),
        }
    }
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    604_800 // 7 days
}

/// SMTP configuration for transactional email.
///
/// With `enabled = false` messages are written to the log instead of sent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Whether to deliver mail over SMTP.
    pub enabled: bool,
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP port.
    pub smtp_port: u16,
    /// SMTP username.
    pub smtp_username: String,
    /// SMTP password.
    pub smtp_password: String,
    /// Sender address.
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
    /// Base URL of the web client, used to build links.
    pub frontend_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@spendwise.local".to_string(),
            from_name: "Spendwise".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot loaded on startup and written on shutdown.
    ///
    /// When unset the store lives purely in memory.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
    /// Seconds between background snapshots while running. 0 disables them.
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            snapshot_interval_secs: default_snapshot_interval(),
        }
    }
}

fn default_snapshot_interval() -> u64 {
    300 // 5 minutes
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SPENDWISE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
