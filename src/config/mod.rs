//! Configuration module for the Telnyx relay
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use telnyx_relay::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod validation;
mod yaml;

/// Default Telnyx Call Control API base URL
pub const DEFAULT_TELNYX_API_BASE_URL: &str = "https://api.telnyx.com/v2";

/// SIP URI that answered calls are transferred to unless configured otherwise
pub const DEFAULT_TRANSFER_DESTINATION: &str = "sip:usersiddharthmot80788.sip.telnyx.com";

/// Maximum accepted age of a signed webhook, in seconds
pub const DEFAULT_WEBHOOK_TOLERANCE_SECONDS: u64 = 300;

/// Server configuration
///
/// Read once at startup and shared read-only with every handler through
/// [`crate::state::AppState`]. Contains:
/// - Server settings (host, port)
/// - Telnyx credentials and call origination settings
/// - Webhook handling settings (transfer target, signature verification)
/// - Security settings (CORS)
#[derive(Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // Telnyx settings
    /// Bearer token attached to every upstream request
    pub telnyx_api_key: String,
    /// Caller ID used when originating calls
    pub telnyx_from_number: String,
    /// Call Control connection (SIP trunk) identifier
    pub telnyx_connection_id: String,
    /// Base URL of the Call Control API, without a trailing slash
    pub telnyx_api_base_url: String,
    /// Optional request timeout for upstream calls. None means no timeout.
    pub telnyx_timeout_seconds: Option<u64>,

    // Webhook settings
    /// Where `call.answered` events get transferred to
    pub transfer_destination: String,
    /// Base64 Ed25519 public key used to verify webhook signatures.
    /// When None, webhooks are accepted unsigned.
    pub webhook_public_key: Option<String>,
    pub webhook_tolerance_seconds: u64,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: "*"
    pub cors_allowed_origins: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("telnyx_api_key", &"<redacted>")
            .field("telnyx_from_number", &self.telnyx_from_number)
            .field("telnyx_connection_id", &self.telnyx_connection_id)
            .field("telnyx_api_base_url", &self.telnyx_api_base_url)
            .field("telnyx_timeout_seconds", &self.telnyx_timeout_seconds)
            .field("transfer_destination", &self.transfer_destination)
            .field("webhook_public_key", &self.webhook_public_key)
            .field("webhook_tolerance_seconds", &self.webhook_tolerance_seconds)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

/// Zeroize the API credential when ServerConfig is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        self.telnyx_api_key.zeroize();
    }
}

impl ServerConfig {
    /// Load configuration from environment variables only
    ///
    /// Missing variables fall back to defaults. The `.env` file, if any, is
    /// expected to have been loaded into the process environment already.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether inbound webhooks must carry a valid Ed25519 signature
    pub fn has_webhook_verification(&self) -> bool {
        self.webhook_public_key.is_some()
    }

    /// Whether an API credential has been configured at all
    pub fn has_api_key(&self) -> bool {
        !self.telnyx_api_key.trim().is_empty()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            telnyx_api_key: String::new(),
            telnyx_from_number: String::new(),
            telnyx_connection_id: String::new(),
            telnyx_api_base_url: DEFAULT_TELNYX_API_BASE_URL.to_string(),
            telnyx_timeout_seconds: None,
            transfer_destination: DEFAULT_TRANSFER_DESTINATION.to_string(),
            webhook_public_key: None,
            webhook_tolerance_seconds: DEFAULT_WEBHOOK_TOLERANCE_SECONDS,
            cors_allowed_origins: Some("*".to_string()),
        }
    }
}
