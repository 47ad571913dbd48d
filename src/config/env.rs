use std::env;
use std::str::FromStr;

/// Values read from the process environment
///
/// Every field is optional; unset variables fall through to YAML values or
/// defaults in [`super::merge`].
#[derive(Debug, Clone, Default)]
pub(crate) struct EnvConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub telnyx_api_key: Option<String>,
    pub telnyx_from_number: Option<String>,
    pub telnyx_connection_id: Option<String>,
    pub telnyx_api_base_url: Option<String>,
    pub telnyx_timeout_seconds: Option<u64>,
    pub transfer_destination: Option<String>,
    pub webhook_public_key: Option<String>,
    pub webhook_tolerance_seconds: Option<u64>,
    pub cors_allowed_origins: Option<String>,
}

impl EnvConfig {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            host: env_string("HOST"),
            port: env_parse("PORT")?,
            telnyx_api_key: env_string("TELNYX_API_KEY"),
            telnyx_from_number: env_string("TELNYX_FROM_NUMBER"),
            telnyx_connection_id: env_string("TELNYX_CONNECTION_ID"),
            telnyx_api_base_url: env_string("TELNYX_API_BASE_URL"),
            telnyx_timeout_seconds: env_parse("TELNYX_TIMEOUT_SECONDS")?,
            transfer_destination: env_string("TRANSFER_DESTINATION"),
            webhook_public_key: env_string("TELNYX_PUBLIC_KEY"),
            webhook_tolerance_seconds: env_parse("WEBHOOK_TOLERANCE_SECONDS")?,
            cors_allowed_origins: env_string("CORS_ALLOWED_ORIGINS"),
        })
    }
}

/// Read a variable, treating empty values as unset
fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>, Box<dyn std::error::Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_string(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Invalid value for {key} ('{raw}'): {e}").into()),
        None => Ok(None),
    }
}
