use base64::{Engine as _, engine::general_purpose::STANDARD};
use url::Url;

use super::ServerConfig;

pub(crate) fn validate_config(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    validate_api_base_url(&config.telnyx_api_base_url)?;
    validate_transfer_destination(&config.transfer_destination)?;
    if let Some(key) = &config.webhook_public_key {
        validate_public_key(key)?;
    }
    Ok(())
}

pub(crate) fn validate_api_base_url(base_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = Url::parse(base_url)
        .map_err(|e| format!("Invalid TELNYX_API_BASE_URL '{base_url}': {e}"))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!(
            "TELNYX_API_BASE_URL must use http or https, got scheme '{other}'"
        )
        .into()),
    }
}

pub(crate) fn validate_transfer_destination(
    destination: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if destination.trim().is_empty() {
        return Err("TRANSFER_DESTINATION cannot be empty".into());
    }
    Ok(())
}

/// The webhook key must be a base64-encoded 32 byte Ed25519 public key
pub(crate) fn validate_public_key(key: &str) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = STANDARD
        .decode(key.trim())
        .map_err(|e| format!("Invalid webhook public key: not valid base64 ({e})"))?;

    if bytes.len() != 32 {
        return Err(format!(
            "Invalid webhook public key: expected 32 bytes, got {}",
            bytes.len()
        )
        .into());
    }
    Ok(())
}
