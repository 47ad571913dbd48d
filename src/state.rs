use std::sync::Arc;

use anyhow::Context;
use tracing::warn;

use crate::config::ServerConfig;
use crate::telnyx::{TelnyxClient, WebhookVerifier};

/// Shared, read-only application state
///
/// Built once at startup and handed to every handler as `State<Arc<AppState>>`.
/// Nothing in here is mutated after construction.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub telnyx: TelnyxClient,
    /// Present only when a webhook public key is configured
    pub webhook_verifier: Option<WebhookVerifier>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> anyhow::Result<Arc<Self>> {
        let telnyx = TelnyxClient::new(&config).context("Failed to build Telnyx client")?;

        let webhook_verifier = if config.has_webhook_verification() {
            let key = config.webhook_public_key.as_deref().unwrap_or_default();
            Some(
                WebhookVerifier::from_base64(key, config.webhook_tolerance_seconds)
                    .context("Failed to load webhook public key")?,
            )
        } else {
            warn!("TELNYX_PUBLIC_KEY not configured, webhook signatures will not be verified");
            None
        };

        Ok(Arc::new(Self {
            config,
            telnyx,
            webhook_verifier,
        }))
    }
}
