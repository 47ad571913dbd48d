use super::ServerConfig;
use super::env::EnvConfig;
use super::yaml::YamlConfig;

/// Build the final configuration from environment variables, YAML overrides
/// and defaults, in that order of increasing precedence for YAML.
pub(crate) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let env = EnvConfig::load()?;
    let yaml = yaml.unwrap_or_default();

    let server = yaml.server.unwrap_or_default();
    let telnyx = yaml.telnyx.unwrap_or_default();
    let webhook = yaml.webhook.unwrap_or_default();
    let security = yaml.security.unwrap_or_default();

    let mut config = ServerConfig::default();

    if let Some(host) = server.host.or(env.host) {
        config.host = host;
    }
    if let Some(port) = server.port.or(env.port) {
        config.port = port;
    }

    if let Some(api_key) = telnyx.api_key.or(env.telnyx_api_key) {
        config.telnyx_api_key = api_key;
    }
    if let Some(from_number) = telnyx.from_number.or(env.telnyx_from_number) {
        config.telnyx_from_number = from_number;
    }
    if let Some(connection_id) = telnyx.connection_id.or(env.telnyx_connection_id) {
        config.telnyx_connection_id = connection_id;
    }
    if let Some(base_url) = telnyx.api_base_url.or(env.telnyx_api_base_url) {
        config.telnyx_api_base_url = base_url.trim_end_matches('/').to_string();
    }
    config.telnyx_timeout_seconds = telnyx.timeout_seconds.or(env.telnyx_timeout_seconds);

    if let Some(destination) = webhook
        .transfer_destination
        .or(env.transfer_destination)
    {
        config.transfer_destination = destination;
    }
    config.webhook_public_key = webhook.public_key.or(env.webhook_public_key);
    if let Some(tolerance) = webhook.tolerance_seconds.or(env.webhook_tolerance_seconds) {
        config.webhook_tolerance_seconds = tolerance;
    }

    if let Some(origins) = security.cors_allowed_origins.or(env.cors_allowed_origins) {
        config.cors_allowed_origins = Some(origins);
    }

    Ok(config)
}
