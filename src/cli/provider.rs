use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, EndpointMode};
use crate::core::{ChatBackend, ChatError, Result};
use crate::providers::http::AuthStrategy;
use crate::providers::{ApiKey, ClientConfig, Endpoint, ProxyClient};

use super::Cli;

/// Resolves flags over config file over environment into a client config.
/// Flags win.
pub fn client_config_for_cli(cli: &Cli, config: &AppConfig) -> Result<ClientConfig> {
    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| config.endpoint.clone())
        .ok_or_else(|| {
            ChatError::Config(
                "No endpoint configured. Use --endpoint, set STUDYMATE_ENDPOINT, \
                 or run `studymate config init`"
                    .to_string(),
            )
        })?;
    let endpoint = Endpoint::parse(endpoint)?;

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| config.api_key.clone())
        .filter(|k| !k.trim().is_empty())
        .map(ApiKey::new);

    let mode = if cli.gateway {
        EndpointMode::Gateway
    } else {
        config.mode()
    };
    if mode == EndpointMode::Proxy {
        return Ok(ClientConfig::proxy(endpoint).with_auth(AuthStrategy::from_optional_key(api_key)));
    }

    let api_key = api_key.ok_or_else(|| {
        ChatError::Config("Gateway mode needs an API key (--api-key or STUDYMATE_API_KEY)".into())
    })?;
    let mut client = ClientConfig::gateway(endpoint, api_key);
    if let Some(model) = cli.model.as_ref().or(config.model.as_ref()) {
        client = client.with_model(model.clone());
    }
    Ok(client)
}

pub fn create_backend(cli: &Cli, config: &AppConfig) -> Result<Arc<dyn ChatBackend>> {
    let client_config = client_config_for_cli(cli, config)?;

    let mut http = config.http_config();
    if let Some(secs) = cli.timeout.filter(|s| *s > 0) {
        http = http.with_timeout(Duration::from_secs(secs));
    }

    let client = ProxyClient::with_http_config(client_config, http)?;
    tracing::debug!(?client, "Created chat backend");
    Ok(Arc::new(client))
}
