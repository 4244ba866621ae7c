pub mod bank_api;
pub mod mock;
pub mod util;

use crate::core::BankingGateway;
use crate::core::config::{AppConfig, Backend, TOKEN_ENV_VAR};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Builds the configured backend. `force_mock` overrides the config.
pub fn build_gateway(config: &AppConfig, force_mock: bool) -> Result<Arc<dyn BankingGateway>> {
    build_gateway_with_token(config, force_mock, config.api_token())
}

fn build_gateway_with_token(
    config: &AppConfig,
    force_mock: bool,
    token: Option<String>,
) -> Result<Arc<dyn BankingGateway>> {
    let backend = if force_mock { Backend::Mock } else { config.backend };
    debug!(?backend, "Selecting banking backend");

    match backend {
        Backend::Mock => Ok(Arc::new(mock::MockBankingGateway::new(config.mock.seed))),
        Backend::Live => {
            let token = token.with_context(|| {
                format!("The live backend needs an API token: set {TOKEN_ENV_VAR} or api.token")
            })?;
            let gateway = bank_api::BankApiGateway::new(&config.api.base_url, &token)
                .context("Failed to create bank API client")?;
            Ok(Arc::new(gateway))
        }
    }
}
