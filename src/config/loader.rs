use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::{Context, Result};

use super::{validator, ApiConfig};

/// Partial overrides read from a JSON file; absent keys keep the builtin values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawApiConfig {
    endpoint: Option<String>,
    authorization: Option<String>,
    title: Option<String>,
    delay_ms: Option<u64>,
    timeout_secs: Option<u64>,
}

impl RawApiConfig {
    fn apply(self, mut config: ApiConfig) -> ApiConfig {
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(authorization) = self.authorization {
            config.authorization = authorization;
        }
        if let Some(title) = self.title {
            config.request_title = title;
        }
        if let Some(delay) = self.delay_ms {
            config.request_delay = Duration::from_millis(delay);
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout = Duration::from_secs(timeout);
        }
        config
    }
}

/// Resolve the API configuration: builtin defaults, optionally overridden by a JSON file.
pub fn load_api_config(path: Option<&Path>) -> Result<ApiConfig> {
    let config = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read API config JSON at {}", path.display()))?;
            parse_api_config(&json)
                .with_context(|| format!("failed to load API config at {}", path.display()))?
        }
        None => ApiConfig::builtin(),
    };

    validator::validate_api_config(&config)?;
    Ok(config)
}

fn parse_api_config(json: &str) -> anyhow::Result<ApiConfig> {
    let raw: RawApiConfig = serde_json::from_str(json)?;
    Ok(raw.apply(ApiConfig::builtin()))
}
