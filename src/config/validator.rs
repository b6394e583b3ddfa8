use std::time::Duration;

use crate::error::{AppError, Result};

use super::ApiConfig;

const MAX_REQUEST_DELAY: Duration = Duration::from_secs(60);

/// Validate the API configuration and surface every problem at once.
pub fn validate_api_config(config: &ApiConfig) -> Result<()> {
    let mut issues = Vec::new();

    validate_endpoint(&config.endpoint, &mut issues);

    if config.authorization.trim().is_empty() {
        issues.push("authorization must not be empty".to_string());
    }
    if !config.request_title.contains("{year}") {
        issues.push("title must contain the `{year}` placeholder".to_string());
    }
    if config.request_delay > MAX_REQUEST_DELAY {
        issues.push(format!(
            "delay of {}ms exceeds the {}s ceiling",
            config.request_delay.as_millis(),
            MAX_REQUEST_DELAY.as_secs()
        ));
    }
    if config.timeout.is_zero() {
        issues.push("timeout must be greater than zero".to_string());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "API config invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_endpoint(endpoint: &str, issues: &mut Vec<String>) {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        issues.push("endpoint must not be empty".to_string());
    } else if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        issues.push(format!("endpoint `{trimmed}` must use http or https"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_builtin() {
        validate_api_config(&ApiConfig::builtin()).expect("builtin config should be valid");
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let mut config = ApiConfig::builtin();
        config.endpoint = "ftp://example.org".to_string();

        let err = validate_api_config(&config).expect_err("validation should fail");
        assert!(
            err.to_string().contains("http or https"),
            "unexpected error message: {err}"
        );
    }

    #[test]
    fn aggregates_multiple_issues() {
        let config = ApiConfig {
            endpoint: String::new(),
            authorization: "  ".to_string(),
            request_title: "Consulta".to_string(),
            request_delay: Duration::from_secs(120),
            timeout: Duration::ZERO,
        };

        let msg = validate_api_config(&config)
            .expect_err("validation should fail")
            .to_string();
        for needle in [
            "endpoint must not be empty",
            "authorization",
            "{year}",
            "ceiling",
            "timeout",
        ] {
            assert!(msg.contains(needle), "missing `{needle}` in: {msg}");
        }
    }
}
