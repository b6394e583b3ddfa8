use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::{AppError, Context};
use crate::query::{requested_columns, QueryParams};

use super::{FetchResult, PreparedRequest};

const LIKE_OPERATOR: &str = "like";

/// JSON body accepted by the `credito` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CreditRequest {
    pub title: String,
    pub ejercicios: Vec<i32>,
    pub columns: Vec<&'static str>,
    pub filters: Vec<FilterClause>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterClause {
    pub column: &'static str,
    pub operator: &'static str,
    pub value: String,
}

/// Build the single-year request for `year`, filtering `params.column` with a server-side `like`.
pub fn build_payload(config: &ApiConfig, params: &QueryParams, year: i32) -> CreditRequest {
    CreditRequest {
        title: config.title_for(year),
        ejercicios: vec![year],
        columns: requested_columns(),
        filters: vec![FilterClause {
            column: params.column.as_str(),
            operator: LIKE_OPERATOR,
            value: params.value.clone(),
        }],
    }
}

pub fn prepare_request(
    config: &ApiConfig,
    headers: &HeaderMap,
    payload: &CreditRequest,
) -> FetchResult<PreparedRequest> {
    let body = serde_json::to_string(payload)?;
    Ok(PreparedRequest {
        url: config.endpoint.clone(),
        headers: headers.clone(),
        body,
    })
}

/// Static headers shared by every request of a run.
pub fn prepare_headers(config: &ApiConfig) -> FetchResult<HeaderMap> {
    let token = expand_env_vars(&config.authorization)?;

    let mut map = HeaderMap::new();
    let mut value = HeaderValue::from_str(token.trim())
        .context("Invalid value for the Authorization header")?;
    value.set_sensitive(true);
    map.insert(AUTHORIZATION, value);
    map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(map)
}

pub fn expand_env_vars(value: &str) -> FetchResult<String> {
    expand_placeholders(value, |name| std::env::var(name).ok())
}

/// Replace every `${NAME}` in `value` using `lookup`.
pub fn expand_placeholders<F>(value: &str, lookup: F) -> FetchResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut name = String::new();
            let mut closed = false;
            for next in chars.by_ref() {
                if next == '}' {
                    closed = true;
                    break;
                }
                name.push(next);
            }

            if !closed {
                return Err(AppError::message(
                    "Unterminated environment placeholder in authorization",
                ));
            }

            if name.is_empty() {
                return Err(AppError::message(
                    "Encountered empty environment placeholder in authorization",
                ));
            }

            let value = lookup(&name).ok_or_else(|| {
                AppError::message(format!(
                    "Environment variable {} required by the Authorization header is not set",
                    name
                ))
            })?;
            result.push_str(&value);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}
