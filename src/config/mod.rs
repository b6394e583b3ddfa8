use std::time::Duration;

pub mod loader;
pub mod validator;

pub use loader::load_api_config;
pub use validator::validate_api_config;

pub const DEFAULT_ENDPOINT: &str =
    "https://www.presupuestoabierto.gob.ar/api/v1/credito?format=csv";
pub const TOKEN_ENV_VAR: &str = "PRESUPUESTO_ABIERTO_TOKEN";
pub const DEFAULT_TITLE: &str = "Consulta año {year}";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable settings for talking to the budget API. Built once and lent to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub endpoint: String,
    /// Value sent verbatim as the `Authorization` header; `${NAME}` placeholders are expanded.
    pub authorization: String,
    /// Request title template; `{year}` is replaced with the queried year.
    pub request_title: String,
    /// Pause after every per-year request.
    pub request_delay: Duration,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn builtin() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            authorization: format!("${{{TOKEN_ENV_VAR}}}"),
            request_title: DEFAULT_TITLE.to_string(),
            request_delay: DEFAULT_REQUEST_DELAY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn title_for(&self, year: i32) -> String {
        self.request_title.replace("{year}", &year.to_string())
    }
}
