use log::debug;
use reqwest::blocking::Client;

use crate::config::ApiConfig;
use crate::error::{Context, Result};

use super::{FetchResult, HttpResponse, PreparedRequest, Transport};

/// Blocking reqwest transport; one request in flight at a time.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to construct blocking HTTP client")?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, request: &PreparedRequest) -> FetchResult<HttpResponse> {
        debug!(
            "POST {} ({} byte payload)",
            request.url,
            request.body.len()
        );

        let response = self
            .client
            .post(&request.url)
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}
