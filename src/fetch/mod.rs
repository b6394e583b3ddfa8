use reqwest::header::HeaderMap;

use crate::error::Result;

pub mod client;
pub mod decode;
pub mod request;

pub use client::HttpTransport;
pub use decode::decode_csv;
pub use request::{build_payload, prepare_headers, CreditRequest, FilterClause};

pub type FetchResult<T> = Result<T>;

/// A fully-built POST ready to be handed to a [`Transport`].
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: String,
}

/// Status and body of a completed exchange. Non-success statuses are not errors at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Seam between the pipeline and the network so runs can be scripted in tests.
pub trait Transport {
    fn post(&self, request: &PreparedRequest) -> FetchResult<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, request: &PreparedRequest) -> FetchResult<HttpResponse> {
        (**self).post(request)
    }
}
