//! HTTP transport seam.
//!
//! Executors build `HttpRequest` values and hand them to an `HttpTransport`.
//! Status codes are interpreted by the executor, so a transport only reports
//! failures that prevented a response from arriving.
use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::errors::ClientError;

const USER_AGENT: &str = concat!("docstore-client/", env!("CARGO_PKG_VERSION"));
const CLIENT_VERSION: &str = "4.0.0.0";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request against one node.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Creates a request carrying the client's default headers.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: vec![
                ("User-Agent".into(), USER_AGENT.into()),
                ("Raven-Client-Version".into(), CLIENT_VERSION.into()),
                ("Accept".into(), "application/json".into()),
            ],
            body: None,
        }
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw status and body of a response.
#[derive(Clone, Debug, PartialEq, Eq)]
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

    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201 | 204)
    }
}

/// Sends one request and returns whatever status the server answered with.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// `HttpTransport` backed by a shared `reqwest::Client`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let mut http_req = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            http_req = http_req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            http_req = http_req.json(body);
        }

        debug!(method = %request.method, url = %request.url, "sending request");
        let response = http_req
            .send()
            .await
            .map_err(|e| ClientError::transport(&request.url, e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            ClientError::transport(&request.url, format!("failed to read response body: {e}"))
        })?;
        debug!(url = %request.url, status, "received response");
        Ok(HttpResponse { status, body })
    }
}
