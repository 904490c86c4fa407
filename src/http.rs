//! HTTP collaborator: a single async GET with a timeout.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

const USER_AGENT: &str = concat!("Terraport/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub timeout: Duration,
}

/// Completion of one request. `succeeded == false` covers transport errors,
/// timeouts and non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HttpResult {
    pub succeeded: bool,
    pub data: String,
    pub error: Option<String>,
}

impl HttpResult {
    pub fn ok(data: impl Into<String>) -> Self {
        Self { succeeded: true, data: data.into(), error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { succeeded: false, data: String::new(), error: Some(error.into()) }
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn fetch(&self, request: HttpRequest) -> HttpResult;
}

/// `ureq`-backed client; each request runs on the blocking pool.
#[derive(Debug, Clone, Default)]
pub struct UreqHttp;

impl UreqHttp {
    fn get_blocking(request: &HttpRequest) -> HttpResult {
        let response = match ureq::get(&request.url)
            .set("User-Agent", USER_AGENT)
            .timeout(request.timeout)
            .call()
        {
            Ok(r) => r,
            Err(ureq::Error::Status(code, _)) => {
                return HttpResult::failed(format!("HTTP status {}", code));
            }
            Err(e) => return HttpResult::failed(e.to_string()),
        };

        match response.into_string() {
            Ok(body) => HttpResult::ok(body),
            Err(e) => HttpResult::failed(e.to_string()),
        }
    }
}

#[async_trait]
impl HttpClient for UreqHttp {
    async fn fetch(&self, request: HttpRequest) -> HttpResult {
        debug!(url = %request.url, "http get");
        let outcome = tokio::task::spawn_blocking(move || Self::get_blocking(&request)).await;
        outcome.unwrap_or_else(|e| HttpResult::failed(format!("request task failed: {}", e)))
    }
}
