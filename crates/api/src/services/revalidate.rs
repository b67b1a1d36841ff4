//! Cache invalidation for pages rendered by the front end.
//!
//! After a mutation that changes what a page shows, the API tells the front end
//! to treat that path's cached render as stale. The signal is fire-and-forget:
//! failures are logged and never fail the mutation that triggered them.

use async_trait::async_trait;
use serde::Serialize;

/// Header carrying the shared secret expected by the revalidation endpoint.
pub const SECRET_HEADER: &str = "x-revalidate-secret";

/// Marks a rendered path as stale.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PathRevalidator: Send + Sync {
    async fn revalidate(&self, path: &str);
}

#[derive(Serialize)]
struct RevalidateRequest<'a> {
    path: &'a str,
}

/// Posts `{"path": ...}` to the front end's revalidation endpoint.
pub struct HttpRevalidator {
    http: reqwest::Client,
    url: String,
    secret: Option<String>,
}

impl HttpRevalidator {
    pub fn new(url: impl Into<String>, secret: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            secret,
        }
    }
}

#[async_trait]
impl PathRevalidator for HttpRevalidator {
    async fn revalidate(&self, path: &str) {
        let mut request = self.http.post(&self.url).json(&RevalidateRequest { path });
        if let Some(secret) = &self.secret {
            request = request.header(SECRET_HEADER, secret);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(path = %path, "path revalidated");
            }
            Ok(response) => {
                tracing::warn!(
                    path = %path,
                    status = %response.status(),
                    "revalidation rejected by front end"
                );
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "revalidation request failed");
            }
        }
    }
}

/// Used when no revalidation endpoint is configured: only logs the signal.
pub struct LogRevalidator;

#[async_trait]
impl PathRevalidator for LogRevalidator {
    async fn revalidate(&self, path: &str) {
        tracing::debug!(path = %path, "revalidation skipped, no endpoint configured");
    }
}
