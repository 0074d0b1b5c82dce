//! Shared HTTP plumbing for the upstream clients.
//!
//! `UpstreamHttp` wraps a `reqwest::Client` with the per-call timeout and
//! retry policy from [`UpstreamConfig`]: transient failures (5xx status,
//! timeout, connection error) are retried with exponential back-off,
//! client errors (4xx) are permanent.

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder, Response};
use tc_domain::config::UpstreamConfig;
use tc_domain::error::{Error, Result};
use uuid::Uuid;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// UpstreamHttp
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Created once per service and reused for the process lifetime; the
/// underlying `reqwest::Client` maintains a connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamHttp {
    http: Client,
    service: &'static str,
    timeout: Duration,
    max_retries: u32,
}

impl UpstreamHttp {
    /// Build a client for the named upstream service from the shared
    /// `UpstreamConfig`.
    pub fn new(service: &'static str, cfg: &UpstreamConfig) -> Result<Self> {
        let timeout = Duration::from_millis(cfg.timeout_ms);
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            service,
            timeout,
            max_retries: cfg.max_retries,
        })
    }

    /// The configured per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Decorate a request with a fresh trace id for upstream correlation.
    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("X-Trace-Id", Uuid::new_v4().to_string())
    }

    /// GET `url` with retry + exponential back-off on transient errors.
    ///
    /// * Retries on 5xx status codes, timeouts and connection errors.
    /// * Does **not** retry on 4xx (client errors are permanent).
    pub async fn get_with_retry(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Response> {
        let mut last_err: Option<Error> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                tokio::time::sleep(backoff).await;
            }

            let start = Instant::now();
            let mut rb = self.http.get(url).query(query);
            for (name, value) in headers {
                rb = rb.header(*name, *value);
            }
            let result = self.decorate(rb).send().await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    tracing::debug!(
                        service = self.service,
                        status,
                        duration_ms,
                        "upstream call"
                    );

                    if resp.status().is_server_error() {
                        let body = resp.text().await.unwrap_or_default();
                        last_err = Some(Error::Upstream {
                            service: self.service.to_owned(),
                            message: format!("returned {status}: {body}"),
                        });
                        continue;
                    }

                    if resp.status().is_client_error() {
                        let body = resp.text().await.unwrap_or_default();
                        return Err(Error::Upstream {
                            service: self.service.to_owned(),
                            message: format!("returned {status}: {body}"),
                        });
                    }

                    return Ok(resp);
                }
                Err(e) => {
                    tracing::debug!(
                        service = self.service,
                        error = %e,
                        duration_ms,
                        "upstream call failed"
                    );
                    last_err = Some(from_reqwest(e));
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Upstream {
            service: self.service.to_owned(),
            message: "all retries exhausted".into(),
        }))
    }

    /// GET `url` and deserialize the JSON body.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<T> {
        let resp = self.get_with_retry(url, query, headers).await?;
        let body = resp.text().await.map_err(from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| Error::Upstream {
            service: self.service.to_owned(),
            message: format!("failed to parse response: {e}: {body}"),
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error conversion helper
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Http`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}
