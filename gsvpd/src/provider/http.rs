//! HTTP client abstraction for testability

use super::types::ProviderError;
use crate::pipeline::ConcurrencyLimiter;
use dashmap::DashMap;
use reqwest::header::CONTENT_LENGTH;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Status, declared length and body of an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Value of the `Content-Length` header, if present and numeric
    pub content_length: Option<u64>,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true for 2xx status codes.
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// Any status code is a successful call; only transport failures are
    /// reported as errors.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, ProviderError>> + Send;
}

/// Default User-Agent string for HTTP requests.
/// Required by tile servers that reject requests without a User-Agent.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Async HTTP client implementation using reqwest.
///
/// The client is the batch's shared connection pool. Besides reqwest's own
/// pooling, it caps the number of connections in use globally and per
/// destination host.
pub struct AsyncReqwestClient {
    client: reqwest::Client,
    /// Global in-use connection cap
    connections: ConcurrencyLimiter,
    /// Per-host in-use connection caps, created on first use
    host_connections: DashMap<String, Arc<ConcurrencyLimiter>>,
    max_connections_per_host: usize,
}

impl AsyncReqwestClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Per-request timeout, counted from the moment the request
    ///   holds its connection slots
    /// * `max_connections` - Connections in use across all hosts
    /// * `max_connections_per_host` - Connections in use towards one host
    pub fn new(
        timeout: Duration,
        max_connections: usize,
        max_connections_per_host: usize,
    ) -> Result<Self, ProviderError> {
        if max_connections == 0 || max_connections_per_host == 0 {
            return Err(ProviderError::HttpError(
                "connection limits must be > 0".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            // Keep as many idle connections as we are allowed to use
            .pool_max_idle_per_host(max_connections_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create async HTTP client: {}", e))
            })?;

        debug!(
            max_connections,
            max_connections_per_host, "HTTP connection pool created"
        );

        Ok(Self {
            client,
            connections: ConcurrencyLimiter::new("connections", max_connections),
            host_connections: DashMap::new(),
            max_connections_per_host,
        })
    }

    fn host_limiter(&self, url: &str) -> Arc<ConcurrencyLimiter> {
        let host = reqwest::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();

        self.host_connections
            .entry(host)
            .or_insert_with(|| {
                Arc::new(ConcurrencyLimiter::new(
                    "host-connections",
                    self.max_connections_per_host,
                ))
            })
            .clone()
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, ProviderError> {
        let host_limiter = self.host_limiter(url);
        let _connection = self.connections.acquire().await;
        let _host_connection = host_limiter.acquire().await;

        // reqwest's timeout starts at send(), so queueing for a slot above
        // never eats into the request's deadline.

        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(ProviderError::HttpError(format!("Request failed: {}", e)));
            }
        };

        let status = response.status().as_u16();
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, status, bytes = bytes.len(), "HTTP response body read");
                Ok(HttpResponse {
                    status,
                    content_length,
                    body: bytes.to_vec(),
                })
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(ProviderError::HttpError(format!(
                    "Failed to read response: {}",
                    e
                )))
            }
        }
    }
}
