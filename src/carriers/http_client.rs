//! Rate-limited HTTP client for carrier APIs
//!
//! Wraps `reqwest` with a per-carrier request quota so that a burst of
//! concurrent rate-shopping calls never exceeds the carrier's published
//! limit. Retries are deliberately absent here: the orchestrator decides
//! what to retry, and label creation is never retried.

use governor::{clock::DefaultClock, middleware::NoOpMiddleware, state::NotKeyed, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use super::traits::{CarrierError, CarrierResult};

/// Rate-limited HTTP client for carrier requests
pub struct RateLimitedClient {
    /// Inner HTTP client
    client: Client,

    /// Rate limiter (requests per minute)
    limiter: RateLimiter<NotKeyed, governor::state::InMemoryState, DefaultClock, NoOpMiddleware>,

    /// Configured rate limit
    rate_limit_per_minute: u32,

    /// Remaining requests (from API response headers)
    remaining_requests: AtomicU32,
}

impl RateLimitedClient {
    /// Create a new rate-limited client
    ///
    /// # Arguments
    /// * `rate_limit_per_minute` - Maximum requests allowed per minute
    /// * `timeout` - Per-request timeout
    pub fn new(rate_limit_per_minute: u32, timeout: Duration) -> CarrierResult<Self> {
        let rate = NonZeroU32::new(rate_limit_per_minute).unwrap_or(nonzero!(1u32));
        let limiter = RateLimiter::direct(Quota::per_minute(rate));

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("ship-engine/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CarrierError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(RateLimitedClient {
            client,
            limiter,
            rate_limit_per_minute: rate.get(),
            remaining_requests: AtomicU32::new(rate.get()),
        })
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }

    /// Get remaining requests in current rate limit window
    pub fn remaining_requests(&self) -> Option<u32> {
        let remaining = self.remaining_requests.load(Ordering::Relaxed);
        if remaining > 0 {
            Some(remaining)
        } else {
            None
        }
    }

    /// Build a POST request
    pub fn post(&self, url: &str) -> RateLimitedRequestBuilder<'_> {
        RateLimitedRequestBuilder {
            client: self,
            builder: self.client.post(url),
        }
    }

    /// Wait for a rate limit permit and execute the request
    async fn execute(&self, builder: RequestBuilder) -> CarrierResult<Response> {
        self.limiter.until_ready().await;

        debug!("Executing rate-limited carrier request");

        let response = builder.send().await?;

        if let Some(remaining) = response
            .headers()
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
        {
            self.remaining_requests.store(remaining, Ordering::Relaxed);
        }

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            warn!(retry_after_secs = retry_after, "Rate limited by carrier");

            return Err(CarrierError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        Ok(response)
    }
}

/// Request builder wrapper that enforces rate limiting
pub struct RateLimitedRequestBuilder<'a> {
    client: &'a RateLimitedClient,
    builder: RequestBuilder,
}

impl<'a> RateLimitedRequestBuilder<'a> {
    /// Add a header to the request
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Add JSON body to the request
    pub fn json<T: serde::Serialize + ?Sized>(mut self, json: &T) -> Self {
        self.builder = self.builder.json(json);
        self
    }

    /// Add a bearer token header
    pub fn bearer_auth(mut self, token: &str) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Send the request (waits for rate limit)
    pub async fn send(self) -> CarrierResult<Response> {
        self.client.execute(self.builder).await
    }
}
