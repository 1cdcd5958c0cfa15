use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default request budget, matching what the booking site tolerates.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 100;

/// Capability interface for retrieving a page as text.
///
/// Site adapters take this instead of a concrete client so tests can feed
/// them canned HTML.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fixed per-minute request budget, shared by every fetch issued through one
/// fetcher. Explicit and injectable — never process-global state.
pub struct RateLimiter {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn per_minute(requests: u32) -> Self {
        let requests = requests.max(1);
        Self {
            interval: Duration::from_secs_f64(60.0 / f64::from(requests)),
            last_request: Mutex::new(None),
        }
    }

    /// Minimum spacing between consecutive requests.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the inter-request interval has elapsed since the previous
    /// acquisition, then claim the current instant.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let ready_at = prev + self.interval;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// HTTP fetcher over reqwest, throttled by a [`RateLimiter`].
pub struct HttpFetcher {
    client: reqwest::Client,
    limiter: RateLimiter,
}

impl HttpFetcher {
    pub fn new(limiter: RateLimiter) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("vacancy/0.1 (studio availability tool)")
            .build()?;
        Ok(Self { client, limiter })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.limiter.acquire().await;
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch page")?;

        let status = response.status();
        anyhow::ensure!(status.is_success(), "HTTP {status} for {url}");

        response.text().await.context("Failed to read response body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_budget() {
        assert_eq!(
            RateLimiter::per_minute(100).interval(),
            Duration::from_millis(600)
        );
        assert_eq!(RateLimiter::per_minute(60).interval(), Duration::from_secs(1));
        // A zero budget is clamped rather than dividing by zero.
        assert_eq!(RateLimiter::per_minute(0).interval(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_first_acquire_does_not_wait() {
        let limiter = RateLimiter::per_minute(1);
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
