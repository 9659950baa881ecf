use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{PageBody, PageTransport};
use crate::config::FetchConfig;
use crate::models::TransportKind;
use crate::utils::error::AppError;
use crate::Result;

/// Delay before the retry following `attempt` (0-based): `min(2^attempt, cap)` units.
pub fn backoff_delay(attempt: u32, cap: u64, unit: Duration) -> Duration {
    let units = 2u64.checked_pow(attempt).unwrap_or(u64::MAX).min(cap);
    unit.saturating_mul(units.min(u32::MAX as u64) as u32)
}

pub struct HttpTransport {
    client: Client,
    config: FetchConfig,
}

impl HttpTransport {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers(browser_headers(&config.user_agent)?)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            // No per-read timeout in reqwest 0.11; the read budget is added to
            // the connect budget and applied to the whole request.
            .timeout(Duration::from_secs(
                config.connect_timeout_secs + config.read_timeout_secs,
            ))
            .build()?;

        Ok(Self { client, config })
    }

    fn delay_after(&self, attempt: u32) -> Duration {
        backoff_delay(
            attempt,
            self.config.backoff_cap,
            Duration::from_millis(self.config.backoff_unit_ms),
        )
    }

    async fn get_once(&self, url: &str) -> std::result::Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        response.text().await
    }
}

#[async_trait]
impl PageTransport for HttpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }

    async fn fetch(&self, url: &str) -> Result<PageBody> {
        let max_attempts = self.config.max_attempts;

        for attempt in 0..max_attempts {
            let is_last = attempt + 1 == max_attempts;
            debug!(url, attempt = attempt + 1, max_attempts, "HTTP GET");

            match self.get_once(url).await {
                Ok(text) => {
                    let length = text.trim().chars().count();
                    if length < self.config.min_body_chars && !is_last {
                        let wait = self.delay_after(attempt);
                        warn!(url, length, ?wait, "Suspiciously short response, retrying");
                        tokio::time::sleep(wait).await;
                        continue;
                    }

                    info!(url, length, attempts = attempt + 1, "Fetched page over HTTP");
                    return Ok(PageBody {
                        text,
                        attempts: attempt + 1,
                    });
                }
                Err(e) => {
                    if e.is_timeout() {
                        warn!(url, attempt = attempt + 1, "Timeout error: {}", e);
                    } else {
                        warn!(url, attempt = attempt + 1, "Request error: {}", e);
                    }

                    if !is_last {
                        let wait = self.delay_after(attempt);
                        debug!(?wait, "Backing off before retry");
                        tokio::time::sleep(wait).await;
                    }
                }
            }
        }

        Err(AppError::RetriesExhausted {
            url: url.to_string(),
            attempts: max_attempts,
        })
    }
}

fn browser_headers(user_agent: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let pairs = [
        (header::USER_AGENT, user_agent),
        (
            header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
        ),
        (header::ACCEPT_LANGUAGE, "en-US,en;q=0.9"),
        (header::UPGRADE_INSECURE_REQUESTS, "1"),
        (header::CACHE_CONTROL, "no-cache"),
        (header::PRAGMA, "no-cache"),
    ];

    for (name, value) in pairs {
        let value = HeaderValue::from_str(value)
            .map_err(|e| AppError::Validation(format!("Invalid header value for {}: {}", name, e)))?;
        headers.insert(name, value);
    }

    Ok(headers)
}
