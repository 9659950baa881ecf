use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::models::FetchResult;
use crate::transport::{BrowserTransport, HttpTransport, PageTransport};
use crate::utils::error::AppError;
use crate::Result;

/// Tries candidate URLs through an ordered list of transports until one
/// yields a substantial page.
pub struct Fetcher {
    transports: Vec<Box<dyn PageTransport>>,
    min_content_chars: usize,
}

impl Fetcher {
    pub fn new(transports: Vec<Box<dyn PageTransport>>, min_content_chars: usize) -> Self {
        Self {
            transports,
            min_content_chars,
        }
    }

    /// Browser first when it can be launched, plain HTTP always.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut transports: Vec<Box<dyn PageTransport>> = Vec::new();

        if config.browser.enabled {
            match BrowserTransport::launch(
                config.browser.clone(),
                &config.fetch.user_agent,
                config.fetch.min_content_chars,
            ) {
                Ok(browser) => transports.push(Box::new(browser)),
                Err(e) => warn!("Headless browser unavailable, using HTTP only: {}", e),
            }
        }

        transports.push(Box::new(HttpTransport::new(config.fetch.clone())?));

        Ok(Self::new(transports, config.fetch.min_content_chars))
    }

    pub fn transport_count(&self) -> usize {
        self.transports.len()
    }

    /// Each transport walks every candidate before the next transport is tried.
    pub async fn fetch_first(&self, candidate_urls: &[String]) -> Result<FetchResult> {
        let mut tried = Vec::new();

        for transport in &self.transports {
            let kind = transport.kind();
            for url in candidate_urls {
                info!(url = url.as_str(), transport = %kind, "Trying candidate URL");

                match transport.fetch(url).await {
                    Ok(page) if page.text.trim().chars().count() > self.min_content_chars => {
                        info!(url = url.as_str(), transport = %kind, "Fetched search results");
                        return Ok(FetchResult::fetched(url, page.text, kind, page.attempts));
                    }
                    Ok(page) => {
                        warn!(
                            url = url.as_str(),
                            transport = %kind,
                            length = page.text.len(),
                            "Content below threshold"
                        );
                        tried.push(FetchResult::failed(url, kind, page.attempts));
                    }
                    Err(e) => {
                        warn!(url = url.as_str(), transport = %kind, "Fetch failed: {}", e);
                        let attempts = match e {
                            AppError::RetriesExhausted { attempts, .. } => attempts,
                            _ => 1,
                        };
                        tried.push(FetchResult::failed(url, kind, attempts));
                    }
                }
            }
        }

        error!("Failed to fetch search results from every candidate URL");
        Err(AppError::FetchExhausted { tried })
    }

    /// Release every transport; errors are logged, never raised.
    pub fn shutdown(&self) {
        for transport in &self.transports {
            if let Err(e) = transport.shutdown() {
                warn!(transport = %transport.kind(), "Error during shutdown: {}", e);
            }
        }
    }
}
