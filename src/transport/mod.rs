//! Ways of turning a URL into page text.

use async_trait::async_trait;

use crate::models::TransportKind;
use crate::Result;

pub mod browser;
pub mod http;

pub use browser::BrowserTransport;
pub use http::{backoff_delay, HttpTransport};

/// Page text plus the number of attempts it took to get it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBody {
    pub text: String,
    pub attempts: u32,
}

/// A strategy for fetching page bodies (rendered or plain HTTP).
#[async_trait]
pub trait PageTransport: Send + Sync {
    fn kind(&self) -> TransportKind;

    async fn fetch(&self, url: &str) -> Result<PageBody>;

    /// Release any resources held by the transport.
    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}
