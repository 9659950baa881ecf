use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Browser,
    Http,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Browser => write!(f, "browser"),
            TransportKind::Http => write!(f, "http"),
        }
    }
}

/// Outcome of asking one transport for one candidate URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchResult {
    pub url: String,
    pub body: Option<String>,
    pub transport_used: TransportKind,
    pub attempts: u32,
}

impl FetchResult {
    pub fn fetched(url: &str, body: String, transport_used: TransportKind, attempts: u32) -> Self {
        Self {
            url: url.to_string(),
            body: Some(body),
            transport_used,
            attempts,
        }
    }

    pub fn failed(url: &str, transport_used: TransportKind, attempts: u32) -> Self {
        Self {
            url: url.to_string(),
            body: None,
            transport_used,
            attempts,
        }
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}
