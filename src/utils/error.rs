use thiserror::Error;

use crate::models::FetchResult;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Invalid selector: {selector}")]
    InvalidSelector { selector: String },

    #[error("Gave up on {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },

    #[error("No content from any candidate URL ({} attempts: {})", .tried.len(), describe_tried(.tried))]
    FetchExhausted { tried: Vec<FetchResult> },

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

fn describe_tried(tried: &[FetchResult]) -> String {
    tried
        .iter()
        .map(|r| format!("{} via {}", r.url, r.transport_used))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, AppError>;
