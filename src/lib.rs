pub mod config;
pub mod element_finder;
pub mod extractor;
pub mod fetcher;
pub mod filter;
pub mod models;
pub mod pipeline;
pub mod selectors;
pub mod transport;
pub mod utils;
pub mod writer;

// Re-export commonly used types
pub use config::AppConfig;
pub use models::{ListingRecord, ResultSet, NOT_AVAILABLE};
pub use pipeline::{run_once, RunContext, RunOutcome};
pub use utils::error::AppError;
pub use writer::OutputFormat;

pub type Result<T> = std::result::Result<T, AppError>;
