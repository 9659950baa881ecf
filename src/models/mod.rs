pub mod fetch;
pub mod listing;

// Re-exports for convenience
pub use fetch::*;
pub use listing::*;
