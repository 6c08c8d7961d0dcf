//! API models for requests and responses

pub mod analytics;
pub mod api;

// Re-export commonly used types
pub use analytics::*;
pub use api::*;
