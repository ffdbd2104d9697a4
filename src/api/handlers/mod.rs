//! API request handlers.

/// Research handlers.
pub mod research;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
