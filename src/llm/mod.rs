//! LLM Provider Clients and Abstractions
//!
//! The research loop depends on two narrow traits:
//! - [`LLMClient`] - free-text and JSON-schema constrained generation
//! - [`SearchClient`] - search-grounded generation with citation metadata
//!
//! [`GeminiClient`](gemini::GeminiClient) implements both against the Gemini
//! REST API. [`ResearchClients`] wires one client per research role from
//! `deepsearch.toml`.
//!
//! # Example
//!
//! ```ignore
//! use deepsearch::llm::{LLMClient, Provider};
//!
//! let client = Provider::Gemini {
//!     api_key: std::env::var("GEMINI_API_KEY")?,
//!     api_base: deepsearch::llm::gemini::DEFAULT_GEMINI_API_BASE.to_string(),
//!     model: "gemini-2.5-flash".to_string(),
//!     timeout: std::time::Duration::from_secs(120),
//! }
//! .create_client()?;
//!
//! let answer = client.generate("What is 2+2?").await?;
//! ```

/// Client traits, grounding types and the provider factory.
pub mod client;
/// Gemini REST implementation.
pub mod gemini;

pub use gemini::GeminiClient;
pub use client::{
    GroundedResponse, GroundingChunk, GroundingSupport, LLMClient, Provider, ResearchClients,
    SearchClient,
};
