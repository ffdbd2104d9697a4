//! # deepsearch - Iterative Web Research
//!
//! Answers a question by searching the web in rounds, reflecting on what is
//! still missing, and writing an answer whose claims link to their sources.
//!
//! ## Overview
//!
//! deepsearch can be used in two ways:
//!
//! 1. **As a binary** - `deepsearch ask`, `deepsearch serve` or `deepsearch mcp`
//! 2. **As a library** - Drive [`ResearchCoordinator`] from your own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use deepsearch::{DeepSearchConfig, EffortLevel, ResearchCoordinator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DeepSearchConfig::load_or_default("deepsearch.toml")?;
//!     let coordinator = ResearchCoordinator::from_config(&config, EffortLevel::Medium)?;
//!
//!     let report = coordinator.research("Who won the 2024 Nobel Prize in Physics?").await?;
//!     println!("{}", report.answer);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `mcp` | Model Context Protocol tool server (default) |
//!
//! ## Modules
//!
//! - [`research`] - The research loop: query generation, web research, reflection, synthesis
//! - [`llm`] - Model and search clients (Gemini)
//! - [`api`] - REST API handlers and routes
//! - [`cli`] - Command-line parsing and output
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration loading

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// LLM and search clients.
pub mod llm;
/// Model Context Protocol (MCP) server integration.
#[cfg(feature = "mcp")]
pub mod mcp;
/// The iterative research loop.
pub mod research;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use llm::{GeminiClient, LLMClient, Provider, ResearchClients, SearchClient};
pub use research::{EffortLevel, ResearchCoordinator, ResearchReport};
pub use types::{AppError, Result};
pub use utils::toml_config::DeepSearchConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded `deepsearch.toml`
    pub config: Arc<DeepSearchConfig>,
    /// Per-role model and search clients
    pub clients: ResearchClients,
}

impl AppState {
    /// Build Gemini clients for `config` and wrap both into shared state
    pub fn from_config(config: DeepSearchConfig) -> Result<Self> {
        let clients = ResearchClients::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            clients,
        })
    }

    /// `host:port` the HTTP server listens on
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_from_config() {
        let mut config = DeepSearchConfig::default();
        config.provider.api_key_env = "DEEPSEARCH_TEST_APP_STATE_KEY".to_string();
        config.server.host = "0.0.0.0".to_string();
        config.server.port = 8088;
        std::env::set_var("DEEPSEARCH_TEST_APP_STATE_KEY", "test-key");

        let state = AppState::from_config(config).unwrap();
        assert_eq!(state.bind_addr(), "0.0.0.0:8088");
        assert_eq!(state.clients.pro.model_name(), "gemini-2.5-pro");
    }

    #[test]
    fn test_app_state_requires_api_key() {
        let mut config = DeepSearchConfig::default();
        config.provider.api_key_env = "DEEPSEARCH_TEST_APP_STATE_MISSING".to_string();

        let err = AppState::from_config(config).err().unwrap();
        assert!(matches!(err, AppError::Config(_)));
    }
}
