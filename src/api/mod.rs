//! HTTP API Handlers and Routes
//!
//! REST layer over the research loop, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! - `GET /health` - Health check, returns `OK`
//! - `POST /api/research` - Run one research session and return the cited answer
//! - `/mcp` - The `deep_search` MCP tool over streamable HTTP (`mcp` feature)

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
