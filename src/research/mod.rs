//! Iterative Web Research
//!
//! Answers a question by looping search and reflection until the gathered
//! material is judged sufficient, then writes a cited answer.
//!
//! # Architecture
//!
//! - [`query_generator`] - Turns the question into an initial batch of search queries
//! - [`web_researcher::WebResearcher`] - Runs one grounded search per query, concurrently
//! - [`reflector`] - Judges sufficiency and proposes follow-up queries
//! - [`synthesizer`] - Writes the final answer and resolves citations
//! - [`coordinator::ResearchCoordinator`] - The loop controller tying them together
//!
//! # Usage
//!
//! ```ignore
//! use deepsearch::research::{coordinator::ResearchCoordinator, effort::EffortLevel};
//!
//! let coordinator = ResearchCoordinator::from_config(&config, EffortLevel::Medium)?;
//! let report = coordinator
//!     .research("What are the latest developments in quantum computing?")
//!     .await?;
//!
//! println!("{}", report.answer);
//! for source in report.sources {
//!     println!("- {}", source.url);
//! }
//! ```
//!
//! # Citations
//!
//! Search results come back with grounding metadata: a list of source chunks
//! and text segments supported by them. Each web research call inserts
//! per-call markers (`[label](cite:{call}-{k})`), registers its chunks in the
//! run-wide [`sources::SourceTable`], and rewrites the markers to run-wide
//! ids (`[label](cite:{id})`). The synthesizer replaces those with real URLs.

/// Citation marker insertion, rewriting and resolution.
pub mod citations;
/// Research task coordination.
pub mod coordinator;
/// Effort levels and the profiles they select.
pub mod effort;
/// Prompt templates.
pub mod prompts;
/// Initial search query generation.
pub mod query_generator;
/// Sufficiency judgement and follow-up queries.
pub mod reflector;
/// Run-wide source registry.
pub mod sources;
/// Loop state and transitions.
pub mod state;
/// Final answer synthesis.
pub mod synthesizer;
/// Single grounded search call.
pub mod web_researcher;

pub use coordinator::{ResearchCoordinator, ResearchReport};
pub use effort::{EffortLevel, EffortProfile, ModelTier};
