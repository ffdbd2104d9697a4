use crate::llm::client::{generate_structured, LLMClient};
use crate::research::prompts;
use crate::types::{OutputKind, ResearchSummary, Result};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

/// Structured output of the reflection call
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct Reflection {
    /// Whether the summaries are enough to answer the question
    pub is_sufficient: bool,
    /// What information is missing
    #[serde(default)]
    pub knowledge_gap: String,
    /// Queries that would close the gap
    #[serde(default)]
    pub follow_up_queries: Vec<String>,
}

/// Judge whether the research so far answers `question`.
pub async fn reflect(
    llm: &dyn LLMClient,
    question: &str,
    summaries: &[ResearchSummary],
) -> Result<Reflection> {
    let prompt = prompts::reflection(question, summaries);
    let reflection: Reflection = generate_structured(llm, &prompt, OutputKind::Reflection).await?;

    debug!(
        model = llm.model_name(),
        is_sufficient = reflection.is_sufficient,
        follow_ups = reflection.follow_up_queries.len(),
        "Reflection finished"
    );
    Ok(reflection)
}
