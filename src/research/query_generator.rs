use crate::llm::client::{generate_structured, LLMClient};
use crate::research::prompts;
use crate::types::{OutputKind, ResearchQuery, Result};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

/// Structured output of the query-writing call
#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryList {
    /// Distinct web search queries, each with its rationale
    pub queries: Vec<ResearchQuery>,
}

/// Produce up to `count` search queries for `question`.
///
/// Model and parse failures propagate; there is no fallback query. Blank
/// queries are dropped and anything beyond `count` is truncated.
pub async fn generate_queries(
    llm: &dyn LLMClient,
    question: &str,
    count: usize,
    current_date: &str,
) -> Result<Vec<ResearchQuery>> {
    let prompt = prompts::query_writer(question, count, current_date);
    let list: QueryList = generate_structured(llm, &prompt, OutputKind::QueryList).await?;

    let queries: Vec<ResearchQuery> = list
        .queries
        .into_iter()
        .filter(|q| !q.query.trim().is_empty())
        .take(count)
        .collect();

    debug!(model = llm.model_name(), count = queries.len(), "Generated search queries");
    Ok(queries)
}
