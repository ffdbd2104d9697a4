use crate::llm::client::LLMClient;
use crate::research::citations::{resolve_citations, ResolvedCitations};
use crate::research::prompts;
use crate::research::sources::SourceTable;
use crate::types::{ResearchSummary, Result};
use tracing::debug;

/// Write the final answer and resolve its citation markers.
///
/// Markers that match no source stay in the text (see
/// [`resolve_citations`]); they are never an error.
pub async fn synthesize(
    llm: &dyn LLMClient,
    question: &str,
    summaries: &[ResearchSummary],
    sources: &SourceTable,
    current_date: &str,
) -> Result<ResolvedCitations> {
    let prompt = prompts::answer(question, summaries, current_date);
    let draft = llm.generate(&prompt).await?;
    let resolved = resolve_citations(&draft, sources);

    debug!(
        model = llm.model_name(),
        cited = resolved.sources.len(),
        unresolved = resolved.unresolved.len(),
        "Answer synthesized"
    );
    Ok(resolved)
}
