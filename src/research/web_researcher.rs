use crate::llm::client::SearchClient;
use crate::research::citations::{self, source_label};
use crate::research::prompts;
use crate::research::sources::SourceTable;
use crate::types::{ResearchQuery, ResearchSummary, Result, SourceId};
use std::sync::Arc;
use tracing::debug;

/// Runs one grounded search and folds its sources into the run's table.
///
/// Cheap to clone; every concurrent call in a round gets its own copy.
#[derive(Clone)]
pub struct WebResearcher {
    search: Arc<dyn SearchClient>,
    sources: Arc<SourceTable>,
}

impl WebResearcher {
    pub fn new(search: Arc<dyn SearchClient>, sources: Arc<SourceTable>) -> Self {
        Self { search, sources }
    }

    /// Research one query.
    ///
    /// `call_index` must be unique within the run; it namespaces the per-call
    /// markers before they are rewritten against the source table.
    pub async fn research(
        &self,
        query: &ResearchQuery,
        call_index: usize,
        current_date: &str,
    ) -> Result<ResearchSummary> {
        let prompt = prompts::web_searcher(&query.query, current_date);
        let response = self.search.search(&prompt).await?;

        let labels: Vec<String> = response
            .chunks
            .iter()
            .map(|chunk| source_label(&chunk.title))
            .collect();
        let marked = citations::insert_citation_markers(
            &response.text,
            &response.supports,
            &labels,
            call_index,
        );

        // Chunks without a URL never become sources; their markers are dropped.
        let registrable: Vec<(usize, &str, &str)> = response
            .chunks
            .iter()
            .zip(labels.iter())
            .enumerate()
            .filter(|(_, (chunk, _))| !chunk.url.trim().is_empty())
            .map(|(k, (chunk, label))| (k, chunk.url.as_str(), label.as_str()))
            .collect();
        let ids = self
            .sources
            .register_all(registrable.iter().map(|(_, url, label)| (*url, *label)));

        let mut mapping: Vec<Option<SourceId>> = vec![None; response.chunks.len()];
        for ((k, _, _), id) in registrable.iter().zip(ids) {
            mapping[*k] = Some(id);
        }

        let text = citations::rewrite_local_markers(&marked, call_index, &mapping);
        let cited = citations::cited_sources(&text);

        debug!(
            call_index,
            query = %query.query,
            chunks = response.chunks.len(),
            cited = cited.len(),
            "Web research call finished"
        );

        Ok(ResearchSummary {
            query: query.query.clone(),
            text,
            cited,
        })
    }
}
