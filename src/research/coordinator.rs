use crate::{
    llm::ResearchClients,
    research::{
        effort::{EffortLevel, EffortProfile},
        query_generator, reflector,
        state::{LoopPhase, RunState, StopReason},
        synthesizer,
        web_researcher::WebResearcher,
    },
    types::{AppError, OutputKind, ResearchQuery, ResearchSummary, Result, Source},
    utils::toml_config::DeepSearchConfig,
};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Outcome of one research session
#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    pub answer: String,
    /// Sources cited by `answer`, in order of first citation
    pub sources: Vec<Source>,
    /// Research rounds executed
    pub rounds: u32,
    /// Every search query issued, in dispatch order
    pub queries: Vec<String>,
    pub stop_reason: StopReason,
}

/// Drives one question through generate → research → reflect → answer.
pub struct ResearchCoordinator {
    clients: ResearchClients,
    level: EffortLevel,
    profile: EffortProfile,
}

impl ResearchCoordinator {
    pub fn new(clients: ResearchClients, level: EffortLevel) -> Self {
        Self {
            clients,
            level,
            profile: level.profile(),
        }
    }

    /// Build a coordinator with Gemini clients; fails if the API key is not set
    pub fn from_config(config: &DeepSearchConfig, level: EffortLevel) -> Result<Self> {
        Ok(Self::new(ResearchClients::from_config(config)?, level))
    }

    pub fn profile(&self) -> &EffortProfile {
        &self.profile
    }

    /// Execute deep research on a question
    pub async fn research(&self, question: &str) -> Result<ResearchReport> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::InvalidInput("Question must not be empty".to_string()));
        }

        let span = info_span!("research", run_id = %Uuid::new_v4(), effort = %self.level);
        self.run(question).instrument(span).await
    }

    async fn run(&self, question: &str) -> Result<ResearchReport> {
        let today = current_date();
        let mut state = RunState::new(question);
        let mut phase = LoopPhase::Init;

        let stop_reason = loop {
            phase = match phase {
                LoopPhase::Init => {
                    let queries = query_generator::generate_queries(
                        self.clients.query_generator.as_ref(),
                        question,
                        self.profile.query_count,
                        &today,
                    )
                    .await?;
                    if queries.is_empty() {
                        return Err(AppError::malformed(
                            OutputKind::QueryList,
                            "model returned no search queries",
                        ));
                    }
                    LoopPhase::Researching(queries)
                }
                LoopPhase::Researching(batch) => {
                    info!(
                        "Research round {}/{}: {} queries",
                        state.round + 1,
                        self.profile.max_loops,
                        batch.len()
                    );
                    let summaries = self.research_batch(&mut state, batch, &today).await?;
                    state.absorb_round(summaries);
                    LoopPhase::Reflecting
                }
                LoopPhase::Reflecting => {
                    let reflection = reflector::reflect(
                        self.clients.reasoning(self.profile.model_tier).as_ref(),
                        question,
                        &state.summaries,
                    )
                    .await?;
                    let next = state.next_phase(&self.profile, reflection);
                    if let LoopPhase::Researching(follow_ups) = &next {
                        info!("Knowledge gap found, {} follow-up queries", follow_ups.len());
                    }
                    next
                }
                LoopPhase::Done(reason) => break reason,
            };
        };

        info!(
            rounds = state.round,
            sources = state.sources.len(),
            "Research finished ({}), synthesizing answer",
            stop_reason
        );

        let resolved = synthesizer::synthesize(
            self.clients.reasoning(self.profile.model_tier).as_ref(),
            question,
            &state.summaries,
            &state.sources,
            &today,
        )
        .await?;

        Ok(ResearchReport {
            answer: resolved.text,
            sources: resolved.sources,
            rounds: state.round,
            queries: state.issued,
            stop_reason,
        })
    }

    /// Run a batch concurrently and wait for all of it.
    ///
    /// The first failure aborts the rest of the batch (dropping the
    /// `JoinSet` cancels its tasks) and fails the run.
    async fn research_batch(
        &self,
        state: &mut RunState,
        batch: Vec<ResearchQuery>,
        today: &str,
    ) -> Result<Vec<(usize, ResearchSummary)>> {
        let base = state.dispatch(&batch);
        let researcher = WebResearcher::new(self.clients.search.clone(), state.sources.clone());

        let mut set = JoinSet::new();
        for (offset, query) in batch.into_iter().enumerate() {
            let researcher = researcher.clone();
            let today = today.to_string();
            let call_index = base + offset;

            set.spawn(
                async move {
                    researcher
                        .research(&query, call_index, &today)
                        .await
                        .map(|summary| (call_index, summary))
                }
                .in_current_span(),
            );
        }

        let mut results = Vec::with_capacity(set.len());
        while let Some(joined) = set.join_next().await {
            let finished = joined
                .map_err(|e| AppError::Internal(format!("Research task failed: {}", e)))??;
            results.push(finished);
        }

        Ok(results)
    }
}

fn current_date() -> String {
    chrono::Local::now().format("%B %d, %Y").to_string()
}
