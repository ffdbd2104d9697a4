use crate::{
    AppState,
    research::coordinator::ResearchCoordinator,
    types::{ResearchRequest, ResearchResponse, Result},
};
use axum::{Json, extract::State};
use std::time::Instant;

/// Perform deep research on a query
#[utoipa::path(
    post,
    path = "/api/research",
    request_body = ResearchRequest,
    responses(
        (status = 200, description = "Research completed", body = ResearchResponse),
        (status = 400, description = "Invalid input"),
        (status = 502, description = "Model or search backend failed")
    ),
    tag = "research"
)]
pub async fn deep_research(
    State(state): State<AppState>,
    Json(payload): Json<ResearchRequest>,
) -> Result<Json<ResearchResponse>> {
    let start = Instant::now();

    let coordinator = ResearchCoordinator::new(state.clients.clone(), payload.effort);
    let report = coordinator.research(&payload.query).await?;

    Ok(Json(ResearchResponse {
        answer: report.answer,
        sources: report.sources,
        rounds: report.rounds,
        queries: report.queries,
        duration_ms: start.elapsed().as_millis() as u64,
    }))
}
