use crate::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// API routes, mounted under `/api`
pub fn create_router() -> Router<AppState> {
    Router::new().route(
        "/research",
        post(crate::api::handlers::research::deep_research),
    )
}

/// The full application: health check, API routes, MCP over HTTP and HTTP layers
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(crate::api::handlers::health_check))
        .nest("/api", create_router());

    #[cfg(feature = "mcp")]
    let router = router.nest_service(
        "/mcp",
        crate::mcp::streamable_http_service(state.clients.clone()),
    );

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
