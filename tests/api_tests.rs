//! HTTP API tests using axum-test with scripted clients.

mod common;

use axum_test::TestServer;
use common::mocks::{clients, grounded, MockLLMClient, MockSearchClient};
use deepsearch::{api::routes, AppState, DeepSearchConfig};
use serde_json::{json, Value};
use std::sync::Arc;

fn create_test_server(
    generator: MockLLMClient,
    search: MockSearchClient,
    reasoning: MockLLMClient,
) -> TestServer {
    let state = AppState {
        config: Arc::new(DeepSearchConfig::default()),
        clients: clients(Arc::new(generator), Arc::new(search), Arc::new(reasoning)),
    };
    TestServer::new(routes::app(state)).expect("Failed to create test server")
}

fn idle_server() -> TestServer {
    create_test_server(
        MockLLMClient::new(""),
        MockSearchClient::new(),
        MockLLMClient::new(""),
    )
}

// ============= Health Check Tests =============

#[tokio::test]
async fn test_health_check() {
    let server = idle_server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

// ============= Research Endpoint Tests =============

#[tokio::test]
async fn test_research_returns_cited_answer() {
    let server = create_test_server(
        MockLLMClient::new("").with_json(vec![json!({
            "queries": [{ "query": "webassembly gc", "rationale": "status of the proposal" }]
        })]),
        MockSearchClient::new().on(
            "webassembly gc",
            grounded("WasmGC shipped in browsers.", &[("https://webassembly.org/gc", "webassembly.org")]),
        ),
        MockLLMClient::new("WasmGC is shipped [webassembly](cite:0).").with_json(vec![json!({
            "is_sufficient": true,
            "knowledge_gap": "",
            "follow_up_queries": []
        })]),
    );

    let response = server
        .post("/api/research")
        .json(&json!({ "query": "Is WasmGC usable today?" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["answer"],
        "WasmGC is shipped [webassembly](https://webassembly.org/gc)."
    );
    assert_eq!(body["sources"][0]["id"], 0);
    assert_eq!(body["sources"][0]["label"], "webassembly");
    assert_eq!(body["sources"][0]["url"], "https://webassembly.org/gc");
    assert_eq!(body["rounds"], 1);
    assert_eq!(body["queries"], json!(["webassembly gc"]));
    assert!(body["duration_ms"].is_u64());
}

#[tokio::test]
async fn test_research_accepts_effort_level() {
    let server = create_test_server(
        MockLLMClient::new("").with_json(vec![json!({
            "queries": [
                { "query": "one", "rationale": "r" },
                { "query": "two", "rationale": "r" },
                { "query": "three", "rationale": "r" },
                { "query": "four", "rationale": "r" }
            ]
        })]),
        MockSearchClient::new(),
        MockLLMClient::new("answer").with_json(vec![json!({ "is_sufficient": true })]),
    );

    let response = server
        .post("/api/research")
        .json(&json!({ "query": "q", "effort": "medium" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["queries"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_research_rejects_empty_query() {
    let server = idle_server();

    let response = server
        .post("/api/research")
        .json(&json!({ "query": "  " }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Invalid input"));
}

#[tokio::test]
async fn test_research_rejects_unknown_effort() {
    let server = idle_server();

    let response = server
        .post("/api/research")
        .json(&json!({ "query": "q", "effort": "extreme" }))
        .await;

    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    let server = create_test_server(
        MockLLMClient::failing(),
        MockSearchClient::new(),
        MockLLMClient::new(""),
    );

    let response = server
        .post("/api/research")
        .json(&json!({ "query": "anything" }))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
}

// ============= MCP over HTTP =============

#[cfg(feature = "mcp")]
#[tokio::test]
async fn test_mcp_endpoint_is_mounted() {
    use axum::http::StatusCode;

    let server = idle_server();

    // Without a session the transport rejects the stream, but the route exists
    let response = server.get("/mcp").await;

    let status = response.status_code();
    assert_ne!(status, StatusCode::NOT_FOUND);
    assert!(status.is_client_error());
}
