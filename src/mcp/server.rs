use crate::{
    llm::ResearchClients,
    research::{coordinator::ResearchCoordinator, effort::EffortLevel},
    types::{AppError, Source},
};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
    transport::streamable_http_server::{
        StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
    },
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Parameters for deep search
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DeepSearchParams {
    /// The question to research
    pub query: String,
    /// Research effort: low, medium or high (defaults to low)
    pub effort: Option<EffortLevel>,
}

/// Tool payload: the answer and the sources it cites
#[derive(Debug, Serialize)]
pub struct DeepSearchOutput {
    pub answer: String,
    pub sources: Vec<Source>,
}

/// MCP server exposing the research loop as a single tool
#[derive(Clone)]
pub struct DeepSearchMcpServer {
    clients: ResearchClients,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl DeepSearchMcpServer {
    pub fn new(clients: ResearchClients) -> Self {
        Self {
            clients,
            tool_router: Self::tool_router(),
        }
    }

    /// Research a question on the web and return a cited answer
    #[tool(
        description = "Research a question with iterative web search and return a cited answer with its sources as JSON"
    )]
    async fn deep_search(
        &self,
        params: Parameters<DeepSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let DeepSearchParams { query, effort } = params.0;
        let coordinator = ResearchCoordinator::new(self.clients.clone(), effort.unwrap_or_default());

        match coordinator.research(&query).await {
            Ok(report) => {
                let output = DeepSearchOutput {
                    answer: report.answer,
                    sources: report.sources,
                };
                let body = serde_json::to_string(&output)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(body)]))
            }
            Err(e) => {
                error!("deep_search failed: {}", e);
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Research failed: {}",
                    e
                ))]))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for DeepSearchMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "deepsearch".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "deepsearch - call deep_search with a question to get a web-researched, cited answer"
                    .into(),
            ),
        }
    }
}

/// Streamable HTTP transport for the same tool, mounted by the API router at `/mcp`
pub fn streamable_http_service(
    clients: ResearchClients,
) -> StreamableHttpService<DeepSearchMcpServer, LocalSessionManager> {
    StreamableHttpService::new(
        move || Ok(DeepSearchMcpServer::new(clients.clone())),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    )
}

/// Start the MCP server with stdio transport and run until the client disconnects
pub async fn start_stdio_server(clients: ResearchClients) -> crate::types::Result<()> {
    use rmcp::{ServiceExt, transport::io::stdio};

    let server = DeepSearchMcpServer::new(clients);
    let transport = stdio();

    let running = server
        .serve(transport)
        .await
        .map_err(|e| AppError::Internal(format!("MCP server error: {}", e)))?;
    info!("MCP server ready on stdio");

    running
        .waiting()
        .await
        .map_err(|e| AppError::Internal(format!("MCP server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{GroundedResponse, GroundingChunk, GroundingSupport, LLMClient, SearchClient};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedLLM {
        json: Mutex<VecDeque<String>>,
        text: String,
        fail: bool,
    }

    impl ScriptedLLM {
        fn new(text: &str, json: Vec<Value>) -> Self {
            Self {
                json: Mutex::new(json.iter().map(|v| v.to_string()).collect()),
                text: text.to_string(),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new("", vec![])
            }
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedLLM {
        async fn generate(&self, _prompt: &str) -> crate::types::Result<String> {
            if self.fail {
                return Err(AppError::LLM("quota exhausted".to_string()));
            }
            Ok(self.text.clone())
        }

        async fn generate_json(&self, _prompt: &str, _schema: &Value) -> crate::types::Result<String> {
            if self.fail {
                return Err(AppError::LLM("quota exhausted".to_string()));
            }
            self.json
                .lock()
                .pop_front()
                .ok_or_else(|| AppError::LLM("no scripted JSON left".to_string()))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    #[derive(Default)]
    struct CountingSearch {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchClient for CountingSearch {
        async fn search(&self, _prompt: &str) -> crate::types::Result<GroundedResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(GroundedResponse {
                text: "AI studies intelligent agents.".to_string(),
                chunks: vec![GroundingChunk {
                    url: "https://en.wikipedia.org/wiki/AI".to_string(),
                    title: "wikipedia.org".to_string(),
                }],
                supports: vec![GroundingSupport {
                    start_index: 0,
                    end_index: 30,
                    chunk_indices: vec![0],
                }],
            })
        }

        fn model_name(&self) -> &str {
            "counting"
        }
    }

    fn server(generator: ScriptedLLM, search: Arc<CountingSearch>, reasoning: ScriptedLLM) -> DeepSearchMcpServer {
        let reasoning = Arc::new(reasoning);
        DeepSearchMcpServer::new(ResearchClients {
            query_generator: Arc::new(generator),
            search,
            flash: reasoning.clone(),
            pro: reasoning,
        })
    }

    fn params(query: &str, effort: Option<EffortLevel>) -> Parameters<DeepSearchParams> {
        Parameters(DeepSearchParams {
            query: query.to_string(),
            effort,
        })
    }

    #[tokio::test]
    async fn test_deep_search_defaults_to_low_effort() {
        let search = Arc::new(CountingSearch::default());
        let server = server(
            ScriptedLLM::new(
                "",
                vec![json!({"queries": [
                    {"query": "artificial intelligence definition", "rationale": "r"},
                    {"query": "history of ai", "rationale": "r"}
                ]})],
            ),
            search.clone(),
            ScriptedLLM::new(
                "AI is the study of agents [wikipedia](cite:0).",
                vec![json!({"is_sufficient": false, "knowledge_gap": "g", "follow_up_queries": ["more"]})],
            ),
        );

        let result = server
            .deep_search(params("What is artificial intelligence?", None))
            .await
            .unwrap();

        assert_ne!(result.is_error, Some(true));
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);

        let value = serde_json::to_value(&result).unwrap();
        let body: Value = serde_json::from_str(value["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "answer": "AI is the study of agents [wikipedia](https://en.wikipedia.org/wiki/AI).",
                "sources": [{"id": 0, "label": "wikipedia", "url": "https://en.wikipedia.org/wiki/AI"}]
            })
        );
    }

    #[tokio::test]
    async fn test_deep_search_reports_upstream_failure_as_tool_error() {
        let search = Arc::new(CountingSearch::default());
        let server = server(ScriptedLLM::failing(), search.clone(), ScriptedLLM::new("", vec![]));

        let result = server
            .deep_search(params("anything", Some(EffortLevel::High)))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
        let value = serde_json::to_value(&result).unwrap();
        assert!(value["content"][0]["text"].as_str().unwrap().contains("Research failed"));
    }
}
