//! Google Gemini client
//!
//! Talks to the `generateContent` REST endpoint directly with `reqwest`.
//! Implements [`LLMClient`] for plain and JSON-schema constrained generation,
//! and [`SearchClient`] for generation grounded with the `google_search` tool.

use crate::llm::client::{
    GroundedResponse, GroundingChunk, GroundingSupport, LLMClient, SearchClient,
};
use crate::types::{AppError, OutputKind, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// Default Gemini REST base URL
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client bound to one model
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key
    /// * `api_base` - REST base URL, usually [`DEFAULT_GEMINI_API_BASE`]
    /// * `model` - Model identifier (e.g., "gemini-2.5-flash")
    /// * `timeout` - Per-request timeout enforced by the HTTP client
    pub fn new(api_key: String, api_base: String, model: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    async fn send(&self, body: &GenerateContentRequest) -> std::result::Result<GenerateContentResponse, String> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("Gemini transport failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_string());
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|env| format!("{} ({})", env.error.message, env.error.status))
                .unwrap_or(body);
            return Err(format!("Gemini HTTP {}: {}", status.as_u16(), message));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| format!("Invalid Gemini response JSON: {}", e))
    }

    fn first_candidate(response: GenerateContentResponse) -> std::result::Result<Candidate, String> {
        response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| "No candidates in Gemini response".to_string())
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest::user(prompt);
        let response = self.send(&request).await.map_err(AppError::LLM)?;
        let candidate = Self::first_candidate(response).map_err(AppError::LLM)?;
        Ok(candidate.text())
    }

    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String> {
        let mut request = GenerateContentRequest::user(prompt);
        request.generation_config = Some(json!({
            "responseMimeType": "application/json",
            "responseJsonSchema": schema,
        }));

        let response = self.send(&request).await.map_err(AppError::LLM)?;
        let candidate = Self::first_candidate(response).map_err(AppError::LLM)?;
        Ok(candidate.text())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl SearchClient for GeminiClient {
    async fn search(&self, prompt: &str) -> Result<GroundedResponse> {
        let mut request = GenerateContentRequest::user(prompt);
        request.tools = Some(vec![json!({ "google_search": {} })]);
        request.generation_config = Some(json!({ "temperature": 0 }));

        let response = self.send(&request).await.map_err(AppError::Search)?;
        let candidate = Self::first_candidate(response).map_err(AppError::Search)?;
        let text = candidate.text();
        let metadata = candidate.grounding_metadata.unwrap_or_default();

        let chunks = metadata
            .grounding_chunks
            .into_iter()
            .map(|chunk| {
                let web = chunk.web.unwrap_or_default();
                GroundingChunk {
                    url: web.uri,
                    title: web.title,
                }
            })
            .collect::<Vec<_>>();

        let mut supports = Vec::with_capacity(metadata.grounding_supports.len());
        for support in metadata.grounding_supports {
            let Some(end_index) = support.segment.end_index else {
                continue;
            };
            if let Some(bad) = support
                .grounding_chunk_indices
                .iter()
                .find(|idx| **idx >= chunks.len())
            {
                return Err(AppError::malformed(
                    OutputKind::Grounding,
                    format!(
                        "support references chunk {} but only {} chunks were returned",
                        bad,
                        chunks.len()
                    ),
                ));
            }
            supports.push(GroundingSupport {
                start_index: support.segment.start_index.unwrap_or(0),
                end_index,
                chunk_indices: support.grounding_chunk_indices,
            });
        }

        Ok(GroundedResponse {
            text,
            chunks,
            supports,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ============= Wire Types =============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
}

impl GenerateContentRequest {
    fn user(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            tools: None,
            generation_config: None,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

impl Candidate {
    fn text(&self) -> String {
        self.content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<WireChunk>,
    #[serde(default)]
    grounding_supports: Vec<WireSupport>,
}

#[derive(Debug, Deserialize)]
struct WireChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct WebChunk {
    #[serde(default)]
    uri: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSupport {
    segment: Segment,
    #[serde(default)]
    grounding_chunk_indices: Vec<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Segment {
    #[serde(default)]
    start_index: Option<usize>,
    #[serde(default)]
    end_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}
