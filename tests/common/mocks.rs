//! Mock implementations for testing.
//!
//! Scripted model and search clients shared by the integration tests, so the
//! research loop can run end to end without network access.

#![allow(dead_code)]

use async_trait::async_trait;
use deepsearch::llm::{
    GroundedResponse, GroundingChunk, GroundingSupport, LLMClient, ResearchClients, SearchClient,
};
use deepsearch::types::{AppError, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock LLM client with scripted responses.
///
/// `generate_json` pops the next queued JSON document; `generate` always
/// returns the configured text. Every prompt is recorded.
pub struct MockLLMClient {
    json_responses: Mutex<VecDeque<String>>,
    text_response: String,
    should_fail: bool,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockLLMClient {
    /// Create a mock client that answers free-text prompts with `text`.
    pub fn new(text: &str) -> Self {
        Self {
            json_responses: Mutex::new(VecDeque::new()),
            text_response: text.to_string(),
            should_fail: false,
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue JSON documents for successive `generate_json` calls.
    pub fn with_json(mut self, responses: Vec<Value>) -> Self {
        self.json_responses = Mutex::new(responses.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Queue raw strings for successive `generate_json` calls.
    pub fn with_raw_json(mut self, responses: Vec<&str>) -> Self {
        self.json_responses = Mutex::new(responses.into_iter().map(String::from).collect());
        self
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new("")
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    fn record(&self, prompt: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.record(prompt)?;
        Ok(self.text_response.clone())
    }

    async fn generate_json(&self, prompt: &str, _schema: &Value) -> Result<String> {
        self.record(prompt)?;
        self.json_responses
            .lock()
            .pop_front()
            .ok_or_else(|| AppError::LLM("Mock LLM has no scripted JSON left".to_string()))
    }

    fn model_name(&self) -> &str {
        "mock-llm"
    }
}

/// Mock search client.
///
/// Responses are keyed by a substring of the prompt (the query text is
/// embedded in the web search prompt). Unmatched prompts get an empty
/// response, or an error if the key is registered as failing.
pub struct MockSearchClient {
    responses: Vec<(String, GroundedResponse)>,
    failing: Vec<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl Default for MockSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            failing: Vec::new(),
            delay: None,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    /// Answer prompts containing `query` with `response`.
    pub fn on(mut self, query: &str, response: GroundedResponse) -> Self {
        self.responses.push((query.to_string(), response));
        self
    }

    /// Fail prompts containing `query`.
    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    /// Sleep before answering successful searches.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Searches that ran to completion
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn search(&self, prompt: &str) -> Result<GroundedResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.iter().any(|key| prompt.contains(key.as_str())) {
            return Err(AppError::Search("Mock search failure".to_string()));
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = self
            .responses
            .iter()
            .find(|(key, _)| prompt.contains(key.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_default();

        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(response)
    }

    fn model_name(&self) -> &str {
        "mock-search"
    }
}

/// A grounded response where the whole text is supported by every chunk.
pub fn grounded(text: &str, chunks: &[(&str, &str)]) -> GroundedResponse {
    let chunks: Vec<GroundingChunk> = chunks
        .iter()
        .map(|(url, title)| GroundingChunk {
            url: url.to_string(),
            title: title.to_string(),
        })
        .collect();
    let supports = if chunks.is_empty() {
        vec![]
    } else {
        vec![GroundingSupport {
            start_index: 0,
            end_index: text.len(),
            chunk_indices: (0..chunks.len()).collect(),
        }]
    };

    GroundedResponse {
        text: text.to_string(),
        chunks,
        supports,
    }
}

/// Bundle mocks into the per-role client set; flash and pro share `reasoning`.
pub fn clients(
    query_generator: Arc<MockLLMClient>,
    search: Arc<MockSearchClient>,
    reasoning: Arc<MockLLMClient>,
) -> ResearchClients {
    ResearchClients {
        query_generator,
        search,
        flash: reasoning.clone(),
        pro: reasoning,
    }
}
