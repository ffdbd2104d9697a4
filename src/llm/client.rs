//! LLM and search client abstractions
//!
//! The research loop only ever talks to two black-box services:
//! - an [`LLMClient`] for free-text and schema-constrained generation
//! - a [`SearchClient`] for search-grounded generation that reports which
//!   spans of its text are backed by which web pages
//!
//! [`Provider`] creates concrete clients; [`ResearchClients`] bundles the
//! per-role clients a research run needs.

use crate::research::effort::ModelTier;
use crate::types::{AppError, OutputKind, Result};
use crate::utils::toml_config::DeepSearchConfig;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Generic LLM client trait for provider abstraction
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a free-text completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate a JSON document that conforms to `schema`, returned as raw text
    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Search-grounded generation
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run one grounded search for `prompt`
    async fn search(&self, prompt: &str) -> Result<GroundedResponse>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Result of a grounded search: text plus the web pages backing it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundedResponse {
    pub text: String,
    pub chunks: Vec<GroundingChunk>,
    pub supports: Vec<GroundingSupport>,
}

/// A web page referenced by the grounding metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingChunk {
    pub url: String,
    pub title: String,
}

/// A span of the response text (UTF-8 byte offsets) and the chunks that support it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingSupport {
    pub start_index: usize,
    pub end_index: usize,
    pub chunk_indices: Vec<usize>,
}

/// Build the JSON schema sent to the model for structured output of type `T`
pub fn json_schema_for<T: JsonSchema>() -> Value {
    let mut schema = serde_json::to_value(schemars::schema_for!(T)).unwrap_or(Value::Null);
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
    }
    schema
}

/// Ask the model for a `T` and parse it, mapping bad JSON to [`AppError::MalformedOutput`]
pub async fn generate_structured<T>(
    client: &dyn LLMClient,
    prompt: &str,
    kind: OutputKind,
) -> Result<T>
where
    T: DeserializeOwned + JsonSchema,
{
    let schema = json_schema_for::<T>();
    let raw = client.generate_json(prompt, &schema).await?;
    parse_structured(&raw, kind)
}

/// Parse a structured response, tolerating a surrounding Markdown code fence
pub fn parse_structured<T: DeserializeOwned>(raw: &str, kind: OutputKind) -> Result<T> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body.trim()).map_err(|e| AppError::malformed(kind, e.to_string()))
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// Google Gemini `generateContent` REST API
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Gemini {
    ///     api_key: "AIza...".to_string(),
    ///     api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
    ///     model: "gemini-2.5-flash".to_string(),
    ///     timeout: Duration::from_secs(120),
    /// };
    /// ```
    Gemini {
        api_key: String,
        api_base: String,
        model: String,
        timeout: Duration,
    },
}

impl Provider {
    /// Create a text-generation client for this provider
    pub fn create_client(&self) -> Result<Arc<dyn LLMClient>> {
        match self {
            Provider::Gemini { .. } => Ok(Arc::new(self.gemini()?)),
        }
    }

    /// Create a grounded-search client for this provider
    pub fn create_search_client(&self) -> Result<Arc<dyn SearchClient>> {
        match self {
            Provider::Gemini { .. } => Ok(Arc::new(self.gemini()?)),
        }
    }

    fn gemini(&self) -> Result<super::gemini::GeminiClient> {
        let Provider::Gemini {
            api_key,
            api_base,
            model,
            timeout,
        } = self;
        super::gemini::GeminiClient::new(api_key.clone(), api_base.clone(), model.clone(), *timeout)
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini { .. } => "Gemini",
        }
    }

    /// Same provider, different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            Provider::Gemini {
                api_key,
                api_base,
                timeout,
                ..
            } => Provider::Gemini {
                api_key: api_key.clone(),
                api_base: api_base.clone(),
                model: model.to_string(),
                timeout: *timeout,
            },
        }
    }
}

/// The clients one research run uses, one per role
#[derive(Clone)]
pub struct ResearchClients {
    /// Generates the initial query batch
    pub query_generator: Arc<dyn LLMClient>,
    /// Runs grounded searches
    pub search: Arc<dyn SearchClient>,
    /// Reflection and answer model for the flash tier
    pub flash: Arc<dyn LLMClient>,
    /// Reflection and answer model for the pro tier
    pub pro: Arc<dyn LLMClient>,
}

impl ResearchClients {
    /// Build Gemini clients from configuration.
    ///
    /// Fails with [`AppError::Config`] when the API key variable is unset, so a
    /// missing credential is caught before any research starts.
    pub fn from_config(config: &DeepSearchConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        let base = Provider::Gemini {
            api_key,
            api_base: config.provider.api_base.clone(),
            model: config.models.query_generator.clone(),
            timeout: Duration::from_secs(config.provider.timeout_secs),
        };

        Ok(Self {
            query_generator: base.create_client()?,
            search: base
                .with_model(&config.models.web_search)
                .create_search_client()?,
            flash: base.with_model(&config.models.flash).create_client()?,
            pro: base.with_model(&config.models.pro).create_client()?,
        })
    }

    /// The reflection/answer model for a tier
    pub fn reasoning(&self, tier: ModelTier) -> &Arc<dyn LLMClient> {
        match tier {
            ModelTier::Flash => &self.flash,
            ModelTier::Pro => &self.pro,
        }
    }
}
