use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::research::effort::EffortLevel;

// ============= API Request/Response Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResearchRequest {
    pub query: String,
    #[serde(default)]
    pub effort: EffortLevel,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResearchResponse {
    pub answer: String,
    pub sources: Vec<Source>,
    pub rounds: u32,
    pub queries: Vec<String>,
    pub duration_ms: u64,
}

// ============= Research Types =============

/// Run-wide identifier of a [`Source`]; rendered as `cite:N` inside citation markers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct SourceId(pub u32);

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A web page that grounded part of a research summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Source {
    pub id: SourceId,
    pub label: String,
    pub url: String,
}

/// One search query together with the reason it was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ResearchQuery {
    /// The search query to run
    pub query: String,
    /// Why this query helps answer the research question
    pub rationale: String,
}

impl ResearchQuery {
    pub fn new(query: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            rationale: rationale.into(),
        }
    }
}

/// Synthesized text of one grounded search, with `[label](cite:N)` markers embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchSummary {
    pub query: String,
    pub text: String,
    /// Sources cited by `text`, in order of first citation
    pub cited: Vec<SourceId>,
}

// ============= Error Types =============

/// Which structured model output failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    QueryList,
    Reflection,
    Grounding,
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputKind::QueryList => "query list",
            OutputKind::Reflection => "reflection",
            OutputKind::Grounding => "grounding",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Malformed {kind} output: {message}")]
    MalformedOutput { kind: OutputKind, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn malformed(kind: OutputKind, message: impl Into<String>) -> Self {
        AppError::MalformedOutput {
            kind,
            message: message.into(),
        }
    }
}

impl From<crate::utils::toml_config::ConfigError> for AppError {
    fn from(err: crate::utils::toml_config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::LLM(_) | AppError::Search(_) | AppError::MalformedOutput { .. } => {
                axum::http::StatusCode::BAD_GATEWAY
            }
            AppError::InvalidInput(_) => axum::http::StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Internal(_) => {
                axum::http::StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
