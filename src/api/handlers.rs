//! HTTP request handlers for the splitting and citation service.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::citations::normalize_citations;
use crate::error::Error;
use crate::splitter::{split_text, CharCounter, GraphemeCounter, TiktokenCounter};
use crate::types::{
    Chunk, KeepSeparator, LengthFunction, NormalizedCitation, ServiceConfig, SourceMap,
};

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServiceConfig,
    pub token_counter: TiktokenCounter,
}

/// Library errors rendered as `422` with a JSON body.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "Rejected request");
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Request to split a text. Unset fields fall back to the service config.
#[derive(Debug, Deserialize)]
pub struct SplitRequest {
    pub text: String,
    pub chunk_size: Option<usize>,
    pub chunk_overlap: Option<usize>,
    pub separators: Option<Vec<String>>,
    pub keep_separator: Option<KeepSeparator>,
    pub length_function: Option<LengthFunction>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SplitResponse {
    pub chunks: Vec<Chunk>,
}

/// Split a text into chunks.
pub async fn split(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SplitRequest>,
) -> Result<Json<SplitResponse>, ApiError> {
    let mut config = state.config.splitter_config();
    if let Some(size) = request.chunk_size {
        config.chunk_size = size;
    }
    if let Some(overlap) = request.chunk_overlap {
        config.chunk_overlap = overlap;
    }
    if let Some(separators) = request.separators {
        config.separators = separators;
    }
    if let Some(keep) = request.keep_separator {
        config.keep_separator = keep;
    }
    let length_function = request
        .length_function
        .unwrap_or(state.config.length_function);

    let chunks = match length_function {
        LengthFunction::Chars => split_text(&request.text, &config, &CharCounter)?,
        LengthFunction::Graphemes => split_text(&request.text, &config, &GraphemeCounter)?,
        LengthFunction::Tokens => split_text(&request.text, &config, &state.token_counter)?,
    };

    info!(
        bytes = request.text.len(),
        chunk_size = config.chunk_size,
        chunks = chunks.len(),
        "Split text"
    );

    Ok(Json(SplitResponse { chunks }))
}

/// Request to normalize the citations in a generated answer.
#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub text: String,
    #[serde(default)]
    pub sources: SourceMap,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizeResponse {
    pub text: String,
    pub citations: Vec<NormalizedCitation>,
    /// Cited ids with no matching source
    pub unresolved: Vec<String>,
}

/// Renumber citations and build the reference list.
pub async fn normalize(Json(request): Json<NormalizeRequest>) -> Json<NormalizeResponse> {
    let normalized = normalize_citations(&request.text, &request.sources);
    let unresolved = normalized
        .unresolved()
        .into_iter()
        .map(String::from)
        .collect();

    info!(
        citations = normalized.citations.len(),
        "Normalized citations"
    );

    Json(NormalizeResponse {
        text: normalized.text,
        citations: normalized.citations,
        unresolved,
    })
}
