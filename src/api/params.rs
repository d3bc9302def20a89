use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Json as JsonExtractor,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::GenerationParameters;
use crate::server::AppState;
use crate::services::parse_hex_list;

/// Acknowledgement for commands applied asynchronously by the pipeline
#[derive(Debug, Serialize, ToSchema)]
pub struct AcceptedResponse {
    /// Status code (202 = accepted)
    pub status: u16,
    pub message: String,
}

impl AcceptedResponse {
    pub(crate) fn new(message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            StatusCode::ACCEPTED,
            Json(Self {
                status: StatusCode::ACCEPTED.as_u16(),
                message: message.into(),
            }),
        )
    }
}

/// Request body for the paste-box parser
#[derive(Debug, Deserialize, ToSchema)]
pub struct ParseRequest {
    /// Free-form text: JSON, CSS, R vectors, comma lists...
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ParseResponse {
    /// Canonical `#RRGGBB` colors in first-seen order
    pub colors: Vec<String>,
}

/// Replace the generation parameters
///
/// Generation runs once the parameters stop changing for the debounce window.
#[utoipa::path(
    put,
    path = "/api/params",
    request_body = GenerationParameters,
    responses(
        (status = 202, description = "Parameters accepted", body = AcceptedResponse),
        (status = 400, description = "Parameters out of range"),
    ),
    tag = "Generation"
)]
pub async fn handle_update_params(
    State(state): State<AppState>,
    JsonExtractor(params): JsonExtractor<GenerationParameters>,
) -> Result<impl IntoResponse, ApiError> {
    params.validate()?;

    tracing::debug!(
        num_colors = params.num_colors,
        regions = params.regions.len(),
        extend = params.use_extend,
        "Parameters updated"
    );
    state.pipeline.update_parameters(params);

    Ok(AcceptedResponse::new("Parameters accepted"))
}

/// Generate now, skipping the debounce window
#[utoipa::path(
    post,
    path = "/api/generate",
    responses(
        (status = 202, description = "Generation requested", body = AcceptedResponse),
        (status = 503, description = "Engine not ready"),
    ),
    tag = "Generation"
)]
pub async fn handle_generate(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    if !state.pipeline.snapshot().ready {
        return Err(ApiError::EngineNotReady);
    }
    state.pipeline.request_generation();
    Ok(AcceptedResponse::new("Generation requested"))
}

/// Extract colors from pasted text
#[utoipa::path(
    post,
    path = "/api/parse",
    request_body = ParseRequest,
    responses(
        (status = 200, description = "Parsed colors, possibly empty", body = ParseResponse),
    ),
    tag = "Generation"
)]
pub async fn handle_parse(
    JsonExtractor(request): JsonExtractor<ParseRequest>,
) -> Json<ParseResponse> {
    Json(ParseResponse {
        colors: parse_hex_list(&request.text),
    })
}
