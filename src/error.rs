use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error parsing a strict `#RRGGBB` color
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("Invalid hex color length: expected 6 digits, got {0}")]
    InvalidLength(usize),

    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
}

/// Parameter values the UI is not allowed to propose
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("Color count must be at least 1")]
    ZeroColors,

    #[error("Severity for {field} must be within 0..=1, got {value}")]
    SeverityOutOfRange { field: &'static str, value: f64 },
}

/// Failure reported by, or while talking to, the palette engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Engine not ready")]
    NotReady,

    #[error("Engine transport error: {0}")]
    Transport(String),

    #[error("Engine returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid engine response: {0}")]
    InvalidResponse(String),

    #[error("Engine rejected request: {0}")]
    Rejected(String),

    #[error("Unknown palette: {0}")]
    UnknownPalette(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            EngineError::InvalidResponse(e.to_string())
        } else {
            EngineError::Transport(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(#[from] ParamsError),

    #[error("Invalid color: {0}")]
    InvalidColor(#[from] ParseColorError),

    #[error("Palette not found: {category}:{name}")]
    PaletteNotFound { category: String, name: String },

    #[error("Engine not ready")]
    EngineNotReady,

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidParameters(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidColor(_) => StatusCode::BAD_REQUEST,
            ApiError::PaletteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::EngineNotReady => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Engine(EngineError::NotReady) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Engine(EngineError::UnknownPalette(_)) => StatusCode::NOT_FOUND,
            ApiError::Engine(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
