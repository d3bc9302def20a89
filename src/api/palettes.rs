use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ApiError, EngineError};
use crate::server::AppState;
use crate::services::PaletteCatalog;

#[derive(Debug, Serialize, ToSchema)]
pub struct BuiltinPaletteResponse {
    pub category: String,
    pub name: String,
    pub colors: Vec<String>,
}

/// List built-in palettes by category
#[utoipa::path(
    get,
    path = "/api/palettes",
    responses(
        (
            status = 200,
            description = "Palette names keyed by category",
            body = std::collections::BTreeMap<String, Vec<String>>
        ),
        (status = 503, description = "Engine not ready"),
    ),
    tag = "Palettes"
)]
pub async fn handle_list_palettes(
    State(state): State<AppState>,
) -> Result<Json<PaletteCatalog>, ApiError> {
    let snapshot = state.pipeline.snapshot();
    if !snapshot.ready {
        return Err(ApiError::EngineNotReady);
    }
    Ok(Json(snapshot.builtin_palettes))
}

/// Colors of one built-in palette
#[utoipa::path(
    get,
    path = "/api/palettes/{category}/{name}",
    params(
        ("category" = String, Path, description = "Palette category"),
        ("name" = String, Path, description = "Palette name"),
    ),
    responses(
        (status = 200, description = "Palette colors", body = BuiltinPaletteResponse),
        (status = 404, description = "Unknown palette"),
        (status = 503, description = "Engine not ready"),
    ),
    tag = "Palettes"
)]
pub async fn handle_palette_colors(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
) -> Result<Json<BuiltinPaletteResponse>, ApiError> {
    let result = state.pipeline.builtin_palette_colors(&category, &name).await;
    let colors = match result {
        Ok(colors) => colors,
        Err(EngineError::UnknownPalette(_)) => {
            return Err(ApiError::PaletteNotFound { category, name });
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(BuiltinPaletteResponse {
        colors: colors.iter().map(|c| c.to_hex()).collect(),
        category,
        name,
    }))
}
