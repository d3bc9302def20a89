//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::models::AppConfig;
use crate::services::{HttpEngine, Pipeline, PipelineConfig, PipelineHandle, SharedEngine};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: PipelineHandle,
}

/// Start the pipeline against an already constructed engine.
///
/// Must be called from within a tokio runtime.
pub fn create_app_state_with_engine(engine: SharedEngine, config: &AppConfig) -> AppState {
    let pipeline = Pipeline::spawn(engine, PipelineConfig::from(config));
    AppState { pipeline }
}

/// Create application state talking to the configured HTTP engine.
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let engine = HttpEngine::new(config.engine.url.clone(), config.engine_timeout())
        .map_err(|e| anyhow::anyhow!("Failed to create engine client: {e}"))?;
    tracing::info!(url = %engine.base_url(), "Palette engine configured");
    Ok(create_app_state_with_engine(
        std::sync::Arc::new(engine),
        config,
    ))
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Pipeline state
        .route("/api/state", get(api::handle_state))
        .route("/api/events", get(api::handle_events))
        // Generation
        .route("/api/params", put(api::handle_update_params))
        .route("/api/generate", post(api::handle_generate))
        .route("/api/parse", post(api::handle_parse))
        // CVD review
        .route("/api/cvd-simulation", put(api::handle_set_simulation))
        .route(
            "/api/cvd-simulation/toggle",
            post(api::handle_toggle_simulation),
        )
        .route("/api/simulate", post(api::handle_simulate))
        // Built-in palettes
        .route("/api/palettes", get(api::handle_list_palettes))
        .route(
            "/api/palettes/:category/:name",
            get(api::handle_palette_colors),
        )
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
