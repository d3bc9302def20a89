use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Json as JsonExtractor,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::params::AcceptedResponse;
use crate::error::{ApiError, ParamsError};
use crate::models::{Color, CvdSimulationState};
use crate::server::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SimulateRequest {
    /// Color to preview, as `#RRGGBB`
    pub color: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SimulateResponse {
    pub color: String,
    /// The color as seen under the active simulation
    pub simulated: String,
    /// Whether a simulation was actually applied
    pub applied: bool,
}

/// Replace the review-only CVD simulation
#[utoipa::path(
    put,
    path = "/api/cvd-simulation",
    request_body = CvdSimulationState,
    responses(
        (status = 202, description = "Simulation updated", body = AcceptedResponse),
        (status = 400, description = "Severity out of range"),
    ),
    tag = "CVD"
)]
pub async fn handle_set_simulation(
    State(state): State<AppState>,
    JsonExtractor(simulation): JsonExtractor<CvdSimulationState>,
) -> Result<impl IntoResponse, ApiError> {
    if !(0.0..=1.0).contains(&simulation.severity) {
        return Err(ParamsError::SeverityOutOfRange {
            field: "severity",
            value: simulation.severity,
        }
        .into());
    }

    state.pipeline.set_cvd_simulation(simulation);
    Ok(AcceptedResponse::new("Simulation updated"))
}

/// Flip the simulation on or off
#[utoipa::path(
    post,
    path = "/api/cvd-simulation/toggle",
    responses(
        (status = 202, description = "Simulation toggled", body = AcceptedResponse),
    ),
    tag = "CVD"
)]
pub async fn handle_toggle_simulation(State(state): State<AppState>) -> impl IntoResponse {
    state.pipeline.toggle_cvd_simulation();
    AcceptedResponse::new("Simulation toggled")
}

/// Preview a single color under the active simulation
///
/// Falls back to the input color when simulation is off or the engine
/// cannot answer.
#[utoipa::path(
    post,
    path = "/api/simulate",
    request_body = SimulateRequest,
    responses(
        (status = 200, description = "Simulated color", body = SimulateResponse),
        (status = 400, description = "Invalid color"),
    ),
    tag = "CVD"
)]
pub async fn handle_simulate(
    State(state): State<AppState>,
    JsonExtractor(request): JsonExtractor<SimulateRequest>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let color: Color = request.color.parse()?;
    let (simulated, applied) = state.pipeline.simulate_color(color).await;

    Ok(Json(SimulateResponse {
        color: color.to_hex(),
        simulated: simulated.to_hex(),
        applied,
    }))
}
