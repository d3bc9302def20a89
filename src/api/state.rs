//! Pipeline state snapshot and live event stream.

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures_util::stream::Stream;
use std::convert::Infallible;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tokio_stream::StreamExt;

use crate::server::AppState;
use crate::services::PipelineState;

/// Current pipeline state
///
/// Params, palette, analysis and flags are captured at the same instant.
#[utoipa::path(
    get,
    path = "/api/state",
    responses(
        (status = 200, description = "Consistent state snapshot", body = PipelineState),
    ),
    tag = "State"
)]
pub async fn handle_state(State(state): State<AppState>) -> Json<PipelineState> {
    Json(state.pipeline.snapshot())
}

/// Server-sent events: `state` on every snapshot change, `advisory` for
/// degradations and failures.
pub async fn handle_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let snapshots = WatchStream::new(state.pipeline.subscribe()).map(|snapshot| {
        Ok(Event::default()
            .event("state")
            .data(serde_json::to_string(&snapshot).unwrap_or_default()))
    });

    let advisories = BroadcastStream::new(state.pipeline.advisories()).map(|result| {
        match result {
            Ok(notice) => Ok(Event::default()
                .event("advisory")
                .data(serde_json::to_string(&notice).unwrap_or_default())),
            Err(_) => {
                // Lagged - the client should refetch the state
                Ok(Event::default().event("refresh").data("lagged"))
            }
        }
    });

    Sse::new(snapshots.merge(advisories)).keep_alive(KeepAlive::default())
}
