//! Pipeline fixtures and timing helpers.
//!
//! Pipeline tests run with a paused clock: sleeping lets every ready task
//! run before the clock jumps, so the debounce window is deterministic.

use std::sync::Arc;
use std::time::Duration;

use palette_pilot::models::GenerationParameters;
use palette_pilot::services::{
    Pipeline, PipelineConfig, PipelineHandle, PipelineState, RequestState,
};

use super::stub_engine::StubEngine;

pub const DEBOUNCE: Duration = Duration::from_millis(300);

pub fn pipeline_config() -> PipelineConfig {
    PipelineConfig {
        debounce: DEBOUNCE,
        analysis_max_memory: 4.0,
        initial_params: GenerationParameters::default(),
    }
}

/// Spawn a pipeline over the given stub
pub fn spawn_pipeline(engine: &Arc<StubEngine>) -> PipelineHandle {
    Pipeline::spawn(engine.clone(), pipeline_config())
}

/// Spawn a pipeline and wait until the start-up generation has landed
pub async fn ready_pipeline(engine: &Arc<StubEngine>) -> PipelineHandle {
    let handle = spawn_pipeline(engine);
    wait_for_state(&handle, |s| s.ready && s.request_state == RequestState::Fulfilled).await;
    settle().await;
    handle
}

/// Wait until the published state satisfies `predicate`
pub async fn wait_for_state(
    handle: &PipelineHandle,
    predicate: impl FnMut(&PipelineState) -> bool,
) -> PipelineState {
    let mut rx = handle.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(30), rx.wait_for(predicate))
        .await
        .expect("Timed out waiting for pipeline state")
        .expect("Pipeline stopped");
    state.clone()
}

/// Let every runnable task finish without reaching the debounce deadline
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

/// Let the debounce window elapse and the resulting request complete
pub async fn past_debounce() {
    tokio::time::sleep(DEBOUNCE + Duration::from_millis(50)).await;
}

pub fn params_with_count(num_colors: usize) -> GenerationParameters {
    GenerationParameters {
        num_colors,
        ..Default::default()
    }
}
