//! Re-derives the analysis request from palette, CVD overlay and params.
//!
//! Only the inputs that actually feed an analysis are tracked: the palette
//! (by revision), the effective CVD vector, the effective background and the
//! white point. Any other parameter change leaves the analysis alone.

use crate::error::EngineError;
use crate::models::{
    AnalysisResult, Color, CvdSimulationState, CvdVector, GenerationParameters, WhitePoint,
};
use crate::services::engine::AnalysisRequest;
use crate::services::request_builder::effective_background;

/// CVD vector to analyse with.
///
/// An enabled simulation applies its single severity to all three channels,
/// regardless of the selected type. Otherwise the generation vector is used.
pub fn effective_cvd(generation: CvdVector, simulation: &CvdSimulationState) -> CvdVector {
    if simulation.enabled {
        CvdVector::uniform(simulation.severity)
    } else {
        generation
    }
}

/// Snapshot of everything an analysis depends on
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInputs {
    /// Bumped on every applied generation
    pub palette_revision: u64,
    pub palette: Vec<Color>,
    pub cvd: CvdVector,
    pub background: Option<Color>,
    pub white_point: WhitePoint,
}

impl AnalysisInputs {
    pub fn capture(
        palette_revision: u64,
        palette: &[Color],
        params: &GenerationParameters,
        simulation: &CvdSimulationState,
    ) -> Self {
        Self {
            palette_revision,
            palette: palette.to_vec(),
            cvd: effective_cvd(params.cvd, simulation),
            background: effective_background(params),
            white_point: params.white_point,
        }
    }
}

/// Permission to run one analysis call
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisTicket {
    pub token: u64,
    pub request: AnalysisRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisDecision {
    /// Inputs did not change; keep the current result
    Unchanged,
    /// Nothing to analyse; the result becomes absent without an engine call
    Clear,
    Request(AnalysisTicket),
}

pub struct AnalysisCompositor {
    max_memory: f64,
    last_inputs: Option<AnalysisInputs>,
    latest_token: u64,
}

impl AnalysisCompositor {
    pub fn new(max_memory: f64) -> Self {
        Self {
            max_memory,
            last_inputs: None,
            latest_token: 0,
        }
    }

    /// Decide whether the inputs call for a new analysis.
    ///
    /// Any decision other than `Unchanged` invalidates analyses in flight.
    pub fn recompute(&mut self, inputs: AnalysisInputs) -> AnalysisDecision {
        if self.last_inputs.as_ref() == Some(&inputs) {
            return AnalysisDecision::Unchanged;
        }

        self.latest_token += 1;
        let decision = if inputs.palette.is_empty() {
            AnalysisDecision::Clear
        } else {
            AnalysisDecision::Request(AnalysisTicket {
                token: self.latest_token,
                request: AnalysisRequest {
                    colors: inputs.palette.clone(),
                    cvd: inputs.cvd,
                    background: inputs.background,
                    max_memory: self.max_memory,
                },
            })
        };
        self.last_inputs = Some(inputs);
        decision
    }

    /// Resolve a finished analysis.
    ///
    /// Returns `None` for a superseded call, otherwise the value the analysis
    /// state should take: the result, or absent on failure.
    pub fn complete(
        &mut self,
        token: u64,
        outcome: Result<AnalysisResult, EngineError>,
    ) -> Option<Option<AnalysisResult>> {
        if token != self.latest_token {
            tracing::debug!(token, latest = self.latest_token, "Discarding stale analysis");
            return None;
        }
        match outcome {
            Ok(result) => Some(Some(result)),
            Err(e) => {
                tracing::error!(error = %e, token, "Palette analysis failed");
                Some(None)
            }
        }
    }

    /// Forget the last inputs so the next recompute always issues
    pub fn reset(&mut self) {
        self.last_inputs = None;
    }
}
