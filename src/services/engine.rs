//! The palette engine capability.
//!
//! The engine is an external numerical service (palette optimisation,
//! perceptual distances, CVD simulation). The pipeline only ever talks to it
//! through [`Engine`], which is injected so tests can substitute a stub.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::EngineError;
use crate::models::{
    AnalysisResult, Color, ColorSpaceRegion, ColorspaceType, CvdType, CvdVector, WhitePoint,
};

/// Where candidate colors come from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputSource {
    /// Explicit candidate colors
    Colors { colors: Vec<Color> },
    /// Normalized color-space regions
    Regions {
        regions: Vec<ColorSpaceRegion>,
        colorspace: ColorspaceType,
    },
}

/// Everything that constrains a generation besides the count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constraints {
    pub input: InputSource,
    pub background: Option<Color>,
    pub white_point: WhitePoint,
    /// Generation-time CVD optimisation; absent when all severities are 0
    pub cvd: Option<CvdVector>,
}

/// What the engine is asked to do
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    Generate { count: usize },
    Extend { existing: Vec<Color>, total: usize },
}

/// A complete, engine-ready generation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineRequest {
    #[serde(flatten)]
    pub operation: Operation,
    pub constraints: Constraints,
}

impl EngineRequest {
    /// Run this request against an engine
    pub async fn execute(&self, engine: &dyn Engine) -> Result<Vec<Color>, EngineError> {
        match &self.operation {
            Operation::Generate { count } => engine.generate(*count, &self.constraints).await,
            Operation::Extend { existing, total } => {
                engine.extend(existing, *total, &self.constraints).await
            }
        }
    }

    pub fn is_extend(&self) -> bool {
        matches!(self.operation, Operation::Extend { .. })
    }
}

/// Input to a perceptual analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub colors: Vec<Color>,
    pub cvd: CvdVector,
    pub background: Option<Color>,
    pub max_memory: f64,
}

/// Built-in palette catalogue: category name to palette names
pub type PaletteCatalog = BTreeMap<String, Vec<String>>;

/// Capability interface to the palette engine
#[async_trait]
pub trait Engine: Send + Sync {
    /// Wait until the engine can serve requests
    async fn load(&self) -> Result<(), EngineError>;

    /// Generate `count` colors within the constraints, in placement order
    async fn generate(&self, count: usize, constraints: &Constraints)
        -> Result<Vec<Color>, EngineError>;

    /// Grow `existing` (non-empty) to `total` colors
    async fn extend(
        &self,
        existing: &[Color],
        total: usize,
        constraints: &Constraints,
    ) -> Result<Vec<Color>, EngineError>;

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, EngineError>;

    /// Simulate how one color looks under a deficiency
    async fn simulate_vision(
        &self,
        color: Color,
        cvd_type: CvdType,
        severity: f64,
    ) -> Result<Color, EngineError>;

    async fn list_builtin_palettes(&self) -> Result<PaletteCatalog, EngineError>;

    /// Hex strings of one built-in palette
    async fn builtin_palette_colors(
        &self,
        category: &str,
        name: &str,
    ) -> Result<Vec<String>, EngineError>;
}

/// Shared engine handle injected into the pipeline
pub type SharedEngine = Arc<dyn Engine>;
