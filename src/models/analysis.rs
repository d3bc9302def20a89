use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Distinguishability figures for one simulated vision type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VisionAnalysis {
    /// Pairwise color differences, row-major, one row per palette color
    pub difference_matrix: Vec<Vec<f64>>,
    /// Smallest difference from each color to any other color
    pub min_distances: Vec<f64>,
    /// Smallest difference to the background, if one was supplied
    #[serde(default)]
    pub bg_min_distance: Option<f64>,
}

/// Engine output describing how distinguishable a palette is.
///
/// Keyed by vision type: `normal` plus each simulated deficiency.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AnalysisResult {
    pub by_vision: BTreeMap<String, VisionAnalysis>,
}

impl AnalysisResult {
    pub fn get(&self, vision: &str) -> Option<&VisionAnalysis> {
        self.by_vision.get(vision)
    }

    /// Smallest pairwise difference under normal vision
    pub fn normal_min_distance(&self) -> Option<f64> {
        self.get("normal")?
            .min_distances
            .iter()
            .copied()
            .reduce(f64::min)
    }
}
