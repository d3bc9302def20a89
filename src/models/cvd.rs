use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Color-vision deficiency type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CvdType {
    #[default]
    Protan,
    Deutan,
    Tritan,
}

impl CvdType {
    pub const ALL: [CvdType; 3] = [CvdType::Protan, CvdType::Deutan, CvdType::Tritan];

    pub fn as_str(&self) -> &'static str {
        match self {
            CvdType::Protan => "protan",
            CvdType::Deutan => "deutan",
            CvdType::Tritan => "tritan",
        }
    }
}

impl fmt::Display for CvdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-deficiency severities, each in 0.0..=1.0 (0 = no adjustment)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct CvdVector {
    #[serde(default)]
    pub protan: f64,
    #[serde(default)]
    pub deutan: f64,
    #[serde(default)]
    pub tritan: f64,
}

impl CvdVector {
    pub fn new(protan: f64, deutan: f64, tritan: f64) -> Self {
        Self {
            protan,
            deutan,
            tritan,
        }
    }

    /// Same severity on all three channels
    pub fn uniform(severity: f64) -> Self {
        Self::new(severity, severity, severity)
    }

    pub fn get(&self, cvd_type: CvdType) -> f64 {
        match cvd_type {
            CvdType::Protan => self.protan,
            CvdType::Deutan => self.deutan,
            CvdType::Tritan => self.tritan,
        }
    }

    /// True when at least one severity exceeds zero
    pub fn is_active(&self) -> bool {
        CvdType::ALL.iter().any(|t| self.get(*t) > 0.0)
    }

    /// Severities that fall outside 0.0..=1.0 (NaN included)
    pub fn out_of_range(&self) -> Vec<CvdType> {
        CvdType::ALL
            .into_iter()
            .filter(|t| !(0.0..=1.0).contains(&self.get(*t)))
            .collect()
    }
}

/// Review-only CVD simulation toggled from the UI.
///
/// When enabled it replaces the generation CVD vector for analysis only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CvdSimulationState {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, rename = "type")]
    pub cvd_type: CvdType,
    #[serde(default = "default_severity")]
    pub severity: f64,
}

fn default_severity() -> f64 {
    0.5
}

impl Default for CvdSimulationState {
    fn default() -> Self {
        Self {
            enabled: false,
            cvd_type: CvdType::Protan,
            severity: default_severity(),
        }
    }
}
