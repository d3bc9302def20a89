//! Non-fatal notifications for the UI.
//!
//! Degradations (unusable paste input, fallbacks) and engine failures never
//! stop the pipeline; they are published here so the UI can show a toast.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tokio::sync::broadcast;

use crate::models::RegionAxis;

/// Something the user should know about but that did not stop the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Extension requested but the existing palette held no colors
    ExtendFellBack,
    /// Fixed input colors were given but none could be parsed
    InputColorsIgnored,
    /// No regions configured; the built-in default region was used
    DefaultRegionUsed,
    /// A region has min > max on a non-hue axis
    InvertedBounds { region: usize, axes: Vec<RegionAxis> },
    /// Background enabled but its color text is not a valid hex color
    InvalidBackground { value: String },
    EngineUnavailable { reason: String },
    GenerationFailed { reason: String },
    AnalysisFailed { reason: String },
    CatalogUnavailable { reason: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::ExtendFellBack => {
                write!(f, "No valid existing colors found, generated a new palette instead")
            }
            Advisory::InputColorsIgnored => {
                write!(f, "No valid input colors found, using color-space regions")
            }
            Advisory::DefaultRegionUsed => {
                write!(f, "No regions configured, using the default region")
            }
            Advisory::InvertedBounds { region, axes } => {
                write!(f, "Region {} has inverted bounds: ", region + 1)?;
                let names: Vec<&str> = axes
                    .iter()
                    .map(|axis| match axis {
                        RegionAxis::SaturationOrChroma => "saturation/chroma",
                        RegionAxis::Lightness => "lightness",
                    })
                    .collect();
                write!(f, "{}", names.join(", "))
            }
            Advisory::InvalidBackground { value } => {
                write!(f, "Background '{value}' is not a valid color and was ignored")
            }
            Advisory::EngineUnavailable { reason } => {
                write!(f, "Palette engine unavailable: {reason}")
            }
            Advisory::GenerationFailed { reason } => {
                write!(f, "Palette generation failed: {reason}")
            }
            Advisory::AnalysisFailed { reason } => write!(f, "Palette analysis failed: {reason}"),
            Advisory::CatalogUnavailable { reason } => {
                write!(f, "Built-in palettes unavailable: {reason}")
            }
        }
    }
}

/// A published advisory with its timestamp and rendered message
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub advisory: Advisory,
    pub message: String,
}

/// Broadcast channel for advisories
#[derive(Clone)]
pub struct AdvisoryBus {
    sender: broadcast::Sender<Notice>,
}

impl AdvisoryBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(32);
        Self { sender }
    }

    /// Publish an advisory; dropped silently when nobody is listening
    pub fn publish(&self, advisory: Advisory) {
        let notice = Notice {
            at: Utc::now(),
            message: advisory.to_string(),
            advisory,
        };
        let _ = self.sender.send(notice);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }
}

impl Default for AdvisoryBus {
    fn default() -> Self {
        Self::new()
    }
}
