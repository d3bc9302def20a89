//! Assembles an engine-ready request from the current parameters.
//!
//! Input source resolution, first match wins:
//! 1. fixed input colors, when they parse to at least one color
//! 2. the configured regions, normalized
//! 3. a single default region
//!
//! Background, white point and CVD are layered on independently. Extension
//! degrades to plain generation when the seed palette holds no colors.

use super::advisory::Advisory;
use super::color_parser::parse_colors;
use super::engine::{Constraints, EngineRequest, InputSource, Operation};
use super::region_normalizer::normalize_regions;
use crate::models::{Color, ColorSpaceRegion, GenerationParameters};

/// A built request plus the degradations that happened while building it
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRequest {
    pub request: EngineRequest,
    pub advisories: Vec<Advisory>,
}

/// Build the engine request for a parameter snapshot.
///
/// Never fails: malformed input resolves through a fallback and is reported
/// in [`BuiltRequest::advisories`].
pub fn build_request(params: &GenerationParameters) -> BuiltRequest {
    let mut advisories = Vec::new();

    let input = resolve_input(params, &mut advisories);
    let background = resolve_background(params, &mut advisories);
    let cvd = params.cvd.is_active().then_some(params.cvd);

    let operation = if params.use_extend {
        let existing = parse_colors(&params.existing_palette);
        if existing.is_empty() {
            tracing::warn!("No valid existing colors found, generating new palette");
            advisories.push(Advisory::ExtendFellBack);
            Operation::Generate {
                count: params.num_colors,
            }
        } else {
            tracing::debug!(seed = existing.len(), total = params.num_colors, "Extending palette");
            Operation::Extend {
                existing,
                total: params.num_colors,
            }
        }
    } else {
        Operation::Generate {
            count: params.num_colors,
        }
    };

    BuiltRequest {
        request: EngineRequest {
            operation,
            constraints: Constraints {
                input,
                background,
                white_point: params.white_point,
                cvd,
            },
        },
        advisories,
    }
}

fn resolve_input(params: &GenerationParameters, advisories: &mut Vec<Advisory>) -> InputSource {
    if let Some(text) = params.input_colors.as_deref().filter(|t| !t.trim().is_empty()) {
        let colors = parse_colors(text);
        if !colors.is_empty() {
            return InputSource::Colors { colors };
        }
        tracing::warn!("Input colors could not be parsed, falling back to regions");
        advisories.push(Advisory::InputColorsIgnored);
    }

    let regions = if params.regions.is_empty() {
        tracing::warn!("No regions configured, using default region");
        advisories.push(Advisory::DefaultRegionUsed);
        vec![ColorSpaceRegion::default()]
    } else {
        normalize_regions(&params.regions)
    };

    for (index, region) in regions.iter().enumerate() {
        let axes = region.inverted_axes();
        if !axes.is_empty() {
            tracing::warn!(region = index, axes = ?axes, "Region has inverted bounds");
            advisories.push(Advisory::InvertedBounds {
                region: index,
                axes,
            });
        }
    }

    InputSource::Regions {
        regions,
        colorspace: params.colorspace,
    }
}

fn resolve_background(
    params: &GenerationParameters,
    advisories: &mut Vec<Advisory>,
) -> Option<Color> {
    if !params.use_background {
        return None;
    }
    match params.background.parse::<Color>() {
        Ok(color) => Some(color),
        Err(e) => {
            tracing::warn!(%e, background = %params.background, "Ignoring invalid background");
            advisories.push(Advisory::InvalidBackground {
                value: params.background.clone(),
            });
            None
        }
    }
}

/// Background the analysis should use: only when enabled and valid
pub fn effective_background(params: &GenerationParameters) -> Option<Color> {
    if params.use_background {
        params.background.parse().ok()
    } else {
        None
    }
}
