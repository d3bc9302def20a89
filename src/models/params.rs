use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::cvd::CvdVector;
use super::region::{ColorSpaceRegion, ColorspaceType};
use crate::error::ParamsError;

/// Reference white used by the engine for color-space conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum WhitePoint {
    #[default]
    D65,
    D50,
    D55,
    A,
    E,
}

impl WhitePoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            WhitePoint::D65 => "D65",
            WhitePoint::D50 => "D50",
            WhitePoint::D55 => "D55",
            WhitePoint::A => "A",
            WhitePoint::E => "E",
        }
    }
}

impl fmt::Display for WhitePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full snapshot of what the user asked for.
///
/// Color lists are kept as the raw pasted text; they are parsed when a
/// request is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GenerationParameters {
    /// Number of colors to generate (total size when extending)
    #[serde(default = "default_num_colors")]
    pub num_colors: usize,

    /// Color-space regions to sample from, in priority order
    #[serde(default = "default_regions")]
    pub regions: Vec<ColorSpaceRegion>,

    /// Space the regions are expressed in
    #[serde(default)]
    pub colorspace: ColorspaceType,

    /// Fixed candidate colors; wins over regions when it parses to anything
    #[serde(default)]
    pub input_colors: Option<String>,

    #[serde(default)]
    pub use_background: bool,

    /// Background color as hex text
    #[serde(default = "default_background")]
    pub background: String,

    #[serde(default)]
    pub white_point: WhitePoint,

    #[serde(default)]
    pub use_extend: bool,

    /// Palette to extend, as pasted text
    #[serde(default)]
    pub existing_palette: String,

    /// Generation-time CVD optimisation strengths
    #[serde(default)]
    pub cvd: CvdVector,
}

fn default_num_colors() -> usize {
    5
}

fn default_regions() -> Vec<ColorSpaceRegion> {
    vec![ColorSpaceRegion::default()]
}

fn default_background() -> String {
    "#FFFFFF".to_string()
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            num_colors: default_num_colors(),
            regions: default_regions(),
            colorspace: ColorspaceType::Hsl,
            input_colors: None,
            use_background: false,
            background: default_background(),
            white_point: WhitePoint::D65,
            use_extend: false,
            existing_palette: String::new(),
            cvd: CvdVector::default(),
        }
    }
}

impl GenerationParameters {
    /// Reject values the UI must never propose.
    ///
    /// Malformed color text and inverted non-hue bounds are not checked here;
    /// those degrade gracefully when the request is built.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.num_colors == 0 {
            return Err(ParamsError::ZeroColors);
        }
        if let Some(cvd_type) = self.cvd.out_of_range().first() {
            return Err(ParamsError::SeverityOutOfRange {
                field: cvd_type.as_str(),
                value: self.cvd.get(*cvd_type),
            });
        }
        Ok(())
    }
}
