use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Cylindrical color space a region is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ColorspaceType {
    /// Hue / saturation / lightness
    #[default]
    Hsl,
    /// Hue / chroma / lightness in CIE L*a*b*
    Lchab,
}

impl ColorspaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorspaceType::Hsl => "HSL",
            ColorspaceType::Lchab => "LCHab",
        }
    }
}

/// One rectangular constraint box in a cylindrical color space.
///
/// Hue is in degrees and circular: `hue_min > hue_max` describes an arc that
/// crosses the 0°/360° seam. The second axis is saturation (HSL) or chroma
/// (LCHab).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ColorSpaceRegion {
    pub hue_min: f64,
    pub hue_max: f64,
    pub s_or_c_min: f64,
    pub s_or_c_max: f64,
    pub light_min: f64,
    pub light_max: f64,
}

/// A non-hue axis of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RegionAxis {
    SaturationOrChroma,
    Lightness,
}

impl ColorSpaceRegion {
    pub fn new(hue: (f64, f64), s_or_c: (f64, f64), light: (f64, f64)) -> Self {
        Self {
            hue_min: hue.0,
            hue_max: hue.1,
            s_or_c_min: s_or_c.0,
            s_or_c_max: s_or_c.1,
            light_min: light.0,
            light_max: light.1,
        }
    }

    /// True when the hue interval crosses the 0°/360° seam
    pub fn is_wraparound(&self) -> bool {
        self.hue_min > self.hue_max
    }

    /// Arc length in degrees covered by the hue interval, read modulo 360.
    pub fn hue_arc(&self) -> f64 {
        (self.hue_max - self.hue_min).rem_euclid(360.0)
    }

    /// Non-hue axes whose minimum exceeds their maximum
    pub fn inverted_axes(&self) -> Vec<RegionAxis> {
        let mut axes = Vec::new();
        if self.s_or_c_min > self.s_or_c_max {
            axes.push(RegionAxis::SaturationOrChroma);
        }
        if self.light_min > self.light_max {
            axes.push(RegionAxis::Lightness);
        }
        axes
    }
}

impl Default for ColorSpaceRegion {
    fn default() -> Self {
        Self::new((20.0, 280.0), (0.4, 0.8), (0.3, 0.7))
    }
}
