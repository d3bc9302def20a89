//! Canonical, non-wrapping form of color-space regions.

use crate::models::ColorSpaceRegion;

/// Resolve hue wraparound so that `hue_min <= hue_max` numerically.
///
/// A wraparound interval (min > max) gets its minimum shifted down by 360°,
/// which keeps the same arc when read modulo 360. Non-hue bounds pass through
/// untouched, inverted or not.
pub fn normalize_region(region: &ColorSpaceRegion) -> ColorSpaceRegion {
    if region.is_wraparound() {
        ColorSpaceRegion {
            hue_min: region.hue_min - 360.0,
            ..*region
        }
    } else {
        *region
    }
}

/// Normalize each region independently, preserving order.
pub fn normalize_regions(regions: &[ColorSpaceRegion]) -> Vec<ColorSpaceRegion> {
    regions.iter().map(normalize_region).collect()
}
