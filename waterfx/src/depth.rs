//! Stateless mapping from water level (and viewer depth) to visual parameters.
//!
//! Every output is a monotone linear blend anchored at a floor, so a deep
//! scene darkens without ever reaching pure black.

use crate::color::Rgb;
use crate::config::{EffectsConfig, FogConfig};

/// Lowest green/blue value the surface tint may reach.
pub const TINT_FLOOR: f32 = 0.05;
pub const SURFACE_OPACITY_MIN: f32 = 0.8;
pub const SURFACE_OPACITY_MAX: f32 = 0.92;
/// Fog color never darkens below this fraction of its configured base.
const FOG_COLOR_FLOOR: f32 = 0.35;

/// Per-frame visual parameters derived from the current level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthParams {
    pub depth_factor: f32,
    pub tint: Rgb,
    pub opacity: f32,
}

pub fn depth_factor(level: f32, max_rise: f32) -> f32 {
    if !(max_rise > 0.0) || !level.is_finite() {
        return 0.0;
    }
    (level / max_rise).clamp(0.0, 1.0)
}

pub fn surface_tint(d: f32) -> Rgb {
    Rgb::new(
        0.0,
        (0.11 - d * 0.08).max(TINT_FLOOR),
        (0.15 - d * 0.10).max(TINT_FLOOR),
    )
}

pub fn surface_opacity(d: f32) -> f32 {
    (SURFACE_OPACITY_MIN + (SURFACE_OPACITY_MAX - SURFACE_OPACITY_MIN) * d)
        .clamp(SURFACE_OPACITY_MIN, SURFACE_OPACITY_MAX)
}

/// How far the water has risen past the crossing line `viewer_y - threshold`.
///
/// `level - viewer_y` is usually still zero on the frame the regime flips, so
/// depth for the entry fog is measured from the crossing line instead.
pub fn entry_depth(level: f32, viewer_y: f32, threshold: f32) -> f32 {
    (level - (viewer_y - threshold)).max(0.0)
}

pub fn fog_density(fog: &FogConfig, viewer_depth: f32) -> f32 {
    (fog.base_density + fog.density_per_meter * viewer_depth.max(0.0)).min(fog.max_density)
}

pub fn fog_color(fog: &FogConfig, d: f32) -> Rgb {
    fog.color.scale((1.0 - 0.5 * d).max(FOG_COLOR_FLOOR))
}

pub fn map(cfg: &EffectsConfig, level: f32) -> DepthParams {
    let d = depth_factor(level, cfg.max_water_rise);
    DepthParams { depth_factor: d, tint: surface_tint(d), opacity: surface_opacity(d) }
}
