use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;

/// Largest accepted `max_water_rise`, in scene units. The gauge gets one tick
/// node per two units, so this also bounds the node count.
pub const MAX_WATER_RISE_LIMIT: f32 = 1_000.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max_water_rise must lie in (0, 1000] (got {0})")]
    MaxRise(f32),
    #[error("smoothing_alpha must lie in (0, 1] (got {0})")]
    Alpha(f32),
    #[error("time-scaled smoothing needs a positive reference rate (got {0} Hz)")]
    ReferenceRate(f32),
    #[error("end_year {end} precedes start_year {start}")]
    Years { start: i32, end: i32 },
    #[error("caustics.frame_cadence must be at least 1")]
    Cadence,
    #[error("caustics.texture_count must be at least 1")]
    TextureCount,
    #[error("{field} must lie in [0, 1] (got {value})")]
    UnitRange { field: &'static str, value: f32 },
    #[error("fog densities must satisfy 0 <= base_density <= max_density")]
    FogDensity,
    #[error("{field} must be finite")]
    NotFinite { field: &'static str },
}

/// How the level integrator turns its smoothing constant into a per-tick blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Fixed blend per rendered frame; convergence speed follows frame rate.
    PerFrame,
    /// Blend rescaled by `dt` so that at `reference_hz` it matches `PerFrame`.
    TimeScaled { reference_hz: f32 },
}

impl Default for SmoothingMode {
    fn default() -> Self {
        Self::PerFrame
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CausticConfig {
    pub layer_count: usize,
    /// Frames between texture-index advances.
    pub frame_cadence: u32,
    /// Animation clock increment per tick.
    pub time_step: f32,
    pub base_speed: f32,
    /// UV radius of the circular drift patterns.
    pub radius: f32,
    /// Extra speed per layer index: layer i runs at `1 + speed_spread * i`.
    pub speed_spread: f32,
    /// Frame offset between neighbouring layers.
    pub stagger: usize,
    /// Number of frames requested from the texture loader.
    pub texture_count: usize,
    pub above_opacity: f32,
    pub below_opacity: f32,
    pub max_opacity: f32,
}

impl Default for CausticConfig {
    fn default() -> Self {
        Self {
            layer_count: 3,
            frame_cadence: 8,
            time_step: 0.016,
            base_speed: 0.05,
            radius: 0.15,
            speed_spread: 0.35,
            stagger: 1,
            texture_count: 16,
            above_opacity: 0.15,
            below_opacity: 0.45,
            max_opacity: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    pub color: Rgb,
    pub base_density: f32,
    /// Density gained per unit of viewer depth below the surface.
    pub density_per_meter: f32,
    pub max_density: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            color: Rgb::new(0.02, 0.12, 0.18),
            base_density: 0.04,
            density_per_meter: 0.03,
            max_density: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub underwater_clear_color: Rgb,
    /// Multiplier applied to every directional light while below water.
    pub directional_dim_factor: f32,
    pub underwater_light_color: Rgb,
    pub underwater_light_illuminance: f32,
    pub marker_light_illuminance: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            underwater_clear_color: Rgb::new(0.0, 0.18, 0.26),
            directional_dim_factor: 0.35,
            underwater_light_color: Rgb::new(0.35, 0.65, 0.8),
            underwater_light_illuminance: 400.0,
            marker_light_illuminance: 3_000.0,
        }
    }
}

/// Full controller configuration. Every field has a default so a partial TOML
/// file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub max_water_rise: f32,
    pub start_year: i32,
    pub end_year: i32,
    pub smoothing_alpha: f32,
    pub smoothing: SmoothingMode,
    /// Depth offset before the underwater transition fires.
    pub underwater_threshold: f32,
    /// Edge length of the square water plane.
    pub surface_size: f32,
    pub caustics: CausticConfig,
    pub fog: FogConfig,
    pub lighting: LightingConfig,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            max_water_rise: 10.0,
            start_year: 2030,
            end_year: 2100,
            smoothing_alpha: 0.05,
            smoothing: SmoothingMode::PerFrame,
            underwater_threshold: 0.5,
            surface_size: 8.0,
            caustics: CausticConfig::default(),
            fog: FogConfig::default(),
            lighting: LightingConfig::default(),
        }
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::UnitRange { field, value })
    }
}

impl EffectsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_water_rise > 0.0 && self.max_water_rise <= MAX_WATER_RISE_LIMIT) {
            return Err(ConfigError::MaxRise(self.max_water_rise));
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(ConfigError::Alpha(self.smoothing_alpha));
        }
        if let SmoothingMode::TimeScaled { reference_hz } = self.smoothing {
            if !(reference_hz.is_finite() && reference_hz > 0.0) {
                return Err(ConfigError::ReferenceRate(reference_hz));
            }
        }
        if self.end_year < self.start_year {
            return Err(ConfigError::Years { start: self.start_year, end: self.end_year });
        }
        if !self.underwater_threshold.is_finite() {
            return Err(ConfigError::NotFinite { field: "underwater_threshold" });
        }
        if !(self.surface_size.is_finite() && self.surface_size > 0.0) {
            return Err(ConfigError::NotFinite { field: "surface_size" });
        }

        let c = &self.caustics;
        if c.frame_cadence == 0 {
            return Err(ConfigError::Cadence);
        }
        if c.texture_count == 0 {
            return Err(ConfigError::TextureCount);
        }
        unit("caustics.above_opacity", c.above_opacity)?;
        unit("caustics.below_opacity", c.below_opacity)?;
        unit("caustics.max_opacity", c.max_opacity)?;
        if !(c.time_step.is_finite() && c.base_speed.is_finite() && c.radius.is_finite()) {
            return Err(ConfigError::NotFinite { field: "caustics" });
        }

        let f = &self.fog;
        if !(0.0 <= f.base_density && f.base_density <= f.max_density) || f.density_per_meter < 0.0 {
            return Err(ConfigError::FogDensity);
        }

        unit("lighting.directional_dim_factor", self.lighting.directional_dim_factor)?;
        Ok(())
    }
}
