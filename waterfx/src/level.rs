use crate::config::{EffectsConfig, SmoothingMode};

/// Smooths the live water level toward the user-selected target.
///
/// Every step is a convex combination of the current and target level, so the
/// distance to the target never grows and the level never overshoots.
#[derive(Debug, Clone)]
pub struct LevelIntegrator {
    pub current: f32,
    pub target: f32,
    pub max_rise: f32,
    alpha: f32,
    mode: SmoothingMode,
}

impl LevelIntegrator {
    pub fn new(max_rise: f32, alpha: f32, mode: SmoothingMode) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            max_rise,
            alpha: alpha.clamp(f32::MIN_POSITIVE, 1.0),
            mode,
        }
    }

    pub fn from_config(cfg: &EffectsConfig) -> Self {
        Self::new(cfg.max_water_rise, cfg.smoothing_alpha, cfg.smoothing)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(f32::MIN_POSITIVE, 1.0);
    }

    /// Blend factor for a tick of `dt` seconds.
    pub fn blend(&self, dt: f32) -> f32 {
        match self.mode {
            SmoothingMode::PerFrame => self.alpha,
            SmoothingMode::TimeScaled { reference_hz } => {
                let frames = (dt.max(0.0) * reference_hz).max(0.0);
                (1.0 - (1.0 - self.alpha).powf(frames)).clamp(0.0, 1.0)
            }
        }
    }

    /// Advance one tick toward the stored target.
    pub fn step(&mut self, dt: f32) -> f32 {
        let k = self.blend(dt);
        self.current += (self.target - self.current) * k;
        self.current
    }

    pub fn update(&mut self, target: f32, dt: f32) -> f32 {
        self.target = target;
        self.step(dt)
    }

    /// Target for a slider position in percent (clamped to 0..=100).
    pub fn set_percent(&mut self, percent: f32) -> f32 {
        self.target = percent.clamp(0.0, 100.0) / 100.0 * self.max_rise;
        self.target
    }
}

/// Maps the 0..100 slider onto a target level and a displayed year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderMapping {
    pub max_rise: f32,
    pub start_year: i32,
    pub end_year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderReading {
    pub percent: f32,
    pub target_level: f32,
    pub year: i32,
}

impl SliderMapping {
    pub fn from_config(cfg: &EffectsConfig) -> Self {
        Self { max_rise: cfg.max_water_rise, start_year: cfg.start_year, end_year: cfg.end_year }
    }

    pub fn read(&self, percent: f32) -> SliderReading {
        let percent = if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 };
        let t = percent / 100.0;
        let span = (self.end_year - self.start_year) as f64;
        let year = (self.start_year as f64 + t as f64 * span).floor() as i32;
        SliderReading { percent, target_level: t * self.max_rise, year }
    }
}
