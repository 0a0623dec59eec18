use std::f32::consts::TAU;

use bevy_math::Vec2;

use crate::config::CausticConfig;
use crate::underwater::WaterRegime;

/// One looping caustic texture layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CausticLayer {
    pub texture_index: usize,
    pub phase_offset: f32,
    pub speed_factor: f32,
    pub opacity: f32,
    /// UV offset for the current frame.
    pub offset: Vec2,
}

/// Advances N decorrelated caustic layers.
///
/// Texture cycling only happens when the loaded set is non-empty; all index
/// arithmetic is modulo the set size.
#[derive(Debug, Clone)]
pub struct CausticAnimator {
    layers: Vec<CausticLayer>,
    time: f32,
    frame: u64,
    texture_count: usize,
    cfg: CausticConfig,
}

/// Drift pattern for a layer index: 0 clockwise, 1 counter-clockwise, 2+ diagonal.
pub fn layer_offset(index: usize, theta: f32, radius: f32) -> Vec2 {
    let (s, c) = theta.sin_cos();
    match index {
        0 => Vec2::new(c, -s) * radius,
        1 => Vec2::new(c, s) * radius,
        _ => {
            // Slide along the diagonal, wrapped to one texture tile, with a
            // small perpendicular wobble.
            let along = (theta * radius / TAU).rem_euclid(1.0);
            let wobble = s * radius * 0.25;
            Vec2::new(along + wobble, along - wobble)
        }
    }
}

impl CausticAnimator {
    /// `texture_count == 0` means a placeholder set: layers animate opacity
    /// only and never cycle textures.
    pub fn new(cfg: &CausticConfig, texture_count: usize) -> Self {
        let n = cfg.layer_count;
        let layers = (0..n)
            .map(|i| CausticLayer {
                texture_index: if texture_count == 0 { 0 } else { (i * cfg.stagger) % texture_count },
                phase_offset: i as f32 * TAU / n.max(1) as f32,
                speed_factor: 1.0 + cfg.speed_spread * i as f32,
                opacity: 0.0,
                offset: Vec2::ZERO,
            })
            .collect();
        Self { layers, time: 0.0, frame: 0, texture_count, cfg: cfg.clone() }
    }

    pub fn layers(&self) -> &[CausticLayer] {
        &self.layers
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn texture_count(&self) -> usize {
        self.texture_count
    }

    pub fn set_max_opacity(&mut self, max_opacity: f32) {
        self.cfg.max_opacity = max_opacity.clamp(0.0, 1.0);
    }

    pub fn layer_opacity(&self, depth_factor: f32, regime: WaterRegime) -> f32 {
        let base = match regime {
            WaterRegime::AboveWater => self.cfg.above_opacity,
            WaterRegime::BelowWater => self.cfg.below_opacity,
        };
        (base * (0.25 + 0.75 * depth_factor.clamp(0.0, 1.0))).clamp(0.0, self.cfg.max_opacity)
    }

    /// Advance one frame.
    pub fn advance(&mut self, depth_factor: f32, regime: WaterRegime) {
        self.time += self.cfg.time_step;
        self.frame += 1;

        let cycle = self.texture_count > 0 && self.frame % self.cfg.frame_cadence.max(1) as u64 == 0;
        let opacity = self.layer_opacity(depth_factor, regime);
        let count = self.texture_count;

        for (i, layer) in self.layers.iter_mut().enumerate() {
            let theta = self.time * self.cfg.base_speed * layer.speed_factor * TAU + layer.phase_offset;
            layer.offset = layer_offset(i, theta, self.cfg.radius);
            layer.opacity = opacity;
            if cycle {
                layer.texture_index = (layer.texture_index + 1) % count;
            }
        }
    }
}
