use tracing::{debug, info, warn};

use crate::appearance::FogState;
use crate::caustics::CausticAnimator;
use crate::config::EffectsConfig;
use crate::depth;
use crate::host::{CausticParams, EffectsHost, MaterialKind, NodeSpec, SurfaceParams};
use crate::level::{LevelIntegrator, SliderMapping, SliderReading};
use crate::lifecycle::ActiveResources;
use crate::loading::{LoadTicket, TextureSet};
use crate::underwater::{UnderwaterTracker, WaterRegime};

pub const MARKER_FOUND_MESSAGE: &str =
    "Climate marker detected! Adjust the slider to see future water levels.";
pub const MARKER_LOST_MESSAGE: &str = "Marker lost. Show the marker to continue the experience.";

/// What one tick computed, for HUDs and telemetry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub time_ms: f64,
    pub level: f32,
    pub target: f32,
    pub depth_factor: f32,
    pub regime: WaterRegime,
    pub fog_density: Option<f32>,
    pub caustic_frame: u64,
}

/// The per-frame effects controller.
///
/// Generic over the host's node and texture handle types; every host call goes
/// through an [`EffectsHost`] passed in by the caller.
#[derive(Debug)]
pub struct WaterFx<N, T> {
    cfg: EffectsConfig,
    slider: SliderMapping,
    reading: SliderReading,
    level: LevelIntegrator,
    tracker: UnderwaterTracker,
    caustics: Option<CausticAnimator>,
    textures: TextureSet<T>,
    active: Option<ActiveResources<N>>,
    fog: Option<FogState>,
    surface_time: f32,
    generation: u64,
    marker_visible: bool,
    removed: bool,
}

impl<N, T> WaterFx<N, T>
where
    N: Copy + Eq + std::fmt::Debug,
    T: Clone,
{
    pub fn new(cfg: EffectsConfig) -> Self {
        let slider = SliderMapping::from_config(&cfg);
        Self {
            reading: slider.read(0.0),
            slider,
            level: LevelIntegrator::from_config(&cfg),
            tracker: UnderwaterTracker::new(cfg.underwater_threshold),
            caustics: None,
            textures: TextureSet::Unrequested,
            active: None,
            fog: None,
            surface_time: 0.0,
            generation: 0,
            marker_visible: false,
            removed: false,
            cfg,
        }
    }

    pub fn config(&self) -> &EffectsConfig {
        &self.cfg
    }

    pub fn level(&self) -> &LevelIntegrator {
        &self.level
    }

    pub fn regime(&self) -> WaterRegime {
        self.tracker.regime()
    }

    pub fn reading(&self) -> SliderReading {
        self.reading
    }

    pub fn textures(&self) -> &TextureSet<T> {
        &self.textures
    }

    pub fn caustics(&self) -> Option<&CausticAnimator> {
        self.caustics.as_ref()
    }

    pub fn active(&self) -> Option<&ActiveResources<N>> {
        self.active.as_ref()
    }

    pub fn fog(&self) -> Option<FogState> {
        self.fog
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn marker_visible(&self) -> bool {
        self.marker_visible
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Slider input in percent; updates the target level.
    pub fn set_slider(&mut self, percent: f32) -> SliderReading {
        self.reading = self.slider.read(percent);
        self.level.target = self.reading.target_level;
        self.reading
    }

    pub fn set_smoothing_alpha(&mut self, alpha: f32) {
        self.level.set_alpha(alpha);
        self.cfg.smoothing_alpha = self.level.alpha();
    }

    pub fn set_underwater_threshold(&mut self, threshold: f32) {
        if threshold.is_finite() {
            self.tracker.threshold = threshold;
            self.cfg.underwater_threshold = threshold;
        }
    }

    pub fn set_caustic_max_opacity(&mut self, max_opacity: f32) {
        self.cfg.caustics.max_opacity = max_opacity.clamp(0.0, 1.0);
        if let Some(anim) = self.caustics.as_mut() {
            anim.set_max_opacity(max_opacity);
        }
    }

    pub fn marker_found<H>(&mut self, host: &mut H)
    where
        H: EffectsHost<Node = N, Texture = T>,
    {
        if self.removed {
            warn!("marker found after removal; ignoring");
            return;
        }
        self.marker_visible = true;
        host.set_controls_visible(true, MARKER_FOUND_MESSAGE);
        if self.active.is_none() {
            self.activate(host);
        }
    }

    pub fn marker_lost<H>(&mut self, host: &mut H)
    where
        H: EffectsHost<Node = N, Texture = T>,
    {
        self.marker_visible = false;
        host.set_controls_visible(false, MARKER_LOST_MESSAGE);
        self.teardown(host);
    }

    /// Component removal: tear down and refuse later activations.
    pub fn remove<H>(&mut self, host: &mut H)
    where
        H: EffectsHost<Node = N, Texture = T>,
    {
        self.marker_visible = false;
        self.teardown(host);
        self.removed = true;
    }

    fn activate<H>(&mut self, host: &mut H)
    where
        H: EffectsHost<Node = N, Texture = T>,
    {
        self.generation += 1;
        let res = ActiveResources::build(host, &self.cfg, self.generation);
        info!(
            generation = self.generation,
            nodes = res.nodes().count(),
            lights = res.snapshot.directional.len(),
            "effects activated"
        );
        self.active = Some(res);
        self.tracker.reset();
        self.fog = None;
        self.surface_time = 0.0;

        let ticket = LoadTicket { generation: self.generation };
        self.textures = TextureSet::Pending(ticket);
        host.request_textures(ticket, self.cfg.caustics.texture_count);
    }

    fn accepts(&self, ticket: LoadTicket) -> bool {
        self.active.as_ref().map(|a| a.generation) == Some(ticket.generation)
            && self.textures.ticket() == Some(ticket)
    }

    /// Completion of a texture request. Returns `false` when the ticket is
    /// stale (the resources it was requested for are gone); the textures are
    /// then handed straight back to the host.
    pub fn textures_loaded<H>(&mut self, ticket: LoadTicket, textures: Vec<T>, host: &mut H) -> bool
    where
        H: EffectsHost<Node = N, Texture = T>,
    {
        if !self.accepts(ticket) {
            debug!(?ticket, live = self.generation, "dropping stale texture load");
            host.release_textures(textures);
            return false;
        }
        if textures.is_empty() {
            return self.textures_failed(ticket, host);
        }
        info!(count = textures.len(), "caustic textures ready");
        self.textures = TextureSet::Ready(textures);
        self.spawn_caustic_layers(host, MaterialKind::AnimatedShader);
        true
    }

    pub fn textures_failed<H>(&mut self, ticket: LoadTicket, host: &mut H) -> bool
    where
        H: EffectsHost<Node = N, Texture = T>,
    {
        if !self.accepts(ticket) {
            debug!(?ticket, "ignoring failure of stale texture load");
            return false;
        }
        warn!("caustic textures failed to load; using flat placeholder layers");
        self.textures = TextureSet::Failed;
        self.spawn_caustic_layers(host, MaterialKind::FlatColor);
        true
    }

    fn spawn_caustic_layers<H>(&mut self, host: &mut H, kind: MaterialKind)
    where
        H: EffectsHost<Node = N, Texture = T>,
    {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let anim = CausticAnimator::new(&self.cfg.caustics, self.textures.textures().len());
        for (i, layer) in anim.layers().iter().enumerate() {
            let texture = match kind {
                MaterialKind::AnimatedShader => {
                    self.textures.get_wrapped(layer.texture_index).cloned()
                }
                MaterialKind::FlatColor => None,
            };
            let spec = NodeSpec::CausticLayer {
                index: i,
                size: self.cfg.surface_size,
                kind,
                texture,
            };
            match host.spawn(spec) {
                Some(node) => active.caustic_layers.push((i, node, kind)),
                None => warn!(layer = i, "caustic layer was not created"),
            }
        }
        self.caustics = Some(anim);
    }

    /// One rendered frame. Does nothing unless the marker is visible and
    /// resources are live.
    pub fn tick<H>(
        &mut self,
        time_ms: f64,
        delta_ms: f32,
        viewer_y: f32,
        host: &mut H,
    ) -> Option<FrameReport>
    where
        H: EffectsHost<Node = N, Texture = T>,
    {
        if !self.marker_visible {
            return None;
        }
        let active = self.active.as_ref()?;
        let delta_ms = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };

        // Level
        let level = self.level.step(delta_ms / 1000.0);
        let params = depth::map(&self.cfg, level);

        if let Some((node, kind)) = active.surface {
            let time = match kind {
                MaterialKind::AnimatedShader => {
                    self.surface_time += delta_ms * 0.001;
                    Some(self.surface_time)
                }
                MaterialKind::FlatColor => None,
            };
            let ok = host.write_surface(
                node,
                &SurfaceParams {
                    level,
                    tint: params.tint,
                    opacity: params.opacity,
                    time,
                },
            );
            if !ok {
                debug!(?node, "surface write skipped");
            }
        }

        // Regime edges. Global scene state only changes here.
        match self.tracker.evaluate(level, viewer_y) {
            Some(WaterRegime::BelowWater) => {
                let entry = depth::entry_depth(level, viewer_y, self.tracker.threshold);
                let fog = FogState {
                    color: depth::fog_color(&self.cfg.fog, params.depth_factor),
                    density: depth::fog_density(&self.cfg.fog, entry),
                };
                let changes = active.snapshot.underwater_changes(
                    fog,
                    &self.cfg.lighting,
                    active.underwater_light,
                );
                for change in changes {
                    host.apply_appearance(&change);
                }
                self.fog = Some(fog);
                info!(level, viewer_y, density = fog.density, "entered underwater");
            }
            Some(WaterRegime::AboveWater) => {
                for change in active.snapshot.restore_changes(active.underwater_light) {
                    host.apply_appearance(&change);
                }
                self.fog = None;
                info!(level, viewer_y, "left underwater");
            }
            None => {}
        }

        // Caustics
        let regime = self.tracker.regime();
        let mut caustic_frame = 0;
        if let Some(anim) = self.caustics.as_mut() {
            anim.advance(params.depth_factor, regime);
            caustic_frame = anim.frame();
            for &(index, node, kind) in &active.caustic_layers {
                let Some(layer) = anim.layers().get(index) else {
                    continue;
                };
                let write = match kind {
                    MaterialKind::AnimatedShader => CausticParams {
                        opacity: layer.opacity,
                        offset: Some(layer.offset),
                        texture: self.textures.get_wrapped(layer.texture_index),
                    },
                    MaterialKind::FlatColor => CausticParams {
                        opacity: layer.opacity,
                        offset: None,
                        texture: None,
                    },
                };
                if !host.write_caustic(node, &write) {
                    debug!(?node, "caustic write skipped");
                }
            }
        }

        Some(FrameReport {
            time_ms,
            level,
            target: self.level.target,
            depth_factor: params.depth_factor,
            regime,
            fog_density: self.fog.map(|f| f.density),
            caustic_frame,
        })
    }

    /// Release everything created for the current activation. Safe to call
    /// any number of times, including before anything was created.
    pub fn teardown<H>(&mut self, host: &mut H) -> bool
    where
        H: EffectsHost<Node = N, Texture = T>,
    {
        let Some(active) = self.active.take() else {
            return false;
        };
        let generation = active.generation;
        active.teardown(host);
        if let TextureSet::Ready(textures) = self.textures.take() {
            host.release_textures(textures);
        }
        self.caustics = None;
        self.fog = None;
        self.tracker.reset();
        info!(generation, "effects torn down");
        true
    }
}
