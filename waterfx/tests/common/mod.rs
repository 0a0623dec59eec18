#![allow(dead_code)]

use std::collections::BTreeMap;

use bevy_math::Vec2;
use waterfx::{
    AppearanceChange, CausticParams, EffectsConfig, EffectsHost, FogState, LightLevel, LoadTicket,
    MaterialKind, NodeSpec, Rgb, SceneAppearance, SurfaceParams, WaterFx,
};

pub type Fx = WaterFx<u32, u32>;

pub const SCENE_CLEAR: Rgb = Rgb::new(0.5, 0.6, 0.7);
pub const SUN: u32 = 1;
pub const SUN_LUX: f32 = 10_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CausticWrite {
    pub node: u32,
    pub opacity: f32,
    pub offset: Option<Vec2>,
    pub texture: Option<u32>,
}

/// In-memory host that records every call the controller makes.
#[derive(Debug)]
pub struct RecordingHost {
    next_id: u32,
    pub surface_kind: MaterialKind,
    pub live: BTreeMap<u32, NodeSpec<u32>>,
    pub despawned: Vec<u32>,
    pub bad_despawns: usize,
    pub writes_to_dead: usize,
    pub clear_color: Rgb,
    pub fog: Option<FogState>,
    pub lights: BTreeMap<u32, f32>,
    pub underwater_light_on: bool,
    pub changes: Vec<AppearanceChange<u32>>,
    pub requests: Vec<(LoadTicket, usize)>,
    pub released: Vec<u32>,
    pub surface_writes: Vec<SurfaceParams>,
    pub caustic_writes: Vec<CausticWrite>,
    pub controls: Option<(bool, String)>,
    /// Caustic layer index whose spawn is refused.
    pub refuse_layer: Option<usize>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        let mut lights = BTreeMap::new();
        lights.insert(SUN, SUN_LUX);
        Self {
            next_id: 100,
            surface_kind: MaterialKind::AnimatedShader,
            live: BTreeMap::new(),
            despawned: Vec::new(),
            bad_despawns: 0,
            writes_to_dead: 0,
            clear_color: SCENE_CLEAR,
            fog: None,
            lights,
            underwater_light_on: false,
            changes: Vec::new(),
            requests: Vec::new(),
            released: Vec::new(),
            surface_writes: Vec::new(),
            caustic_writes: Vec::new(),
            controls: None,
            refuse_layer: None,
        }
    }
}

impl RecordingHost {
    pub fn flat() -> Self {
        Self { surface_kind: MaterialKind::FlatColor, ..Default::default() }
    }

    pub fn count_live(&self, pred: impl Fn(&NodeSpec<u32>) -> bool) -> usize {
        self.live.values().filter(|s| pred(s)).count()
    }

    pub fn caustic_layers(&self) -> usize {
        self.count_live(|s| matches!(s, NodeSpec::CausticLayer { .. }))
    }

    pub fn last_request(&self) -> LoadTicket {
        self.requests.last().expect("no texture request").0
    }

    pub fn fog_writes(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, AppearanceChange::Fog(_)))
            .count()
    }
}

impl EffectsHost for RecordingHost {
    type Node = u32;
    type Texture = u32;

    fn surface_kind(&self) -> MaterialKind {
        self.surface_kind
    }

    fn capture_appearance(&mut self) -> SceneAppearance<u32> {
        SceneAppearance {
            clear_color: self.clear_color,
            fog: self.fog,
            directional: self
                .lights
                .iter()
                .map(|(&light, &illuminance)| LightLevel { light, illuminance })
                .collect(),
        }
    }

    fn apply_appearance(&mut self, change: &AppearanceChange<u32>) {
        self.changes.push(change.clone());
        match change {
            AppearanceChange::Fog(fog) => self.fog = *fog,
            AppearanceChange::ClearColor(c) => self.clear_color = *c,
            AppearanceChange::DirectionalLight(l) => {
                if let Some(v) = self.lights.get_mut(&l.light) {
                    *v = l.illuminance;
                }
            }
            AppearanceChange::UnderwaterLight { enabled, .. } => self.underwater_light_on = *enabled,
        }
    }

    fn spawn(&mut self, spec: NodeSpec<u32>) -> Option<u32> {
        if let NodeSpec::CausticLayer { index, .. } = spec {
            if self.refuse_layer == Some(index) {
                return None;
            }
        }
        let id = self.next_id;
        self.next_id += 1;
        if let NodeSpec::MarkerLight { illuminance } = spec {
            self.lights.insert(id, illuminance);
        }
        self.live.insert(id, spec);
        Some(id)
    }

    fn despawn(&mut self, node: u32) {
        if self.live.remove(&node).is_some() {
            self.lights.remove(&node);
            self.despawned.push(node);
        } else {
            self.bad_despawns += 1;
        }
    }

    fn write_surface(&mut self, node: u32, params: &SurfaceParams) -> bool {
        if !self.live.contains_key(&node) {
            self.writes_to_dead += 1;
            return false;
        }
        self.surface_writes.push(*params);
        true
    }

    fn write_caustic(&mut self, node: u32, params: &CausticParams<'_, u32>) -> bool {
        if !self.live.contains_key(&node) {
            self.writes_to_dead += 1;
            return false;
        }
        self.caustic_writes.push(CausticWrite {
            node,
            opacity: params.opacity,
            offset: params.offset,
            texture: params.texture.copied(),
        });
        true
    }

    fn request_textures(&mut self, ticket: LoadTicket, count: usize) {
        self.requests.push((ticket, count));
    }

    fn release_textures(&mut self, textures: Vec<u32>) {
        self.released.extend(textures);
    }

    fn set_controls_visible(&mut self, visible: bool, message: &str) {
        self.controls = Some((visible, message.to_string()));
    }
}

/// Controller with the marker found and `texture_count` frames loaded.
pub fn active_fx(cfg: EffectsConfig, host: &mut RecordingHost) -> Fx {
    let texture_count = cfg.caustics.texture_count as u32;
    let mut fx = Fx::new(cfg);
    fx.marker_found(host);
    let ticket = host.last_request();
    assert!(fx.textures_loaded(ticket, (0..texture_count).collect(), host));
    fx
}

pub fn tick_n(fx: &mut Fx, host: &mut RecordingHost, frames: usize, viewer_y: f32) {
    for i in 0..frames {
        fx.tick(i as f64 * 16.0, 16.0, viewer_y, host);
    }
}
