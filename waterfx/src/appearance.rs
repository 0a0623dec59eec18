use crate::color::Rgb;
use crate::config::LightingConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogState {
    pub color: Rgb,
    pub density: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightLevel<N> {
    pub light: N,
    pub illuminance: f32,
}

/// Scene-global look shared with anything else rendering into the scene.
///
/// Captured once when the marker activates; every value the controller
/// changes afterwards is restored from this snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneAppearance<N> {
    pub clear_color: Rgb,
    pub fog: Option<FogState>,
    pub directional: Vec<LightLevel<N>>,
}

impl<N> Default for SceneAppearance<N> {
    fn default() -> Self {
        Self { clear_color: Rgb::BLACK, fog: None, directional: Vec::new() }
    }
}

/// A single desired-state write, applied by the host's appearance sink.
#[derive(Debug, Clone, PartialEq)]
pub enum AppearanceChange<N> {
    /// `None` disables fog entirely.
    Fog(Option<FogState>),
    ClearColor(Rgb),
    DirectionalLight(LightLevel<N>),
    UnderwaterLight { light: N, enabled: bool },
}

impl<N: Copy> SceneAppearance<N> {
    /// Changes for entering the below-water regime.
    pub fn underwater_changes(
        &self,
        fog: FogState,
        lighting: &LightingConfig,
        fill_light: Option<N>,
    ) -> Vec<AppearanceChange<N>> {
        let mut out = Vec::with_capacity(self.directional.len() + 3);
        out.push(AppearanceChange::Fog(Some(fog)));
        out.push(AppearanceChange::ClearColor(lighting.underwater_clear_color));
        if let Some(light) = fill_light {
            out.push(AppearanceChange::UnderwaterLight { light, enabled: true });
        }
        for l in &self.directional {
            out.push(AppearanceChange::DirectionalLight(LightLevel {
                light: l.light,
                illuminance: l.illuminance * lighting.directional_dim_factor,
            }));
        }
        out
    }

    /// Changes that put every captured value back.
    pub fn restore_changes(&self, fill_light: Option<N>) -> Vec<AppearanceChange<N>> {
        let mut out = Vec::with_capacity(self.directional.len() + 3);
        out.push(AppearanceChange::Fog(self.fog));
        out.push(AppearanceChange::ClearColor(self.clear_color));
        if let Some(light) = fill_light {
            out.push(AppearanceChange::UnderwaterLight { light, enabled: false });
        }
        out.extend(self.directional.iter().copied().map(AppearanceChange::DirectionalLight));
        out
    }
}
