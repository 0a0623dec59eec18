use bevy::prelude::*;
#[cfg(feature = "windowing")]
use bevy_inspector_egui::quick::ResourceInspectorPlugin;
#[cfg(feature = "windowing")]
use bevy_inspector_egui::InspectorOptions;
use waterfx::EffectsConfig;

use crate::scene::water::{WaterFxSet, WaterFxState};

/// Live-tunable effect settings, pushed into the controller on change.
#[derive(Resource, Debug, Clone, Reflect)]
#[cfg_attr(feature = "windowing", derive(InspectorOptions))]
#[reflect(Resource)]
pub struct FxTuning {
    #[cfg_attr(feature = "windowing", inspector(min = 0.005, max = 1.0))]
    pub smoothing_alpha: f32,
    #[cfg_attr(feature = "windowing", inspector(min = 0.0, max = 3.0))]
    pub underwater_threshold: f32,
    #[cfg_attr(feature = "windowing", inspector(min = 0.0, max = 1.0))]
    pub caustic_max_opacity: f32,
}

impl FxTuning {
    pub fn from_config(cfg: &EffectsConfig) -> Self {
        Self {
            smoothing_alpha: cfg.smoothing_alpha,
            underwater_threshold: cfg.underwater_threshold,
            caustic_max_opacity: cfg.caustics.max_opacity,
        }
    }
}

pub struct RenderSettingsPlugin;

impl Plugin for RenderSettingsPlugin {
    fn build(&self, app: &mut App) {
        let tuning = app
            .world()
            .get_resource::<WaterFxState>()
            .map(|fx| FxTuning::from_config(fx.config()))
            .unwrap_or_else(|| FxTuning::from_config(&EffectsConfig::default()));
        app.insert_resource(tuning)
            .register_type::<FxTuning>()
            .add_systems(Update, apply_tuning.before(WaterFxSet));
        #[cfg(feature = "windowing")]
        if app.is_plugin_added::<bevy_egui::EguiPlugin>() {
            app.add_plugins(ResourceInspectorPlugin::<FxTuning>::default());
        }
    }
}

fn apply_tuning(tuning: Res<FxTuning>, mut fx: ResMut<WaterFxState>) {
    if !tuning.is_changed() || tuning.is_added() {
        return;
    }
    fx.set_smoothing_alpha(tuning.smoothing_alpha);
    fx.set_underwater_threshold(tuning.underwater_threshold);
    fx.set_caustic_max_opacity(tuning.caustic_max_opacity);
}
