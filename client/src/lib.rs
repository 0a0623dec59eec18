use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::window::{Window, WindowPlugin};
use waterfx::EffectsConfig;

pub mod args;
pub mod config;
#[cfg(feature = "windowing")]
pub mod hud_controls;
pub mod input;
pub mod marker;
pub mod overlay;
pub mod render_settings;
pub mod scene;
pub mod session_metrics;

pub use args::Args;
pub use config::load_config;
#[cfg(feature = "windowing")]
use hud_controls::HudControlsPlugin;
pub use input::WaterLevelInput;
pub use marker::{MarkerEvent, MarkerSim, RemoveEffects};
use overlay::OverlayPlugin;
use render_settings::RenderSettingsPlugin;
use scene::host::CausticSource;
use scene::water::{WaterFxPlugin, WaterFxSet};
use scene::ScenePlugin;
use session_metrics::SessionMetricsPlugin;

#[cfg(feature = "windowing")]
use bevy_egui::EguiPlugin;

#[derive(Clone, Copy)]
struct ClientAppConfig {
    include_rendering: bool,
    include_ui: bool,
    include_scene: bool,
    include_debug: bool,
}

impl ClientAppConfig {
    fn full(args: &Args) -> Self {
        Self {
            include_rendering: !args.headless,
            include_ui: !args.headless,
            include_scene: !args.headless,
            include_debug: true,
        }
    }

    const MINIMAL: Self = Self {
        include_rendering: false,
        include_ui: false,
        include_scene: false,
        include_debug: false,
    };
}

pub fn build_client_app(args: Args, cfg: EffectsConfig) -> App {
    let config = ClientAppConfig::full(&args);
    build_client_app_with_config(args, cfg, config)
}

/// Controller and host systems only, on `MinimalPlugins`. No scene is spawned.
pub fn build_minimal_client_app(args: Args, cfg: EffectsConfig) -> App {
    build_client_app_with_config(args, cfg, ClientAppConfig::MINIMAL)
}

fn build_client_app_with_config(args: Args, cfg: EffectsConfig, config: ClientAppConfig) -> App {
    let mut app = App::new();

    if config.include_rendering {
        app.add_plugins(
            DefaultPlugins
                .set(AssetPlugin {
                    file_path: "assets".into(),
                    ..Default::default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Tidemark".into(),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
        );
    } else {
        app.add_plugins(MinimalPlugins);
    }

    let source = match &args.caustic_dir {
        Some(dir) => CausticSource::Files { dir: dir.clone() },
        None => CausticSource::Procedural,
    };

    app.insert_resource(args.clone())
        .insert_resource(source)
        .init_resource::<MarkerSim>()
        .add_plugins(WaterFxPlugin { config: cfg })
        .add_systems(
            Update,
            (input::nudge_level_keys, marker::toggle_marker_key).before(WaterFxSet),
        );

    if args.show_marker {
        app.add_systems(Startup, marker::show_marker_on_start);
    }

    if config.include_ui {
        app.add_plugins(OverlayPlugin);
        #[cfg(feature = "windowing")]
        {
            app.add_plugins(EguiPlugin::default());
            app.add_plugins(HudControlsPlugin);
        }
    }

    // After the UI so the tuning inspector can find egui.
    if config.include_debug {
        app.add_plugins(SessionMetricsPlugin);
        app.add_plugins(RenderSettingsPlugin);
    }

    if config.include_scene {
        app.add_plugins(ScenePlugin);
    }

    app
}
