//! Environmental effects controller for the AR sea-level demo.
//!
//! This crate intentionally avoids any Bevy app types. The controller talks to
//! the rendering host through the [`EffectsHost`] trait, so the same logic can
//! drive a Bevy scene, a headless test host, or anything else that can spawn
//! nodes and write parameters.

mod color;
pub use color::Rgb;

mod config;
pub use config::{
    CausticConfig, ConfigError, EffectsConfig, FogConfig, LightingConfig, SmoothingMode,
    MAX_WATER_RISE_LIMIT,
};

pub mod depth;
pub use depth::DepthParams;

mod level;
pub use level::{LevelIntegrator, SliderMapping, SliderReading};

mod underwater;
pub use underwater::{UnderwaterTracker, WaterRegime};

mod appearance;
pub use appearance::{AppearanceChange, FogState, LightLevel, SceneAppearance};

mod caustics;
pub use caustics::{layer_offset, CausticAnimator, CausticLayer};

mod loading;
pub use loading::{LoadTicket, TextureSet};

mod host;
pub use host::{
    CausticParams, EffectsHost, GaugeTick, MaterialKind, NodeSpec, SurfaceParams,
};

mod lifecycle;
pub use lifecycle::ActiveResources;

mod controller;
pub use controller::{FrameReport, WaterFx, MARKER_FOUND_MESSAGE, MARKER_LOST_MESSAGE};

mod stats;
pub use stats::{SessionReport, SessionStats};
