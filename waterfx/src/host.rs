use bevy_math::Vec2;

use crate::appearance::{AppearanceChange, SceneAppearance};
use crate::color::Rgb;
use crate::loading::LoadTicket;

/// Resource kind, fixed when the resource is created.
///
/// Only `AnimatedShader` resources receive time, UV offset and texture writes;
/// `FlatColor` resources get tint/opacity only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    FlatColor,
    AnimatedShader,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeTick {
    pub y: f32,
    /// Ticks on multiples of 5 are drawn red.
    pub highlighted: bool,
}

/// Everything the controller asks the host to build.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSpec<T> {
    Surface { size: f32, kind: MaterialKind, tint: Rgb, opacity: f32 },
    CausticLayer { index: usize, size: f32, kind: MaterialKind, texture: Option<T> },
    GaugeColumn { height: f32 },
    GaugeTick(GaugeTick),
    MarkerLight { illuminance: f32 },
    /// Starts disabled; toggled through [`AppearanceChange::UnderwaterLight`].
    UnderwaterLight { color: Rgb, illuminance: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceParams {
    pub level: f32,
    pub tint: Rgb,
    pub opacity: f32,
    /// Animation clock, `None` for flat surfaces.
    pub time: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CausticParams<'a, T> {
    pub opacity: f32,
    pub offset: Option<Vec2>,
    pub texture: Option<&'a T>,
}

/// The rendering host the controller drives.
///
/// Write methods return `false` when the target resource is gone or lacks the
/// slot; the controller skips that write and carries on with the rest.
pub trait EffectsHost {
    type Node: Copy + Eq + std::fmt::Debug;
    type Texture: Clone;

    /// Whether the host can render an animated water surface.
    fn surface_kind(&self) -> MaterialKind;

    fn capture_appearance(&mut self) -> SceneAppearance<Self::Node>;

    fn apply_appearance(&mut self, change: &AppearanceChange<Self::Node>);

    /// Build a node under the marker anchor. `None` if the host cannot.
    fn spawn(&mut self, spec: NodeSpec<Self::Texture>) -> Option<Self::Node>;

    /// Detach the node and release whatever geometry/material it owns.
    fn despawn(&mut self, node: Self::Node);

    fn write_surface(&mut self, node: Self::Node, params: &SurfaceParams) -> bool;

    fn write_caustic(&mut self, node: Self::Node, params: &CausticParams<'_, Self::Texture>) -> bool;

    /// Start loading `count` caustic frames. Completion is reported back to
    /// the controller with the same ticket.
    fn request_textures(&mut self, ticket: LoadTicket, count: usize);

    fn release_textures(&mut self, textures: Vec<Self::Texture>);

    /// Show or hide the level controls. Hosts without UI ignore this.
    fn set_controls_visible(&mut self, _visible: bool, _message: &str) {}
}
