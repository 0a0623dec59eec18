use bevy::asset::LoadState;
use bevy::ecs::system::SystemParam;
use bevy::math::Affine2;
use bevy::pbr::{DistanceFog, FogFalloff, MeshMaterial3d, NotShadowCaster, StandardMaterial};
use bevy::prelude::*;
use tracing::debug;
use waterfx::{
    AppearanceChange, CausticParams, EffectsHost, FogState, LightLevel, LoadTicket, MaterialKind,
    NodeSpec, Rgb, SceneAppearance, SurfaceParams,
};

use super::proctex::ProcTexAssets;

/// Everything effect nodes are parented to. Stands in for the tracked marker.
#[derive(Component)]
pub struct MarkerAnchor;

/// Camera whose height is the viewer height and which carries the fog.
#[derive(Component)]
pub struct ViewerCamera;

#[derive(Component)]
pub struct WaterSurface;

#[derive(Component)]
pub struct CausticLayerNode {
    pub index: usize,
}

#[derive(Component)]
pub struct GaugePart;

#[derive(Component)]
pub struct MarkerLight;

/// Node standing for the cool fill light used below the waterline. While
/// enabled, `ambient` is put on every viewer camera.
#[derive(Component)]
pub struct UnderwaterFill {
    pub ambient: AmbientLight,
}

/// Camera fog and ambient overrides as they were when the marker activated.
///
/// `FogState` only carries color and density, so the original components are
/// kept here and written back verbatim on restore.
#[derive(Resource, Default)]
pub struct CapturedCameraLook {
    pub cameras: Vec<(Entity, Option<DistanceFog>, Option<AmbientLight>)>,
}

impl CapturedCameraLook {
    fn get(&self, camera: Entity) -> Option<&(Entity, Option<DistanceFog>, Option<AmbientLight>)> {
        self.cameras.iter().find(|(e, ..)| *e == camera)
    }
}

/// Level controls shown while the marker is tracked.
#[derive(Resource, Debug, Clone, Default)]
pub struct ControlsUi {
    pub visible: bool,
    pub message: String,
}

/// Where caustic frames come from.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub enum CausticSource {
    /// Frames generated at startup.
    #[default]
    Procedural,
    /// `caustic_XX.png` files under this asset directory.
    Files { dir: String },
}

#[derive(Debug, Clone)]
pub enum CausticRequest {
    Immediate(Vec<Handle<Image>>),
    Loading(Vec<Handle<Image>>),
    Unavailable,
}

/// The caustic request currently in flight, if any.
#[derive(Resource, Debug, Default)]
pub struct PendingCausticLoad {
    pub request: Option<(LoadTicket, CausticRequest)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Ready(Vec<Handle<Image>>),
    Failed,
}

const SURFACE_RIPPLE_SPEED: Vec2 = Vec2::new(0.03, 0.02);
const CAUSTIC_TINT: Color = Color::srgb(0.8, 0.95, 1.0);
const CAUSTIC_FLAT_TINT: Color = Color::srgb(0.55, 0.75, 0.85);

/// Bevy side of [`EffectsHost`].
///
/// Every asset store is optional so that a headless app without rendering
/// still runs the controller; nodes then carry transforms and tags only.
#[derive(SystemParam)]
pub struct BevyHost<'w, 's> {
    commands: Commands<'w, 's>,
    meshes: Option<ResMut<'w, Assets<Mesh>>>,
    materials: Option<ResMut<'w, Assets<StandardMaterial>>>,
    asset_server: Option<Res<'w, AssetServer>>,
    proctex: Option<Res<'w, ProcTexAssets>>,
    source: Option<Res<'w, CausticSource>>,
    pending: ResMut<'w, PendingCausticLoad>,
    clear_color: Option<ResMut<'w, ClearColor>>,
    controls: Option<ResMut<'w, ControlsUi>>,
    captured: ResMut<'w, CapturedCameraLook>,
    /// Lights spawned through this param whose commands are not applied yet.
    fresh_lights: Local<'s, Vec<LightLevel<Entity>>>,
    anchors: Query<'w, 's, Entity, With<MarkerAnchor>>,
    cameras: Query<
        'w,
        's,
        (Entity, Option<&'static mut DistanceFog>, Option<&'static AmbientLight>),
        With<ViewerCamera>,
    >,
    lights: Query<'w, 's, (Entity, &'static mut DirectionalLight)>,
    fills: Query<'w, 's, &'static UnderwaterFill>,
    surfaces: Query<
        'w,
        's,
        (&'static mut Transform, Option<&'static MeshMaterial3d<StandardMaterial>>),
        With<WaterSurface>,
    >,
    caustic_nodes: Query<
        'w,
        's,
        Option<&'static MeshMaterial3d<StandardMaterial>>,
        (With<CausticLayerNode>, Without<WaterSurface>),
    >,
    owned: Query<
        'w,
        's,
        (Option<&'static Mesh3d>, Option<&'static MeshMaterial3d<StandardMaterial>>),
    >,
}

pub fn to_color(c: Rgb) -> Color {
    Color::srgb(c.r, c.g, c.b)
}

pub fn to_rgb(c: Color) -> Rgb {
    let s = c.to_srgba();
    Rgb::new(s.red, s.green, s.blue)
}

fn fog_state(fog: &DistanceFog) -> FogState {
    let density = match fog.falloff {
        FogFalloff::Exponential { density } | FogFalloff::ExponentialSquared { density } => density,
        // Other falloffs carry no density; restore uses the captured component.
        _ => 0.0,
    };
    FogState { color: to_rgb(fog.color), density }
}

fn distance_fog(state: &FogState) -> DistanceFog {
    DistanceFog {
        color: to_color(state.color),
        falloff: FogFalloff::Exponential { density: state.density },
        ..Default::default()
    }
}

impl BevyHost<'_, '_> {
    fn mesh_parts(
        &mut self,
        mesh: impl Into<Mesh>,
        material: StandardMaterial,
    ) -> Option<(Mesh3d, MeshMaterial3d<StandardMaterial>)> {
        let meshes = self.meshes.as_mut()?;
        let materials = self.materials.as_mut()?;
        Some((Mesh3d(meshes.add(mesh)), MeshMaterial3d(materials.add(material))))
    }

    fn ripple_texture(&self) -> Option<Handle<Image>> {
        self.proctex.as_ref().and_then(|p| p.ripples.clone())
    }

    /// Resolve the in-flight caustic request once it has settled.
    pub fn poll_texture_load(&mut self) -> Option<(LoadTicket, LoadOutcome)> {
        let (ticket, request) = self.pending.request.clone()?;
        let outcome = match request {
            CausticRequest::Immediate(handles) => LoadOutcome::Ready(handles),
            CausticRequest::Unavailable => LoadOutcome::Failed,
            CausticRequest::Loading(handles) => {
                let Some(server) = self.asset_server.as_ref() else {
                    return self.finish_load(ticket, LoadOutcome::Failed);
                };
                let states: Vec<LoadState> = handles.iter().map(|h| server.load_state(h)).collect();
                if states.iter().any(|s| matches!(s, LoadState::Failed(_))) {
                    LoadOutcome::Failed
                } else if states.iter().all(|s| matches!(s, LoadState::Loaded)) {
                    LoadOutcome::Ready(handles)
                } else {
                    return None;
                }
            }
        };
        self.finish_load(ticket, outcome)
    }

    fn finish_load(
        &mut self,
        ticket: LoadTicket,
        outcome: LoadOutcome,
    ) -> Option<(LoadTicket, LoadOutcome)> {
        self.pending.request = None;
        Some((ticket, outcome))
    }
}

impl EffectsHost for BevyHost<'_, '_> {
    type Node = Entity;
    type Texture = Handle<Image>;

    fn surface_kind(&self) -> MaterialKind {
        if self.materials.is_some() && self.ripple_texture().is_some() {
            MaterialKind::AnimatedShader
        } else {
            MaterialKind::FlatColor
        }
    }

    fn capture_appearance(&mut self) -> SceneAppearance<Entity> {
        let mut directional: Vec<LightLevel<Entity>> = self
            .lights
            .iter()
            .map(|(light, l)| LightLevel { light, illuminance: l.illuminance })
            .collect();
        for fresh in self.fresh_lights.drain(..) {
            if !directional.iter().any(|l| l.light == fresh.light) {
                directional.push(fresh);
            }
        }
        self.captured.cameras = self
            .cameras
            .iter()
            .map(|(camera, fog, ambient)| (camera, fog.cloned(), ambient.cloned()))
            .collect();
        SceneAppearance {
            clear_color: self.clear_color.as_ref().map(|c| to_rgb(c.0)).unwrap_or(Rgb::BLACK),
            fog: self.captured.cameras.iter().find_map(|(_, fog, _)| fog.as_ref().map(fog_state)),
            directional,
        }
    }

    fn apply_appearance(&mut self, change: &AppearanceChange<Entity>) {
        match change {
            AppearanceChange::Fog(Some(state)) => {
                for (camera, fog, _) in &mut self.cameras {
                    // Putting the captured fog back keeps its falloff and
                    // directional settings.
                    let next = match self.captured.get(camera) {
                        Some((_, Some(original), _)) if fog_state(original) == *state => {
                            original.clone()
                        }
                        _ => distance_fog(state),
                    };
                    match fog {
                        Some(mut fog) => *fog = next,
                        None => {
                            self.commands.entity(camera).insert(next);
                        }
                    }
                }
            }
            AppearanceChange::Fog(None) => {
                for (camera, fog, _) in &self.cameras {
                    if fog.is_some() {
                        self.commands.entity(camera).remove::<DistanceFog>();
                    }
                }
            }
            AppearanceChange::ClearColor(c) => {
                if let Some(clear) = self.clear_color.as_mut() {
                    clear.0 = to_color(*c);
                }
            }
            AppearanceChange::DirectionalLight(level) => {
                if let Ok((_, mut light)) = self.lights.get_mut(level.light) {
                    light.illuminance = level.illuminance;
                }
            }
            AppearanceChange::UnderwaterLight { light, enabled: true } => {
                let Ok(fill) = self.fills.get(*light) else {
                    debug!(?light, "underwater fill not found");
                    return;
                };
                for (camera, ..) in &self.cameras {
                    self.commands.entity(camera).insert(fill.ambient.clone());
                }
            }
            AppearanceChange::UnderwaterLight { enabled: false, .. } => {
                // The enabling insert may still be queued, so remove unconditionally.
                for (camera, ..) in &self.cameras {
                    match self.captured.get(camera) {
                        Some((_, _, Some(original))) => {
                            self.commands.entity(camera).insert(original.clone());
                        }
                        _ => {
                            self.commands.entity(camera).remove::<AmbientLight>();
                        }
                    }
                }
            }
        }
    }

    fn spawn(&mut self, spec: NodeSpec<Handle<Image>>) -> Option<Entity> {
        let anchor = self.anchors.iter().next();
        let id = match spec {
            NodeSpec::Surface { size, kind, tint, opacity } => {
                let texture = match kind {
                    MaterialKind::AnimatedShader => self.ripple_texture(),
                    MaterialKind::FlatColor => None,
                };
                let parts = self.mesh_parts(
                    Plane3d::default().mesh().size(size, size),
                    StandardMaterial {
                        base_color: to_color(tint).with_alpha(opacity),
                        base_color_texture: texture,
                        alpha_mode: AlphaMode::Blend,
                        perceptual_roughness: 0.08,
                        metallic: 0.0,
                        double_sided: true,
                        cull_mode: None,
                        ..Default::default()
                    },
                );
                let id = self
                    .commands
                    .spawn((WaterSurface, Transform::default(), Visibility::default(), NotShadowCaster, Name::new("Water Surface")))
                    .id();
                if let Some(parts) = parts {
                    self.commands.entity(id).insert(parts);
                }
                id
            }
            NodeSpec::CausticLayer { index, size, kind, texture } => {
                let tint = match kind {
                    MaterialKind::AnimatedShader => CAUSTIC_TINT,
                    MaterialKind::FlatColor => CAUSTIC_FLAT_TINT,
                };
                let parts = self.mesh_parts(
                    Plane3d::default().mesh().size(size, size),
                    StandardMaterial {
                        base_color: tint.with_alpha(0.0),
                        base_color_texture: texture,
                        unlit: true,
                        alpha_mode: AlphaMode::Add,
                        ..Default::default()
                    },
                );
                // Stack layers just above the marker plane.
                let y = 0.005 + index as f32 * 0.002;
                let id = self
                    .commands
                    .spawn((
                        CausticLayerNode { index },
                        Transform::from_xyz(0.0, y, 0.0),
                        Visibility::default(),
                        NotShadowCaster,
                        Name::new(format!("Caustic Layer {index}")),
                    ))
                    .id();
                if let Some(parts) = parts {
                    self.commands.entity(id).insert(parts);
                }
                id
            }
            NodeSpec::GaugeColumn { height } => {
                let parts = self.mesh_parts(
                    Cuboid::new(0.3, height, 0.3),
                    StandardMaterial {
                        base_color: Color::srgb(0.8, 0.8, 0.8).with_alpha(0.8),
                        alpha_mode: AlphaMode::Blend,
                        perceptual_roughness: 0.9,
                        ..Default::default()
                    },
                );
                let id = self
                    .commands
                    .spawn((GaugePart, Transform::from_xyz(0.0, height * 0.5, 0.0), Visibility::default(), Name::new("Gauge Column")))
                    .id();
                if let Some(parts) = parts {
                    self.commands.entity(id).insert(parts);
                }
                id
            }
            NodeSpec::GaugeTick(tick) => {
                let color = if tick.highlighted { Color::srgb(1.0, 0.0, 0.0) } else { Color::BLACK };
                let parts = self.mesh_parts(
                    Cuboid::new(0.5, 0.1, 0.1),
                    StandardMaterial { base_color: color, perceptual_roughness: 0.9, ..Default::default() },
                );
                let id = self
                    .commands
                    .spawn((GaugePart, Transform::from_xyz(0.0, tick.y, 0.2), Visibility::default(), Name::new(format!("Gauge Tick {}", tick.y))))
                    .id();
                if let Some(parts) = parts {
                    self.commands.entity(id).insert(parts);
                }
                id
            }
            NodeSpec::MarkerLight { illuminance } => {
                let id = self
                    .commands
                    .spawn((
                        MarkerLight,
                        DirectionalLight { illuminance, shadows_enabled: false, ..Default::default() },
                        Transform::from_xyz(2.0, 5.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
                        Visibility::default(),
                        Name::new("Marker Light"),
                    ))
                    .id();
                self.fresh_lights.push(LightLevel { light: id, illuminance });
                id
            }
            NodeSpec::UnderwaterLight { color, illuminance } => self
                .commands
                .spawn((
                    UnderwaterFill {
                        ambient: AmbientLight {
                            color: to_color(color),
                            brightness: illuminance,
                            ..Default::default()
                        },
                    },
                    Transform::default(),
                    Visibility::default(),
                    Name::new("Underwater Fill"),
                ))
                .id(),
        };
        if let Some(anchor) = anchor {
            self.commands.entity(id).insert(ChildOf(anchor));
        }
        Some(id)
    }

    fn despawn(&mut self, node: Entity) {
        // Nodes spawned earlier in this same system are not in the world yet;
        // their assets go away with the handles when the despawn is applied.
        if let Ok((mesh, material)) = self.owned.get(node) {
            if let (Some(mesh), Some(meshes)) = (mesh, self.meshes.as_mut()) {
                meshes.remove(&mesh.0);
            }
            if let (Some(material), Some(materials)) = (material, self.materials.as_mut()) {
                materials.remove(&material.0);
            }
        }
        self.commands.entity(node).despawn();
    }

    fn write_surface(&mut self, node: Entity, params: &SurfaceParams) -> bool {
        let Ok((mut transform, material)) = self.surfaces.get_mut(node) else {
            return false;
        };
        transform.translation.y = params.level;
        let (Some(material), Some(materials)) = (material, self.materials.as_mut()) else {
            return true;
        };
        let Some(mat) = materials.get_mut(&material.0) else {
            return false;
        };
        mat.base_color = to_color(params.tint).with_alpha(params.opacity);
        if let Some(time) = params.time {
            mat.uv_transform = Affine2::from_translation(SURFACE_RIPPLE_SPEED * time);
        }
        true
    }

    fn write_caustic(&mut self, node: Entity, params: &CausticParams<'_, Handle<Image>>) -> bool {
        let Ok(Some(material)) = self.caustic_nodes.get(node) else {
            return false;
        };
        let Some(materials) = self.materials.as_mut() else {
            return false;
        };
        let Some(mat) = materials.get_mut(&material.0) else {
            return false;
        };
        mat.base_color.set_alpha(params.opacity);
        if let Some(offset) = params.offset {
            mat.uv_transform = Affine2::from_translation(offset);
        }
        if let Some(texture) = params.texture {
            if mat.base_color_texture.as_ref() != Some(texture) {
                mat.base_color_texture = Some(texture.clone());
            }
        }
        true
    }

    fn request_textures(&mut self, ticket: LoadTicket, count: usize) {
        let request = match self.source.as_deref() {
            Some(CausticSource::Files { dir }) => match self.asset_server.as_ref() {
                Some(server) => CausticRequest::Loading(
                    (0..count).map(|i| server.load(format!("{dir}/caustic_{i:02}.png"))).collect(),
                ),
                None => CausticRequest::Unavailable,
            },
            _ => match self.proctex.as_ref() {
                Some(p) if !p.caustic_frames.is_empty() => {
                    CausticRequest::Immediate(p.caustic_frames.iter().take(count).cloned().collect())
                }
                _ => CausticRequest::Unavailable,
            },
        };
        debug!(?ticket, count, "requesting caustic frames");
        self.pending.request = Some((ticket, request));
    }

    fn release_textures(&mut self, textures: Vec<Handle<Image>>) {
        // Dropping the strong handles lets the asset server unload file frames.
        debug!(count = textures.len(), "released caustic frames");
    }

    fn set_controls_visible(&mut self, visible: bool, message: &str) {
        if let Some(controls) = self.controls.as_mut() {
            controls.visible = visible;
            controls.message = message.to_string();
        }
    }
}
