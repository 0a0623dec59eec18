use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::math::primitives::Cuboid;
use bevy::pbr::{MeshMaterial3d, StandardMaterial};
use bevy::prelude::*;

use super::camera::FreeFlyState;
use super::host::{MarkerAnchor, ViewerCamera};

pub fn spawn_box(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    size: Vec3,
    pos: Vec3,
    color: Color,
) -> Entity {
    let mesh = meshes.add(Mesh::from(Cuboid::new(size.x, size.y, size.z)));
    let material = materials.add(StandardMaterial {
        base_color: color,
        perceptual_roughness: 0.9,
        metallic: 0.0,
        ..Default::default()
    });
    commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(pos),
            GlobalTransform::default(),
        ))
        .id()
}

pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Pale daylight sky stands in for the camera feed.
    commands.insert_resource(ClearColor(Color::srgb(0.62, 0.76, 0.86)));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 250.0,
        affects_lightmapped_meshes: true,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..Default::default()
        },
        Transform::from_xyz(-6.0, 12.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
        GlobalTransform::default(),
        Name::new("Sun Light"),
    ));

    let eye = Transform::from_xyz(5.0, 3.0, 8.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
    let (yaw, pitch, _) = eye.rotation.to_euler(EulerRot::YXZ);
    commands.spawn((
        Camera3d::default(),
        Tonemapping::TonyMcMapface,
        eye,
        GlobalTransform::default(),
        ViewerCamera,
        FreeFlyState { yaw, pitch, speed: 3.0 },
        Name::new("Viewer Camera"),
    ));

    // Ground and the printed marker the effects are anchored to.
    spawn_box(
        &mut commands,
        &mut meshes,
        &mut materials,
        Vec3::new(30.0, 0.1, 30.0),
        Vec3::new(0.0, -0.06, 0.0),
        Color::srgb(0.45, 0.47, 0.42),
    );
    let board = spawn_box(
        &mut commands,
        &mut meshes,
        &mut materials,
        Vec3::new(1.2, 0.01, 1.2),
        Vec3::ZERO,
        Color::BLACK,
    );
    let inner = spawn_box(
        &mut commands,
        &mut meshes,
        &mut materials,
        Vec3::new(0.6, 0.012, 0.6),
        Vec3::ZERO,
        Color::WHITE,
    );
    commands.entity(inner).insert(ChildOf(board));
    commands
        .entity(board)
        .insert((MarkerAnchor, Visibility::default(), Name::new("Marker")));
}
