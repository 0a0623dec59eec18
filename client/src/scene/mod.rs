use bevy::prelude::*;

pub mod camera;
pub mod host;
pub mod proctex;
pub mod setup;
pub mod water;

use water::WaterFxSet;

/// The demo stage: sky, sun, ground, marker board and a free-fly viewer.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(proctex::ProcTexPlugin)
            .add_systems(Startup, setup::setup_scene)
            .add_systems(Update, camera::free_fly_camera.before(WaterFxSet));
    }
}
