use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;

use super::host::ViewerCamera;

#[derive(Component)]
pub struct FreeFlyState {
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
}

/// WASD + Q/E to move, right mouse to look. Moving below the waterline is how
/// the viewer goes under.
pub fn free_fly_camera(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut q: Query<(&mut Transform, &mut FreeFlyState), With<ViewerCamera>>,
) {
    let Ok((mut t, mut state)) = q.single_mut() else {
        return;
    };

    // Mouse look (hold right mouse button)
    if mouse_buttons.pressed(MouseButton::Right) {
        const SENS: f32 = 0.0025;
        let mut delta = Vec2::ZERO;
        for ev in mouse_motion.read() {
            delta += ev.delta;
        }
        state.yaw -= delta.x * SENS;
        state.pitch -= delta.y * SENS;
        state.pitch = state.pitch.clamp(-1.5, 1.5);
        t.rotation = Quat::from_euler(EulerRot::YXZ, state.yaw, state.pitch, 0.0);
    } else {
        // Drain motion to avoid bursts when RMB is pressed next
        for _ in mouse_motion.read() {}
    }

    let mut dir = Vec3::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        dir += *t.forward();
    }
    if keys.pressed(KeyCode::KeyS) {
        dir -= *t.forward();
    }
    if keys.pressed(KeyCode::KeyA) {
        dir -= *t.right();
    }
    if keys.pressed(KeyCode::KeyD) {
        dir += *t.right();
    }
    if keys.pressed(KeyCode::KeyE) {
        dir += Vec3::Y;
    }
    if keys.pressed(KeyCode::KeyQ) {
        dir -= Vec3::Y;
    }

    let mut speed = state.speed;
    if keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight) {
        speed *= 4.0;
    }
    if keys.pressed(KeyCode::ControlLeft) || keys.pressed(KeyCode::ControlRight) {
        speed *= 0.25;
    }

    if dir.length_squared() > 0.0 {
        t.translation += dir.normalize() * speed * time.delta_secs();
    }
}
