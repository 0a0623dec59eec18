use bevy::prelude::*;

use crate::scene::host::ControlsUi;
use crate::scene::water::{WaterFxState, WaterFxTelemetry};
use crate::session_metrics::SessionMetrics;

#[derive(Component)]
struct InfoMessageNode;

#[derive(Component)]
struct StatusOverlayNode;

/// Info message at the top, level/regime/session readout at the top right.
pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_overlay)
            .add_systems(Update, (update_info_message, update_status_overlay));
    }
}

fn spawn_overlay(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(170.0),
            top: Val::Px(10.0),
            ..Default::default()
        },
        Text::new("Point the camera at the marker. Press M to toggle it."),
        TextFont { font_size: 18.0, ..Default::default() },
        TextColor(Color::WHITE),
        InfoMessageNode,
        Name::new("Info Message"),
    ));
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(10.0),
            top: Val::Px(10.0),
            ..Default::default()
        },
        Text::new(String::new()),
        TextFont { font_size: 16.0, ..Default::default() },
        TextColor(Color::WHITE),
        StatusOverlayNode,
        Name::new("Status Overlay"),
    ));
}

fn update_info_message(controls: Res<ControlsUi>, mut q: Query<&mut Text, With<InfoMessageNode>>) {
    if !controls.is_changed() || controls.message.is_empty() {
        return;
    }
    for mut text in &mut q {
        text.0 = controls.message.clone();
    }
}

fn update_status_overlay(
    fx: Res<WaterFxState>,
    telemetry: Res<WaterFxTelemetry>,
    metrics: Option<Res<SessionMetrics>>,
    mut q: Query<&mut Text, With<StatusOverlayNode>>,
) {
    let Ok(mut text) = q.single_mut() else {
        return;
    };
    let mut s = String::new();
    let reading = fx.reading();
    s.push_str(&format!("Year {}  (+{:.1} m)\n", reading.year, reading.target_level));
    match telemetry.last.filter(|_| fx.is_active()) {
        Some(r) => {
            s.push_str(&format!("Level {:.2} m  depth {:.2}\n", r.level, r.depth_factor));
            s.push_str(&format!("{:?}", r.regime));
            if let Some(d) = r.fog_density {
                s.push_str(&format!("  fog {d:.3}"));
            }
            s.push('\n');
        }
        None => s.push_str("Marker not tracked\n"),
    }
    if let Some(m) = metrics {
        s.push_str(&m.stats.report(m.elapsed_secs()).to_string());
    }
    text.0 = s;
}
