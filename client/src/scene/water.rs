use std::time::Instant;

use bevy::prelude::*;
use tracing::{debug, info, warn};
use waterfx::{EffectsConfig, FrameReport, WaterFx};

use super::host::{
    BevyHost, CapturedCameraLook, ControlsUi, LoadOutcome, MarkerAnchor, PendingCausticLoad,
    ViewerCamera, WaterSurface,
};
use crate::input::WaterLevelInput;
use crate::marker::{MarkerEvent, RemoveEffects};
use crate::session_metrics::SessionMetrics;

// ---------- Plugin ----------

/// The controller, driven with Bevy entities and image handles.
#[derive(Resource, Deref, DerefMut)]
pub struct WaterFxState(pub WaterFx<Entity, Handle<Image>>);

/// What the last tick produced.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct WaterFxTelemetry {
    pub last: Option<FrameReport>,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct WaterFxSet;

pub struct WaterFxPlugin {
    pub config: EffectsConfig,
}

impl Plugin for WaterFxPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(WaterFxState(WaterFx::new(self.config.clone())))
            .init_resource::<PendingCausticLoad>()
            .init_resource::<CapturedCameraLook>()
            .init_resource::<ControlsUi>()
            .init_resource::<WaterFxTelemetry>()
            .init_resource::<WaterLevelInput>()
            .add_event::<MarkerEvent>()
            .add_event::<RemoveEffects>()
            .add_systems(
                Update,
                (handle_marker_events, apply_level_input, poll_caustic_loads, tick_water_fx)
                    .chain()
                    .in_set(WaterFxSet),
            )
            .add_systems(Last, remove_effects);
    }
}

// ---------- Systems ----------

fn handle_marker_events(
    mut events: EventReader<MarkerEvent>,
    mut fx: ResMut<WaterFxState>,
    mut host: BevyHost,
) {
    for ev in events.read() {
        match ev {
            MarkerEvent::Found => fx.marker_found(&mut host),
            MarkerEvent::Lost => fx.marker_lost(&mut host),
        }
    }
}

fn apply_level_input(input: Res<WaterLevelInput>, mut fx: ResMut<WaterFxState>) {
    if !input.is_changed() {
        return;
    }
    let reading = fx.set_slider(input.percent);
    debug!(percent = reading.percent, target = reading.target_level, year = reading.year, "level input");
}

fn poll_caustic_loads(mut fx: ResMut<WaterFxState>, mut host: BevyHost) {
    let Some((ticket, outcome)) = host.poll_texture_load() else {
        return;
    };
    match outcome {
        LoadOutcome::Ready(frames) => {
            fx.textures_loaded(ticket, frames, &mut host);
        }
        LoadOutcome::Failed => {
            warn!(?ticket, "caustic frames unavailable, using flat layers");
            fx.textures_failed(ticket, &mut host);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn tick_water_fx(
    time: Res<Time>,
    mut fx: ResMut<WaterFxState>,
    mut host: BevyHost,
    viewer: Query<&Transform, (With<ViewerCamera>, Without<WaterSurface>)>,
    anchor: Query<&Transform, (With<MarkerAnchor>, Without<WaterSurface>)>,
    mut telemetry: ResMut<WaterFxTelemetry>,
    metrics: Option<ResMut<SessionMetrics>>,
) {
    let ground = anchor.iter().next().map(|t| t.translation.y).unwrap_or(0.0);
    let viewer_y = viewer.iter().next().map(|t| t.translation.y - ground).unwrap_or(0.0);

    let started = Instant::now();
    let report = fx.tick(
        time.elapsed_secs_f64() * 1000.0,
        time.delta_secs() * 1000.0,
        viewer_y,
        &mut host,
    );
    let Some(report) = report else {
        return;
    };
    telemetry.last = Some(report);
    if let Some(mut metrics) = metrics {
        metrics.stats.record_render_time(started.elapsed().as_secs_f32() * 1000.0);
    }
}

fn remove_effects(
    mut removals: EventReader<RemoveEffects>,
    mut exits: EventReader<AppExit>,
    mut fx: ResMut<WaterFxState>,
    mut host: BevyHost,
) {
    let requested = removals.read().count() > 0;
    let exiting = exits.read().count() > 0;
    if (requested || exiting) && !fx.is_removed() {
        fx.remove(&mut host);
        info!(exiting, "water effects removed");
    }
}
