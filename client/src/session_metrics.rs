use std::time::Instant;

use bevy::prelude::*;
use tracing::{debug, info};
use waterfx::SessionStats;

use crate::marker::MarkerEvent;

/// Rolling frame and tracking stats for the running session.
#[derive(Resource, Debug)]
pub struct SessionMetrics {
    pub stats: SessionStats,
    pub started: Instant,
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self { stats: SessionStats::default(), started: Instant::now() }
    }
}

impl SessionMetrics {
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Seconds between periodic stats lines in the log.
const LOG_INTERVAL_SECS: f32 = 10.0;

pub struct SessionMetricsPlugin;

impl Plugin for SessionMetricsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SessionMetrics>()
            .add_systems(Update, (sample_frame_time, count_marker_events, log_periodic_stats))
            .add_systems(Last, log_session_report);
    }
}

fn sample_frame_time(time: Res<Time>, mut metrics: ResMut<SessionMetrics>) {
    metrics.stats.record_frame(time.delta_secs() * 1000.0);
}

fn count_marker_events(mut events: EventReader<MarkerEvent>, mut metrics: ResMut<SessionMetrics>) {
    for ev in events.read() {
        match ev {
            MarkerEvent::Found => metrics.stats.marker_detected(),
            MarkerEvent::Lost => metrics.stats.marker_lost(),
        }
    }
}

fn log_periodic_stats(time: Res<Time>, mut since: Local<f32>, metrics: Res<SessionMetrics>) {
    *since += time.delta_secs();
    if *since < LOG_INTERVAL_SECS {
        return;
    }
    *since = 0.0;
    debug!(report = %metrics.stats.report(metrics.elapsed_secs()), "session stats");
}

fn log_session_report(mut exits: EventReader<AppExit>, metrics: Res<SessionMetrics>) {
    if exits.read().next().is_some() {
        info!(report = %metrics.stats.report(metrics.elapsed_secs()), "session finished");
    }
}
