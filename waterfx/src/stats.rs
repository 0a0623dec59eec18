use std::collections::VecDeque;
use std::fmt;

/// Frames kept for the rolling averages.
pub const STATS_WINDOW: usize = 60;

/// Rolling session statistics for an AR run: frame rate, render time and
/// marker detection counters.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    fps: VecDeque<f32>,
    render_ms: VecDeque<f32>,
    pub marker_detections: u32,
    pub marker_losses: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionReport {
    pub average_fps: f32,
    pub average_render_ms: f32,
    pub marker_detections: u32,
    pub marker_losses: u32,
    pub session_secs: u64,
}

fn push_window(buf: &mut VecDeque<f32>, v: f32) {
    buf.push_back(v);
    while buf.len() > STATS_WINDOW {
        buf.pop_front();
    }
}

fn mean(buf: &VecDeque<f32>) -> f32 {
    if buf.is_empty() {
        return 0.0;
    }
    buf.iter().sum::<f32>() / buf.len() as f32
}

impl SessionStats {
    /// Record one frame interval. Zero or negative intervals are ignored.
    pub fn record_frame(&mut self, delta_ms: f32) {
        if delta_ms > 0.0 && delta_ms.is_finite() {
            push_window(&mut self.fps, 1000.0 / delta_ms);
        }
    }

    pub fn record_render_time(&mut self, ms: f32) {
        if ms.is_finite() {
            push_window(&mut self.render_ms, ms.max(0.0));
        }
    }

    pub fn marker_detected(&mut self) {
        self.marker_detections += 1;
    }

    pub fn marker_lost(&mut self) {
        self.marker_losses += 1;
    }

    pub fn average_fps(&self) -> f32 {
        mean(&self.fps)
    }

    pub fn average_render_ms(&self) -> f32 {
        mean(&self.render_ms)
    }

    pub fn samples(&self) -> usize {
        self.fps.len()
    }

    pub fn report(&self, session_secs: f64) -> SessionReport {
        SessionReport {
            average_fps: self.average_fps(),
            average_render_ms: self.average_render_ms(),
            marker_detections: self.marker_detections,
            marker_losses: self.marker_losses,
            session_secs: session_secs.max(0.0).floor() as u64,
        }
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "avg fps {:.1} | render {:.2} ms | markers +{} -{} | {} s",
            self.average_fps,
            self.average_render_ms,
            self.marker_detections,
            self.marker_losses,
            self.session_secs
        )
    }
}
