use tracing::debug;

use crate::appearance::SceneAppearance;
use crate::config::{EffectsConfig, MAX_WATER_RISE_LIMIT};
use crate::depth;
use crate::host::{EffectsHost, GaugeTick, MaterialKind, NodeSpec};

const GAUGE_TICK_SPACING: usize = 2;

/// Everything created for one marker activation.
///
/// Owned by the controller as an `Option`; teardown consumes it, so nothing
/// can be written to after destruction and a second teardown finds nothing.
#[derive(Debug, Clone)]
pub struct ActiveResources<N> {
    pub generation: u64,
    pub snapshot: SceneAppearance<N>,
    pub surface: Option<(N, MaterialKind)>,
    pub gauge: Vec<N>,
    pub marker_light: Option<N>,
    pub underwater_light: Option<N>,
    /// Layer index into the animator, node, material.
    pub caustic_layers: Vec<(usize, N, MaterialKind)>,
}

impl<N: Copy + Eq + std::fmt::Debug> ActiveResources<N> {
    pub fn build<H>(host: &mut H, cfg: &EffectsConfig, generation: u64) -> Self
    where
        H: EffectsHost<Node = N>,
    {
        let marker_light = host.spawn(NodeSpec::MarkerLight {
            illuminance: cfg.lighting.marker_light_illuminance,
        });
        // Marker light is included so it dims with the rest of the scene.
        let snapshot = host.capture_appearance();

        let kind = host.surface_kind();
        let params = depth::map(cfg, 0.0);
        let surface = host
            .spawn(NodeSpec::Surface {
                size: cfg.surface_size,
                kind,
                tint: params.tint,
                opacity: params.opacity,
            })
            .map(|n| (n, kind));

        let mut gauge = Vec::new();
        gauge.extend(host.spawn(NodeSpec::GaugeColumn { height: cfg.max_water_rise * 1.2 }));
        // Validated configs keep this in the hundreds.
        let top = cfg.max_water_rise.clamp(0.0, MAX_WATER_RISE_LIMIT) as usize;
        for i in (0..=top).step_by(GAUGE_TICK_SPACING) {
            gauge.extend(host.spawn(NodeSpec::GaugeTick(GaugeTick {
                y: i as f32,
                highlighted: i % 5 == 0,
            })));
        }

        let underwater_light = host.spawn(NodeSpec::UnderwaterLight {
            color: cfg.lighting.underwater_light_color,
            illuminance: cfg.lighting.underwater_light_illuminance,
        });

        Self {
            generation,
            snapshot,
            surface,
            gauge,
            marker_light,
            underwater_light,
            caustic_layers: Vec::new(),
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.surface
            .iter()
            .map(|(n, _)| *n)
            .chain(self.gauge.iter().copied())
            .chain(self.marker_light)
            .chain(self.underwater_light)
            .chain(self.caustic_layers.iter().map(|(_, n, _)| *n))
    }

    /// Restore the captured appearance, then detach every node.
    pub fn teardown<H>(self, host: &mut H)
    where
        H: EffectsHost<Node = N>,
    {
        for change in self.snapshot.restore_changes(self.underwater_light) {
            host.apply_appearance(&change);
        }
        let mut count = 0usize;
        for node in self.nodes() {
            host.despawn(node);
            count += 1;
        }
        debug!(generation = self.generation, nodes = count, "effects resources released");
    }
}
