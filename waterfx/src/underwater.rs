use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaterRegime {
    #[default]
    AboveWater,
    BelowWater,
}

impl WaterRegime {
    pub fn is_underwater(self) -> bool {
        matches!(self, Self::BelowWater)
    }
}

/// Tracks which side of the surface the viewer is on and reports edges only.
#[derive(Debug, Clone)]
pub struct UnderwaterTracker {
    regime: WaterRegime,
    pub threshold: f32,
}

impl UnderwaterTracker {
    pub fn new(threshold: f32) -> Self {
        Self { regime: WaterRegime::AboveWater, threshold }
    }

    pub fn regime(&self) -> WaterRegime {
        self.regime
    }

    pub fn is_underwater(&self) -> bool {
        self.regime.is_underwater()
    }

    /// Re-evaluate against the live level. Returns the new regime on an edge,
    /// `None` while the state is unchanged.
    pub fn evaluate(&mut self, level: f32, viewer_y: f32) -> Option<WaterRegime> {
        let below = level > viewer_y - self.threshold;
        let next = if below { WaterRegime::BelowWater } else { WaterRegime::AboveWater };
        if next == self.regime {
            return None;
        }
        debug!(?next, level, viewer_y, threshold = self.threshold, "water regime edge");
        self.regime = next;
        Some(next)
    }

    pub fn reset(&mut self) {
        self.regime = WaterRegime::AboveWater;
    }
}
