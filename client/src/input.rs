use bevy::prelude::*;

/// Step applied per key press, in slider percent.
pub const LEVEL_STEP: f32 = 5.0;

/// Shared resource for the water level slider, 0..=100.
#[derive(Resource, Debug, Clone, Default)]
pub struct WaterLevelInput {
    pub percent: f32,
}

impl WaterLevelInput {
    pub fn nudge(&mut self, delta: f32) {
        self.percent = (self.percent + delta).clamp(0.0, 100.0);
    }
}

/// Up/Down arrows raise and lower the slider.
pub fn nudge_level_keys(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut input: ResMut<WaterLevelInput>,
) {
    let Some(keys) = keys else {
        return;
    };
    if keys.just_pressed(KeyCode::ArrowUp) {
        input.nudge(LEVEL_STEP);
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        input.nudge(-LEVEL_STEP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_stays_on_the_slider() {
        let mut input = WaterLevelInput { percent: 97.0 };
        input.nudge(LEVEL_STEP);
        assert_eq!(input.percent, 100.0);
        input.nudge(-250.0);
        assert_eq!(input.percent, 0.0);
    }
}
