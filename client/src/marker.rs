use bevy::prelude::*;
use tracing::info;

/// Marker tracking updates, as a tracker would report them.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerEvent {
    Found,
    Lost,
}

/// Tear the effects down for good.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RemoveEffects;

/// Simulated tracker state toggled from the keyboard.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct MarkerSim {
    pub visible: bool,
}

impl MarkerSim {
    /// Flip visibility and return the event to report.
    pub fn toggle(&mut self) -> MarkerEvent {
        self.visible = !self.visible;
        if self.visible {
            MarkerEvent::Found
        } else {
            MarkerEvent::Lost
        }
    }
}

/// M toggles marker visibility.
pub fn toggle_marker_key(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut sim: ResMut<MarkerSim>,
    mut events: EventWriter<MarkerEvent>,
) {
    let Some(keys) = keys else {
        return;
    };
    if keys.just_pressed(KeyCode::KeyM) {
        let ev = sim.toggle();
        info!(?ev, "marker toggled");
        events.write(ev);
    }
}

/// Report the marker as found once at startup.
pub fn show_marker_on_start(mut sim: ResMut<MarkerSim>, mut events: EventWriter<MarkerEvent>) {
    if !sim.visible {
        events.write(sim.toggle());
    }
}
