use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;
use bevy_inspector_egui::bevy_egui::EguiContexts;

use crate::input::WaterLevelInput;
use crate::scene::host::ControlsUi;
use crate::scene::water::WaterFxState;

pub struct HudControlsPlugin;

impl Plugin for HudControlsPlugin {
    fn build(&self, app: &mut App) {
        // Ensure the egui UI runs between BeginPass (PreUpdate) and EndPass (PostUpdate)
        app.add_systems(EguiPrimaryContextPass, ui_level_slider);
    }
}

fn ui_level_slider(
    mut egui_ctx: EguiContexts,
    controls: Res<ControlsUi>,
    mut input: ResMut<WaterLevelInput>,
    fx: Res<WaterFxState>,
) {
    use bevy_inspector_egui::egui::*;
    if !controls.visible {
        return;
    }
    let Ok(ctx) = egui_ctx.ctx_mut() else {
        return;
    };

    SidePanel::left("water_level_panel")
        .exact_width(150.0)
        .show(ctx, |ui| {
            ui.heading("Water level");
            ui.add_space(8.0);

            let mut v = input.percent;
            let slider = Slider::new(&mut v, 0.0..=100.0)
                .vertical()
                .suffix(" %")
                .clamping(SliderClamping::Always);
            ui.add(slider);
            if (v - input.percent).abs() > f32::EPSILON {
                input.percent = v;
            }

            ui.add_space(6.0);
            let reading = fx.reading();
            ui.label(format!("Year: {}", reading.year));
            ui.monospace(format!(
                "target {:.2} m\nlevel  {:.2} m",
                reading.target_level,
                fx.level().current
            ));
        });
}
