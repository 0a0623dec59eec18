#[cfg(test)]
mod integration {
    use std::time::Duration;

    use anyhow::{Context, Result};
    use bevy::pbr::{DistanceFog, FogFalloff};
    use bevy::prelude::*;
    use bevy::time::TimeUpdateStrategy;
    use client::scene::host::{
        CausticLayerNode, ControlsUi, GaugePart, MarkerAnchor, MarkerLight, UnderwaterFill,
        ViewerCamera, WaterSurface,
    };
    use client::scene::proctex::ProcTexAssets;
    use client::scene::water::{WaterFxState, WaterFxTelemetry};
    use client::{build_minimal_client_app, Args, MarkerEvent, RemoveEffects, WaterLevelInput};
    use waterfx::{EffectsConfig, TextureSet, WaterRegime, MARKER_FOUND_MESSAGE};

    const FRAME: Duration = Duration::from_millis(16);
    const SUN_LUX: f32 = 10_000.0;
    const SCENE_CLEAR: Color = Color::srgb(0.5, 0.6, 0.7);

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    /// Headless app with a marker, a sun and a viewer at `viewer_y`.
    fn stage(cfg: EffectsConfig, viewer_y: f32) -> (App, Entity, Entity) {
        init_tracing();
        let mut app = build_minimal_client_app(Args::default(), cfg);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
            .insert_resource(ClearColor(SCENE_CLEAR));
        let world = app.world_mut();
        let anchor = world.spawn((MarkerAnchor, Transform::default())).id();
        world.spawn((ViewerCamera, Transform::from_xyz(0.0, viewer_y, 3.0)));
        let sun = world
            .spawn(DirectionalLight { illuminance: SUN_LUX, ..Default::default() })
            .id();
        app.update();
        (app, anchor, sun)
    }

    fn advance_app(app: &mut App, frames: usize) {
        for _ in 0..frames {
            app.update();
        }
    }

    fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
        let world = app.world_mut();
        world.query_filtered::<Entity, F>().iter(world).count()
    }

    fn clear_rgb(app: &App) -> Option<[f32; 3]> {
        let c = app.world().get_resource::<ClearColor>()?.0.to_srgba();
        Some([c.red, c.green, c.blue])
    }

    fn camera_has_fog(app: &mut App) -> bool {
        count::<(With<ViewerCamera>, With<DistanceFog>)>(app) > 0
    }

    fn camera_ambient(app: &mut App) -> Result<Option<AmbientLight>> {
        let world = app.world_mut();
        let ambient = world
            .query_filtered::<Option<&AmbientLight>, With<ViewerCamera>>()
            .single(world)
            .context("one viewer camera")?;
        Ok(ambient.cloned())
    }

    fn instant_cfg() -> EffectsConfig {
        EffectsConfig { smoothing_alpha: 1.0, ..Default::default() }
    }

    #[test]
    fn marker_found_builds_effects_under_the_anchor() -> Result<()> {
        let (mut app, anchor, _) = stage(EffectsConfig::default(), 100.0);
        app.world_mut().send_event(MarkerEvent::Found);
        advance_app(&mut app, 2);

        assert_eq!(count::<With<WaterSurface>>(&mut app), 1);
        assert_eq!(count::<With<MarkerLight>>(&mut app), 1);
        assert_eq!(count::<With<UnderwaterFill>>(&mut app), 1);
        // column + ticks at 0, 2, .., 10
        assert_eq!(count::<With<GaugePart>>(&mut app), 7);

        let world = app.world_mut();
        let surface = world
            .query_filtered::<Entity, With<WaterSurface>>()
            .single(world)
            .context("one surface")?;
        assert_eq!(world.get::<ChildOf>(surface).map(|c| c.parent()), Some(anchor));

        let controls = world.resource::<ControlsUi>();
        assert!(controls.visible);
        assert_eq!(controls.message, MARKER_FOUND_MESSAGE);

        // No generated frames in a headless app: layers fall back to flat.
        assert_eq!(*world.resource::<WaterFxState>().textures(), TextureSet::Failed);
        assert_eq!(count::<With<CausticLayerNode>>(&mut app), 3);
        Ok(())
    }

    #[test]
    fn generated_frames_make_animated_layers() -> Result<()> {
        let (mut app, _, _) = stage(EffectsConfig::default(), 100.0);
        app.insert_resource(ProcTexAssets {
            caustic_frames: vec![Handle::default(); 16],
            ripples: None,
        });
        app.world_mut().send_event(MarkerEvent::Found);
        advance_app(&mut app, 3);

        let fx = app.world().resource::<WaterFxState>();
        assert!(matches!(fx.textures(), TextureSet::Ready(frames) if frames.len() == 16));
        let anim = fx.caustics().context("animator running")?;
        assert!(anim.frame() > 0);
        assert_eq!(count::<With<CausticLayerNode>>(&mut app), 3);
        Ok(())
    }

    #[test]
    fn slider_drives_level_and_year() -> Result<()> {
        let (mut app, _, _) = stage(EffectsConfig::default(), 100.0);
        app.world_mut().send_event(MarkerEvent::Found);
        app.world_mut().resource_mut::<WaterLevelInput>().percent = 50.0;
        advance_app(&mut app, 400);

        let fx = app.world().resource::<WaterFxState>();
        assert_eq!(fx.reading().year, 2065);
        assert!((fx.level().current - 5.0).abs() < 1e-3);
        let last = app.world().resource::<WaterFxTelemetry>().last.context("ticked")?;
        assert_eq!(last.regime, WaterRegime::AboveWater);
        Ok(())
    }

    #[test]
    fn underwater_round_trip_restores_scene() -> Result<()> {
        let cfg = instant_cfg();
        let underwater_clear = cfg.lighting.underwater_clear_color;
        let dim = cfg.lighting.directional_dim_factor;
        let fill = cfg.lighting.underwater_light_color;
        let fill_brightness = cfg.lighting.underwater_light_illuminance;
        let (mut app, _, sun) = stage(cfg, 0.2);

        app.world_mut().resource_mut::<WaterLevelInput>().percent = 100.0;
        app.world_mut().send_event(MarkerEvent::Found);
        advance_app(&mut app, 3);

        assert_eq!(app.world().resource::<WaterFxState>().regime(), WaterRegime::BelowWater);
        let clear = clear_rgb(&app).context("clear color")?;
        assert!((clear[1] - underwater_clear.g).abs() < 1e-4, "{clear:?}");
        assert!(camera_has_fog(&mut app));
        let lux = app.world().get::<DirectionalLight>(sun).context("sun")?.illuminance;
        assert!((lux - SUN_LUX * dim).abs() < 1e-2);
        let ambient = camera_ambient(&mut app)?.context("underwater ambient on the camera")?;
        assert_eq!(ambient.color, Color::srgb(fill.r, fill.g, fill.b));
        assert_eq!(ambient.brightness, fill_brightness);

        app.world_mut().send_event(MarkerEvent::Lost);
        advance_app(&mut app, 2);

        let clear = clear_rgb(&app).context("clear color")?;
        assert!((clear[0] - 0.5).abs() < 1e-4 && (clear[2] - 0.7).abs() < 1e-4, "{clear:?}");
        assert!(!camera_has_fog(&mut app));
        assert!(camera_ambient(&mut app)?.is_none());
        assert_eq!(app.world().get::<DirectionalLight>(sun).context("sun")?.illuminance, SUN_LUX);
        assert_eq!(count::<With<WaterSurface>>(&mut app), 0);
        assert_eq!(count::<With<CausticLayerNode>>(&mut app), 0);
        assert_eq!(count::<With<GaugePart>>(&mut app), 0);
        assert_eq!(count::<With<UnderwaterFill>>(&mut app), 0);
        assert_eq!(count::<With<MarkerLight>>(&mut app), 0);
        assert!(!app.world().resource::<ControlsUi>().visible);
        Ok(())
    }

    #[test]
    fn camera_fog_and_ambient_survive_a_dive() -> Result<()> {
        let (mut app, _, _) = stage(instant_cfg(), 2.0);
        let fog_color = Color::srgb(0.6, 0.6, 0.65);
        let sun_glow = Color::srgb(1.0, 0.9, 0.7);
        let camera = {
            let world = app.world_mut();
            let camera = world
                .query_filtered::<Entity, With<ViewerCamera>>()
                .single(world)
                .context("viewer camera")?;
            world.entity_mut(camera).insert((
                DistanceFog {
                    color: fog_color,
                    directional_light_color: sun_glow,
                    directional_light_exponent: 12.0,
                    falloff: FogFalloff::Linear { start: 5.0, end: 50.0 },
                    ..Default::default()
                },
                AmbientLight { brightness: 123.0, ..Default::default() },
            ));
            camera
        };

        app.world_mut().resource_mut::<WaterLevelInput>().percent = 100.0;
        app.world_mut().send_event(MarkerEvent::Found);
        advance_app(&mut app, 3);
        assert_eq!(app.world().resource::<WaterFxState>().regime(), WaterRegime::BelowWater);
        let underwater = app.world().get::<DistanceFog>(camera).context("underwater fog")?;
        assert!(matches!(underwater.falloff, FogFalloff::Exponential { .. }));
        let ambient = app.world().get::<AmbientLight>(camera).context("fill ambient")?;
        assert_ne!(ambient.brightness, 123.0);

        app.world_mut().resource_mut::<WaterLevelInput>().percent = 0.0;
        advance_app(&mut app, 3);
        assert_eq!(app.world().resource::<WaterFxState>().regime(), WaterRegime::AboveWater);

        let fog = app.world().get::<DistanceFog>(camera).context("scene fog kept")?;
        assert_eq!(fog.color, fog_color);
        assert_eq!(fog.directional_light_color, sun_glow);
        assert_eq!(fog.directional_light_exponent, 12.0);
        assert!(
            matches!(fog.falloff, FogFalloff::Linear { start, end } if start == 5.0 && end == 50.0),
            "{:?}",
            fog.falloff
        );
        let ambient = app.world().get::<AmbientLight>(camera).context("scene ambient kept")?;
        assert_eq!(ambient.brightness, 123.0);
        Ok(())
    }

    #[test]
    fn found_and_lost_in_one_frame_leaves_nothing_behind() {
        let (mut app, _, _) = stage(instant_cfg(), 100.0);
        app.world_mut().send_event(MarkerEvent::Found);
        app.world_mut().send_event(MarkerEvent::Lost);
        advance_app(&mut app, 2);
        assert_eq!(count::<With<WaterSurface>>(&mut app), 0);
        assert_eq!(count::<With<GaugePart>>(&mut app), 0);
        assert_eq!(count::<With<CausticLayerNode>>(&mut app), 0);
        assert!(!app.world().resource::<WaterFxState>().is_active());
    }

    #[test]
    fn removal_is_final() {
        let (mut app, _, _) = stage(EffectsConfig::default(), 100.0);
        app.world_mut().send_event(MarkerEvent::Found);
        advance_app(&mut app, 2);
        app.world_mut().send_event(RemoveEffects);
        advance_app(&mut app, 1);
        assert_eq!(count::<With<WaterSurface>>(&mut app), 0);

        app.world_mut().send_event(MarkerEvent::Found);
        advance_app(&mut app, 2);
        let fx = app.world().resource::<WaterFxState>();
        assert!(fx.is_removed());
        assert!(!fx.is_active());
        assert_eq!(count::<With<WaterSurface>>(&mut app), 0);
    }
}
