mod common;

use std::collections::HashSet;

use common::{active_fx, tick_n, RecordingHost};
use waterfx::{CausticAnimator, CausticConfig, EffectsConfig, NodeSpec, WaterRegime};

fn run_frames(anim: &mut CausticAnimator, frames: usize) {
    for _ in 0..frames {
        anim.advance(0.5, WaterRegime::AboveWater);
    }
}

#[test]
fn texture_index_visits_every_frame_before_repeating() {
    for n in 1..=9usize {
        for cadence in [1u32, 5, 6, 8, 10] {
            let cfg = CausticConfig { layer_count: 3, frame_cadence: cadence, ..Default::default() };
            let mut anim = CausticAnimator::new(&cfg, n);
            for layer in 0..3 {
                let mut seen = vec![anim.layers()[layer].texture_index];
                let mut ahead = anim.clone();
                for _ in 1..n {
                    run_frames(&mut ahead, cadence as usize);
                    seen.push(ahead.layers()[layer].texture_index);
                }
                let unique: HashSet<_> = seen.iter().copied().collect();
                assert_eq!(unique.len(), n, "n={n} cadence={cadence} layer={layer}: {seen:?}");
                assert!(seen.iter().all(|&i| i < n));
                // one more cadence wraps back to the start
                run_frames(&mut ahead, cadence as usize);
                assert_eq!(ahead.layers()[layer].texture_index, seen[0]);
            }
            run_frames(&mut anim, 1);
        }
    }
}

#[test]
fn index_only_moves_on_cadence_frames() {
    let cfg = CausticConfig { frame_cadence: 6, ..Default::default() };
    let mut anim = CausticAnimator::new(&cfg, 4);
    let start = anim.layers()[0].texture_index;
    run_frames(&mut anim, 5);
    assert_eq!(anim.layers()[0].texture_index, start);
    run_frames(&mut anim, 1);
    assert_eq!(anim.layers()[0].texture_index, (start + 1) % 4);
}

#[test]
fn neighbouring_layers_show_different_frames() {
    let cfg = CausticConfig { layer_count: 4, stagger: 2, ..Default::default() };
    let anim = CausticAnimator::new(&cfg, 16);
    let idx: Vec<_> = anim.layers().iter().map(|l| l.texture_index).collect();
    assert_eq!(idx, vec![0, 2, 4, 6]);
}

#[test]
fn clock_is_monotone_and_layers_decorrelate() {
    let cfg = CausticConfig { layer_count: 4, ..Default::default() };
    let mut anim = CausticAnimator::new(&cfg, 8);
    let mut last = anim.time();
    for _ in 0..50 {
        anim.advance(1.0, WaterRegime::BelowWater);
        assert!(anim.time() > last);
        last = anim.time();
        let offsets: Vec<_> = anim.layers().iter().map(|l| l.offset).collect();
        for i in 0..offsets.len() {
            for j in (i + 1)..offsets.len() {
                assert!(offsets[i].distance(offsets[j]) > 1e-4, "layers {i} and {j} coincide");
            }
        }
    }
}

#[test]
fn animator_waits_for_textures() {
    let mut host = RecordingHost::default();
    let mut fx = common::Fx::new(EffectsConfig::default());
    fx.marker_found(&mut host);
    tick_n(&mut fx, &mut host, 30, 100.0);
    assert!(fx.caustics().is_none());
    assert!(host.caustic_writes.is_empty());
    assert_eq!(host.caustic_layers(), 0);
    // the surface keeps animating meanwhile
    assert_eq!(host.surface_writes.len(), 30);
}

#[test]
fn animated_layers_receive_in_range_textures() {
    let cfg = EffectsConfig {
        caustics: CausticConfig { texture_count: 5, frame_cadence: 5, ..Default::default() },
        ..Default::default()
    };
    let mut host = RecordingHost::default();
    let mut fx = active_fx(cfg, &mut host);
    assert_eq!(host.caustic_layers(), 3);
    tick_n(&mut fx, &mut host, 120, 100.0);
    assert!(!host.caustic_writes.is_empty());
    for w in &host.caustic_writes {
        let tex = w.texture.expect("animated layer gets a texture");
        assert!(tex < 5);
        assert!(w.offset.is_some());
    }
    let used: HashSet<_> = host.caustic_writes.iter().filter_map(|w| w.texture).collect();
    assert_eq!(used.len(), 5);
}

#[test]
fn refused_layer_leaves_the_others_on_their_own_pattern() {
    let mut host = RecordingHost::default();
    host.refuse_layer = Some(0);
    let mut fx = active_fx(EffectsConfig::default(), &mut host);
    assert_eq!(host.caustic_layers(), 2);

    tick_n(&mut fx, &mut host, 10, 100.0);
    let anim = fx.caustics().expect("animator running");
    let last_frame = &host.caustic_writes[host.caustic_writes.len() - 2..];
    for w in last_frame {
        let Some(NodeSpec::CausticLayer { index, .. }) = host.live.get(&w.node) else {
            panic!("write to a non-layer node {}", w.node);
        };
        assert_ne!(*index, 0);
        let layer = &anim.layers()[*index];
        assert_eq!(w.offset, Some(layer.offset), "layer {index}");
        assert_eq!(w.opacity, layer.opacity);
        assert_eq!(w.texture, Some(layer.texture_index as u32));
    }

    fx.marker_lost(&mut host);
    assert_eq!(host.caustic_layers(), 0);
    assert_eq!(host.bad_despawns, 0);
}
