use bevy::image::{ImageAddressMode, ImageFilterMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};
use tracing::info;

use super::water::WaterFxState;

/// Generated textures for the water effects.
#[derive(Resource, Default)]
pub struct ProcTexAssets {
    /// Looping caustic animation, one handle per frame.
    pub caustic_frames: Vec<Handle<Image>>,
    /// Tileable ripple pattern scrolled across the water surface.
    pub ripples: Option<Handle<Image>>,
}

pub struct ProcTexPlugin;

impl Plugin for ProcTexPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProcTexAssets>()
            .add_systems(Startup, generate_water_textures);
    }
}

const CAUSTIC_SIZE: u32 = 128;
const RIPPLE_SIZE: u32 = 256;
const SEED: u32 = 0x00C0_FFEE;

fn generate_water_textures(
    mut images: ResMut<Assets<Image>>,
    mut out: ResMut<ProcTexAssets>,
    fx: Res<WaterFxState>,
) {
    let frames = fx.config().caustics.texture_count;
    out.caustic_frames = (0..frames)
        .map(|i| {
            let data = make_caustic_rgba(CAUSTIC_SIZE as usize, i, frames, SEED);
            images.add(tileable_image(CAUSTIC_SIZE, data))
        })
        .collect();
    let ripples = make_ripple_rgba(RIPPLE_SIZE as usize, SEED ^ 0x5EA5_1DE5);
    out.ripples = Some(images.add(tileable_image(RIPPLE_SIZE, ripples)));
    info!(frames, "generated water textures");
}

fn tileable_image(size: u32, data: Vec<u8>) -> Image {
    let mut image = Image::new(
        Extent3d { width: size, height: size, depth_or_array_layers: 1 },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.texture_descriptor.usage = TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST;
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        address_mode_w: ImageAddressMode::Repeat,
        mag_filter: ImageFilterMode::Linear,
        min_filter: ImageFilterMode::Linear,
        mipmap_filter: ImageFilterMode::Linear,
        ..Default::default()
    });
    image
}

// ---------------------- noise helpers ----------------------

fn fade(t: f32) -> f32 { t * t * t * (t * (t * 6.0 - 15.0) + 10.0) }

fn lerp(a: f32, b: f32, t: f32) -> f32 { a + (b - a) * t }

fn hash2(ix: i32, iy: i32, seed: u32) -> u32 {
    // 2D integer hash
    let mut x = ix as u32;
    let mut y = iy as u32 ^ seed;
    x = x.wrapping_mul(0x27d4eb2d);
    y = y.wrapping_mul(0x85ebca6b);
    let mut h = x ^ y ^ (seed.rotate_left(13));
    // final avalanche
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846ca68b);
    h ^= h >> 16;
    h
}

fn grad(ix: i32, iy: i32, seed: u32) -> (f32, f32) {
    let h = hash2(ix, iy, seed);
    // Map to angle [0, 2pi)
    let a = (h as f32 / u32::MAX as f32) * std::f32::consts::TAU;
    (a.cos(), a.sin())
}

fn perlin2_periodic(x: f32, y: f32, period_x: i32, period_y: i32, seed: u32) -> f32 {
    // Periodic gradient noise over integer lattice with wrapping periods
    let xi = x.floor() as i32;
    let yi = y.floor() as i32;
    let xf = x - xi as f32;
    let yf = y - yi as f32;
    let u = fade(xf);
    let v = fade(yf);

    let x0 = xi.rem_euclid(period_x);
    let y0 = yi.rem_euclid(period_y);
    let x1 = (xi + 1).rem_euclid(period_x);
    let y1 = (yi + 1).rem_euclid(period_y);

    let (gx00, gy00) = grad(x0, y0, seed);
    let (gx10, gy10) = grad(x1, y0, seed);
    let (gx01, gy01) = grad(x0, y1, seed);
    let (gx11, gy11) = grad(x1, y1, seed);

    let n00 = gx00 * xf + gy00 * yf;
    let n10 = gx10 * (xf - 1.0) + gy10 * yf;
    let n01 = gx01 * xf + gy01 * (yf - 1.0);
    let n11 = gx11 * (xf - 1.0) + gy11 * (yf - 1.0);

    let nx0 = lerp(n00, n10, u);
    let nx1 = lerp(n01, n11, u);
    lerp(nx0, nx1, v)
}

fn fbm2_tileable(x: f32, y: f32, base_period: i32, octaves: i32, seed: u32) -> f32 {
    let mut f = 0.0;
    let mut amp = 0.5;
    let mut freq = 1.0;
    for o in 0..octaves {
        let p = (base_period as f32 / freq).round().max(1.0) as i32;
        let n = perlin2_periodic(x * freq, y * freq, p, p, seed ^ (o as u32).wrapping_mul(0x9E37_79B9));
        f += n * amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    f
}

/// Bright thin ridges where the noise crosses zero. The sampling point walks
/// a circle in noise space so frame `n` wraps back to frame 0.
pub(crate) fn make_caustic_rgba(size: usize, frame: usize, frames: usize, seed: u32) -> Vec<u8> {
    let mut data = vec![0u8; size * size * 4];
    let period = 8;
    let angle = frame as f32 / frames.max(1) as f32 * std::f32::consts::TAU;
    let (ox, oy) = (angle.cos() * 1.5, angle.sin() * 1.5);
    for y in 0..size {
        for x in 0..size {
            let nx = x as f32 / size as f32 * period as f32;
            let ny = y as f32 / size as f32 * period as f32;
            let warp = fbm2_tileable(nx + ox * 0.5, ny - oy * 0.5, period, 2, seed ^ 0xA1B2_C3D4);
            let n = fbm2_tileable(nx + ox + warp * 0.6, ny + oy - warp * 0.6, period, 3, seed);
            let v = (1.0 - (n.abs() * 6.0).min(1.0)).powf(3.0);
            let idx = (y * size + x) * 4;
            data[idx] = (v * 0.80 * 255.0) as u8;
            data[idx + 1] = (v * 0.95 * 255.0) as u8;
            data[idx + 2] = (v * 255.0) as u8;
            data[idx + 3] = (v * 255.0) as u8;
        }
    }
    data
}

fn make_ripple_rgba(size: usize, seed: u32) -> Vec<u8> {
    let mut data = vec![0u8; size * size * 4];
    let period = 16;
    for y in 0..size {
        for x in 0..size {
            let nx = x as f32 / size as f32 * period as f32;
            let ny = y as f32 / size as f32 * period as f32;
            let n = fbm2_tileable(nx, ny, period, 4, seed);
            let lum = (0.8 + 0.2 * (n * 2.0).clamp(-1.0, 1.0)).clamp(0.0, 1.0);
            let idx = (y * size + x) * 4;
            data[idx] = (lum * 255.0) as u8;
            data[idx + 1] = (lum * 255.0) as u8;
            data[idx + 2] = (lum * 255.0) as u8;
            data[idx + 3] = 255;
        }
    }
    data
}
