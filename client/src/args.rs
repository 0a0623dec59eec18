use std::path::PathBuf;

use bevy::prelude::Resource;
use clap::Parser;
use waterfx::EffectsConfig;

#[derive(Parser, Debug, Resource, Clone, Default)]
#[command(name = "tidemark")]
#[command(about = "Marker-anchored sea level rise visualisation", long_about = None)]
pub struct Args {
    /// Effects config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Run without window/rendering
    #[arg(long, default_value_t = false)]
    pub headless: bool,
    /// Report the marker as found at startup
    #[arg(long, default_value_t = false)]
    pub show_marker: bool,
    /// Water rise at 100% on the slider, in meters
    #[arg(long)]
    pub max_water_rise: Option<f32>,
    #[arg(long)]
    pub start_year: Option<i32>,
    #[arg(long)]
    pub end_year: Option<i32>,
    #[arg(long)]
    pub caustic_layers: Option<usize>,
    /// Load caustic frames from `<dir>/caustic_XX.png` instead of generating them
    #[arg(long)]
    pub caustic_dir: Option<String>,
}

impl Args {
    /// Command line values win over the config file.
    pub fn apply_overrides(&self, cfg: &mut EffectsConfig) {
        if let Some(v) = self.max_water_rise {
            cfg.max_water_rise = v;
        }
        if let Some(v) = self.start_year {
            cfg.start_year = v;
        }
        if let Some(v) = self.end_year {
            cfg.end_year = v;
        }
        if let Some(v) = self.caustic_layers {
            cfg.caustics.layer_count = v;
        }
    }
}
