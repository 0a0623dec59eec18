use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use waterfx::EffectsConfig;

use crate::args::Args;

/// Read the optional config file, apply command line overrides and validate.
pub fn load_config(args: &Args) -> Result<EffectsConfig> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => read_config(path)?,
        None => EffectsConfig::default(),
    };
    args.apply_overrides(&mut cfg);
    cfg.validate().context("invalid effects configuration")?;
    info!(?cfg, "effects config");
    Ok(cfg)
}

pub fn read_config(path: &Path) -> Result<EffectsConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_beat_defaults() -> Result<()> {
        let args = Args { max_water_rise: Some(4.0), caustic_layers: Some(2), ..Default::default() };
        let cfg = load_config(&args)?;
        assert_eq!(cfg.max_water_rise, 4.0);
        assert_eq!(cfg.caustics.layer_count, 2);
        assert_eq!(cfg.end_year, 2100);
        Ok(())
    }

    #[test]
    fn bad_override_is_rejected() {
        let args = Args { start_year: Some(2200), ..Default::default() };
        let err = load_config(&args).unwrap_err();
        assert!(format!("{err:#}").contains("invalid effects configuration"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let args = Args { config: Some("does/not/exist.toml".into()), ..Default::default() };
        let err = load_config(&args).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }
}
