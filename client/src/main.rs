use anyhow::Result;
use clap::Parser;

use client::{build_client_app, load_config, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let cfg = load_config(&args)?;
    let mut app = build_client_app(args, cfg);
    app.run();
    Ok(())
}
