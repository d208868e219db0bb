use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use textmerge::{
    config::{Config, DEFAULT_DESTINATION, DEFAULT_SOURCE},
    pipeline,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Merge a CSV of (list_name, item_key, note, text) rows into a nested JSON text store.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// CSV table to read; the first row is a header
    #[arg(long, env = "TEXTMERGE_SOURCE", default_value = DEFAULT_SOURCE)]
    source: PathBuf,

    /// JSON document to update in place
    #[arg(long, env = "TEXTMERGE_DESTINATION", default_value = DEFAULT_DESTINATION)]
    destination: PathBuf,

    /// Start from an empty document if the destination does not exist
    #[arg(long)]
    create_missing: bool,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    // stderr only: stdout carries the confirmation line
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) configure paths ──────────────────────────────────────────
    let args = Args::parse();
    let cfg = Config::new(args.source, args.destination).with_create_missing(args.create_missing);
    info!(
        source = %cfg.source.display(),
        destination = %cfg.destination.display(),
        create_missing = cfg.create_missing,
        "startup"
    );

    // ─── 3) read → load → merge → write ──────────────────────────────
    let summary = pipeline::run(&cfg)?;

    println!("JSON file updated: {}", summary.destination.display());
    Ok(())
}
