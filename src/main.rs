//! holomenu - floating, player-anchored menus for tick-driven worlds
//!
//! Headless demo executable

mod config;
mod demo;

use anyhow::Result;
use clap::Parser;
use config::AppConfig;
use demo::Demo;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless floating-menu demo", long_about = None)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ticks to simulate (overrides the config file)
    #[arg(long)]
    ticks: Option<u64>,

    /// Pace ticks at 20 TPS
    #[arg(long)]
    realtime: bool,

    /// Write published interactions to this JSONL file
    #[arg(long)]
    event_log: Option<PathBuf>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting holomenu v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    };
    if let Some(ticks) = args.ticks {
        cfg.demo.ticks = ticks;
    }
    if args.realtime {
        cfg.demo.realtime = true;
    }
    if args.event_log.is_some() {
        cfg.demo.event_log = args.event_log.clone();
    }

    if let Some(path) = &args.write_config {
        cfg.save_to_path(path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let demo = Demo::new(&cfg)?;
    let summary = if cfg.demo.realtime {
        demo.run_realtime(cfg.demo.ticks)?
    } else {
        demo.run_stepped(cfg.demo.ticks)
    };

    println!(
        "ticks={} published={} rejected={} closed_early={}",
        summary.ticks, summary.published, summary.rejected, summary.menu_closed_early
    );
    Ok(())
}
