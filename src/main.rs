//! dmcombat - line-oriented combat tool driver
//!
//! Reads one JSON tool request per line on stdin
//! (`{"tool": "apply_damage", "arguments": {...}}`) and writes one JSON
//! outcome per line on stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dmcombat::tools::{ToolOutcome, ToolRequest};
use dmcombat::{build_manager, Settings};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tabletop combat tracker
#[derive(Parser, Debug)]
#[command(name = "dmcombat", version, about = "Run combat tools from JSON lines")]
struct Args {
    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for reproducible dice (overrides settings)
    #[arg(long)]
    seed: Option<u64>,

    /// Extra monster stat blocks, as a JSON array (overrides settings)
    #[arg(long)]
    catalog: Option<PathBuf>,
}

fn init_tracing(settings: &Settings) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| settings.log_filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    if settings.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if args.seed.is_some() {
        settings.rng_seed = args.seed;
    }
    if args.catalog.is_some() {
        settings.catalog_path = args.catalog;
    }

    init_tracing(&settings);
    let manager = build_manager(&settings)?;
    info!("dmcombat ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let outcome = match serde_json::from_str::<ToolRequest>(line) {
            Ok(request) => {
                debug!("Running {}", request.tool);
                request.execute(&manager).await
            }
            Err(e) => ToolOutcome::Error {
                tool: String::new(),
                error: format!("malformed request: {}", e),
            },
        };

        let mut encoded = serde_json::to_vec(&outcome)?;
        encoded.push(b'\n');
        stdout.write_all(&encoded).await?;
        stdout.flush().await?;
    }

    info!("dmcombat shutdown complete");
    Ok(())
}
