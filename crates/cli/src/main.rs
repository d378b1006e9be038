use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cli::{AppConfig, LogFormat, MergeMode};

/// Extract campaign entities from session notes and resolve duplicates
#[derive(Parser, Debug)]
#[command(name = "lorekeep")]
#[command(about = "Extract NPCs, locations, items and quests from TTRPG session notes")]
struct Args {
    /// Session note file or directory of notes (.md, .txt)
    path: PathBuf,

    /// JSON config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Merge every duplicate group instead of only reporting it
    #[arg(long)]
    auto_merge: bool,

    /// Write the report here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).await?;
    if args.auto_merge {
        config.merge = MergeMode::Auto;
    }
    init_tracing(&config);

    let report = cli::run(&config, &args.path).await?;
    let json = if config.output.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write report {}", path.display()))?;
            tracing::info!(path = %path.display(), "Report written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_env("LOREKEEP_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
