use anyhow::Result;
use clap::Parser;
use cli::paths::validate_source_dir;
use cli::report;
use exfix_core::config::{self, AppConfig};
use exfix_core::pipeline;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, Level};

#[derive(Parser)]
#[command(name = "exfix")]
#[command(
    about = "Fill in a missing capture-date tag for Immich from the best available fallback tag",
    long_about = None
)]
struct Cli {
    /// Folder path to scan
    source_dir: PathBuf,

    /// Number of parallel workers [default: 4]
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    workers: Option<u16>,

    /// Do not modify files, only show actions
    #[arg(long)]
    dry_run: bool,

    /// Verbose logs (include skipped files)
    #[arg(short, long)]
    verbose: bool,

    /// Keep original files (default is overwrite)
    #[arg(long)]
    backup: bool,

    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    /// Output JSON summary
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("{err:#}");
            return ExitCode::from(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(if cfg.batch.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_target(false)
        .init();

    match run(&cli, &cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(1)
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    validate_source_dir(&cli.source_dir)?;

    let mut cfg = config::load(cli.config.as_deref())?;
    if let Some(workers) = cli.workers {
        cfg.batch.workers = usize::from(workers);
    }
    cfg.batch.dry_run |= cli.dry_run;
    cfg.batch.backup |= cli.backup;
    cfg.batch.verbose |= cli.verbose;
    cfg.validate()?;
    Ok(cfg)
}

async fn run(cli: &Cli, cfg: &AppConfig) -> Result<()> {
    let tally = pipeline::run(cfg, &cli.source_dir).await?;
    if cli.json {
        println!("{}", report::render_json(&tally, cfg.batch.dry_run)?);
    } else {
        println!("\n{}", report::render_summary(&tally, cfg.batch.dry_run));
    }
    Ok(())
}
