use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use lastfm_summary::config::load_config;
use lastfm_summary::pipeline;
use std::path::PathBuf;

static EXAMPLES: &str = r"EXAMPLES:
    Report using ./config.toml:
    lastfm-summary

    Use another config and write the CSV elsewhere:
    lastfm-summary --config ~/.config/lastfm-summary/config.toml --output-dir /srv/reports

    Report since a different date:
    lastfm-summary --from 2024-06-01";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Send a Last.fm top artists summary to Telegram and save it as .csv",
    long_about = None,
    after_help = EXAMPLES
)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Directory for the CSV file (overrides report.output_dir)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Start date, YYYY-MM-DD (overrides report.from)
    #[arg(long)]
    from: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = load_config(&args.config).await?;
    if let Some(dir) = args.output_dir {
        config.report.output_dir = dir;
    }
    if let Some(from) = args.from {
        config.report.from = from;
    }
    tracing::debug!("Loaded config: {config:?}");

    pipeline::run(&config).await
}
