//! Slack export CLI - main entry point
//!
//! Usage:
//!   slack_export --token xoxp-... --output-dir ./export

use std::path::PathBuf;

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use slack_export::{SlackClient, SlackExporter};

#[derive(Parser)]
#[command(name = "slack_export")]
#[command(about = "Export Slack channel history, channel roster and users to JSON")]
#[command(version)]
struct Args {
    /// Slack API token
    #[arg(short, long, env = "SLACK_TOKEN")]
    token: String,

    /// Output directory for JSON files, created if absent
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Set this if you don't want progress printed to your terminal
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let client = SlackClient::new(args.token)?;
    let mut exporter = SlackExporter::new(client);
    exporter.export_all(&args.output_dir).await?;

    Ok(())
}
