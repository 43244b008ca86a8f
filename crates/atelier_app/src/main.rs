use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};

use atelier_chain::{RestLedgerClient, StaticWallet};
use atelier_core::config::AtelierConfig;
use atelier_core::logging;
use atelier_gallery::{RefreshOutcome, Resolver, Session, render_json, render_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "atelier",
    version,
    about = "List the coin and design tokens held by an account, with their on-chain metadata"
)]
struct Args {
    /// Config file. Defaults to ~/.atelier/config.json.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ledger REST endpoint, e.g. http://127.0.0.1:8080
    #[arg(long, value_name = "URL")]
    node: Option<String>,

    /// Account address to resolve.
    #[arg(short, long, value_name = "ADDRESS")]
    address: Option<String>,

    /// Maximum number of view calls in flight.
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Load the config file and layer command-line overrides on top.
    fn load_config(&self) -> Result<AtelierConfig> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => AtelierConfig::config_path()?,
        };
        let mut config = AtelierConfig::load_or_default(&path);

        if let Some(node) = &self.node {
            config.node_url = node.clone();
        }
        if let Some(address) = &self.address {
            config.address = Some(address.clone());
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrent_requests = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.load_config()?;
    info!(node = %config.node_url, "resolving holdings");

    let client = RestLedgerClient::from_config(&config).context("failed to create ledger client")?;
    let wallet = StaticWallet::new(config.address.clone());
    let session = Session::new(Resolver::new(Arc::new(client), Arc::new(wallet), config));

    let gallery = match session.refresh().await.context("resolution failed")? {
        RefreshOutcome::Committed(gallery) => gallery,
        RefreshOutcome::Stale { generation } => {
            anyhow::bail!("resolution {generation} was superseded")
        }
    };

    let rendered = match args.format {
        OutputFormat::Text => render_text(&gallery),
        OutputFormat::Json => render_json(&gallery).context("failed to serialize report")?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _guard = match logging::init_logging(args.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: file logging disabled: {e:#}");
            None
        }
    };

    if let Err(e) = run(args).await {
        error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
