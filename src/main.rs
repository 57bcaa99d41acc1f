//! Command-line interface for eventhub-sender
//!
//! ```bash
//! eventhub-sender --df-path listings.csv \
//!   --connection-string "$EVENTHUB_CONNECTION_STRING" \
//!   --eventhub-name listings
//! ```
//!
//! Set `RUST_LOG=debug` to see every event as it is queued.

use clap::Parser;
use eventhub_sender::SenderOpts;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eventhub-sender")]
#[command(about = "Stream reshaped CSV rows as paced batches into Azure Event Hubs")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    opts: SenderOpts,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    eventhub_sender::run(cli.opts).await?;

    Ok(())
}
