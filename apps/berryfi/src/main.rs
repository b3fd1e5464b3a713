//! # Berryfi - Fibery Workspace Client
//!
//! The command-line binary for Berryfi.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                apps/berryfi (THE CLIENT)              │
//! │                                                       │
//! │  ┌─────────────┐   ┌──────────────┐   ┌────────────┐  │
//! │  │    CLI      │──▶│   Berryfi    │──▶│    HTTP    │──┼──▶ Fibery
//! │  │   (clap)    │   │   (client)   │   │ (reqwest)  │  │
//! │  └─────────────┘   └──────┬───────┘   └────────────┘  │
//! │                           ▼                           │
//! │                   ┌───────────────┐                   │
//! │                   │ berryfi-core  │                   │
//! │                   │  (THE LOGIC)  │                   │
//! │                   └───────────────┘                   │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! export BERRYFI_WORKSPACE=acme BERRYFI_TOKEN=...
//!
//! berryfi apps
//! berryfi fields "Sales/Deal"
//! berryfi create deal -s name="Big one" -s amount=1200
//! berryfi get deal 750bb3e0-a851-11ea-9163-48203d178ac1
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays parseable. BERRYFI_LOG_FORMAT=json for JSON lines.
    let log_format = std::env::var("BERRYFI_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "berryfi=info,berryfi_core=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Berryfi banner to stderr.
fn print_banner() {
    eprintln!("Berryfi v{} - Fibery workspace client", env!("CARGO_PKG_VERSION"));
}
