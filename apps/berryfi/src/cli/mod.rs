//! # Berryfi CLI Module
//!
//! This module implements the CLI interface for Berryfi.
//!
//! ## Available Commands
//!
//! - `info` - Show workspace identity and schema counts
//! - `apps` - List apps
//! - `types` - List user types, optionally of one app
//! - `fields` - List the fields of a type
//! - `get` - Read one entity
//! - `create` - Create an entity
//! - `update` - Update an entity

mod commands;

use berryfi::{Berryfi, BerryfiConfig, PartialConfig};
use berryfi_core::BerryfiError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Berryfi - Fibery workspace client
///
/// Reads the workspace schema and creates, reads and updates entities
/// using short field names.
#[derive(Parser, Debug)]
#[command(name = "berryfi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Workspace subdomain (overrides BERRYFI_WORKSPACE)
    #[arg(short, long, global = true)]
    pub workspace: Option<String>,

    /// API token (overrides BERRYFI_TOKEN)
    #[arg(short, long, global = true)]
    pub token: Option<String>,

    /// API root URL (overrides BERRYFI_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Request timeout in seconds (overrides BERRYFI_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show workspace identity and schema counts
    Info,

    /// List apps and their types
    Apps,

    /// List user types
    Types {
        /// Only list types of this app
        #[arg(short, long)]
        app: Option<String>,
    },

    /// List the fields of a type
    Fields {
        /// Type id or name, e.g. "Sales/Deal" or "deal"
        type_name: String,
    },

    /// Read one entity
    Get {
        /// Type id or name
        type_name: String,

        /// Entity id
        id: String,
    },

    /// Create an entity
    Create {
        /// Type id or name
        type_name: String,

        /// Field assignment, `field=value`; values are parsed as JSON when possible
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },

    /// Update an entity
    Update {
        /// Type id or name
        type_name: String,

        /// Entity id
        id: String,

        /// Field assignment, `field=value`; values are parsed as JSON when possible
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), BerryfiError> {
    let flags = PartialConfig {
        workspace: cli.workspace,
        token: cli.token,
        base_url: cli.url,
        timeout_secs: cli.timeout,
    };
    let config = BerryfiConfig::load(flags, cli.config.as_deref())?;

    let mut client = Berryfi::new(&config)?;
    client.load().await?;

    let json = cli.json;
    match cli.command {
        Some(Commands::Info) | None => cmd_info(&client, &config, json),
        Some(Commands::Apps) => cmd_apps(&client, json),
        Some(Commands::Types { app }) => cmd_types(&client, app.as_deref(), json),
        Some(Commands::Fields { type_name }) => cmd_fields(&client, &type_name, json),
        Some(Commands::Get { type_name, id }) => cmd_get(&mut client, &type_name, &id).await,
        Some(Commands::Create { type_name, set }) => {
            cmd_create(&mut client, &type_name, &set, json).await
        }
        Some(Commands::Update { type_name, id, set }) => {
            cmd_update(&mut client, &type_name, &id, &set).await
        }
    }
}
