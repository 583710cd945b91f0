//! Bulk Duplicator CLI - Duplicate a Shopify product through the duplicator server.
//!
//! # Usage
//!
//! ```bash
//! # Show the product that would be copied
//! dup-cli show 8123456789
//!
//! # Run a duplication plan
//! dup-cli duplicate plans/summer.yaml
//!
//! # Override the plan's quantity
//! dup-cli duplicate plans/summer.yaml --quantity 3
//!
//! # Upload images and print their URLs
//! dup-cli stage photos/red.jpg photos/blue.jpg
//! ```
//!
//! # Environment Variables
//!
//! - `DUPLICATOR_SERVER_URL` - Base URL of the duplicator server
//! - `DUPLICATOR_API_KEY` - Bearer key for the server's `/api` routes

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use bulk_duplicator_cli::DuplicatorClient;
use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "dup-cli")]
#[command(author, version, about = "Bulk product duplicator")]
struct Cli {
    /// Duplicator server base URL
    #[arg(long, env = "DUPLICATOR_SERVER_URL", default_value = "http://127.0.0.1:3002")]
    server: String,

    /// API key for the duplicator server
    #[arg(long, env = "DUPLICATOR_API_KEY", hide_env_values = true)]
    api_key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a product by numeric id or GID
    Show {
        /// Product id or `gid://shopify/Product/...`
        product: String,
    },
    /// Duplicate a product from a YAML plan
    Duplicate {
        /// Path to the plan file
        plan: PathBuf,

        /// Number of duplicates, overriding the plan
        #[arg(short, long)]
        quantity: Option<String>,
    },
    /// Upload local images to staged targets
    Stage {
        /// Image files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = DuplicatorClient::new(&cli.server, SecretString::from(cli.api_key))?;

    match cli.command {
        Commands::Show { product } => commands::show::run(&client, &product).await?,
        Commands::Duplicate { plan, quantity } => {
            commands::duplicate::run(&client, &plan, quantity.as_deref()).await?;
        }
        Commands::Stage { files } => commands::stage::run(&client, &files).await?,
    }
    Ok(())
}
