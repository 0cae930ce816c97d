//! Lumina Luxe CLI - Catalog management tools.
//!
//! # Usage
//!
//! ```bash
//! # Print the persisted catalog
//! lumina-cli catalog show
//!
//! # Write the default catalog if nothing valid is stored
//! lumina-cli catalog seed
//!
//! # Overwrite the catalog with the default set
//! lumina-cli catalog reset
//!
//! # Replace the catalog with a JSON product list
//! lumina-cli catalog import products.json
//! ```
//!
//! The catalog directory comes from `--data-dir`, then `STOREFRONT_DATA_DIR`,
//! then `data`, matching the storefront.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lumina-cli")]
#[command(author, version, about = "Lumina Luxe CLI tools")]
struct Cli {
    /// Directory holding the persisted catalog
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Print the persisted catalog as JSON
    Show,
    /// Write the default catalog if nothing valid is stored
    Seed,
    /// Overwrite the catalog with the default set
    Reset,
    /// Replace the catalog with products from a JSON file
    Import {
        /// Path to a JSON array of products
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
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
    let dir = commands::catalog::data_dir(cli.data_dir);

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Show => {
                commands::catalog::show(&dir, &mut std::io::stdout().lock()).await?;
            }
            CatalogAction::Seed => commands::catalog::seed(&dir).await?,
            CatalogAction::Reset => commands::catalog::reset(&dir).await?,
            CatalogAction::Import { file } => {
                let count = commands::catalog::import(&dir, &file).await?;
                tracing::info!(count, "Catalog imported");
            }
        },
    }
    Ok(())
}
