//! Commerce fields CLI - inspect the Magento catalog the pickers see.
//!
//! # Usage
//!
//! ```bash
//! # Flattened category tree
//! cf-cli categories
//!
//! # Category and product searches
//! cf-cli search-categories shirts
//! cf-cli search-products "duffle bag"
//!
//! # Products in a category
//! cf-cli products --category MjA=
//!
//! # Check the GraphQL endpoint answers
//! cf-cli ping
//!
//! # Canonical form of a stored field value
//! cf-cli normalize commerce_categories_input '["MjA=","Mw=="]'
//! ```
//!
//! Configuration is read from the same environment variables as the server.
//! Results are printed to stdout as JSON; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cf-cli")]
#[command(author, version, about = "Commerce fields CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every visible category, indented by depth
    Categories,
    /// Search categories by name
    SearchCategories {
        /// Case-insensitive name fragment
        query: Option<String>,
    },
    /// List the products assigned to a category
    Products {
        /// Category UID
        #[arg(short, long)]
        category: String,
    },
    /// Search products by name
    SearchProducts {
        /// Search term
        query: Option<String>,
    },
    /// Check that the Magento GraphQL endpoint answers
    Ping,
    /// Print the canonical form of a stored field value
    Normalize {
        /// Field kind, e.g. `commerce_category_product_input`
        kind: String,
        /// Stored value as JSON
        raw: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Categories => commands::catalog::categories().await?,
        Commands::SearchCategories { query } => {
            commands::catalog::search_categories(query.as_deref()).await?;
        }
        Commands::Products { category } => commands::catalog::products(&category).await?,
        Commands::SearchProducts { query } => {
            commands::catalog::search_products(query.as_deref()).await?;
        }
        Commands::Ping => commands::catalog::ping().await?,
        Commands::Normalize { kind, raw } => commands::fields::normalize(&kind, &raw)?,
    }
    Ok(())
}
