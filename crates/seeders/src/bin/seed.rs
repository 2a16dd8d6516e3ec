//! Mock user seed runner
//!
//! Run with:
//! ```
//! cargo run -p seeders --bin seed -- up
//! cargo run -p seeders --bin seed -- down
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use seeders::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "seed")]
#[command(about = "Seed or remove the mock users listed in a CSV file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Direction,

    /// CSV file with the users to seed (defaults to SEED_USERS_CSV or data/mock-users.csv)
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// Target table (defaults to SEED_USERS_TABLE or Users)
    #[arg(long, global = true)]
    table: Option<String>,

    /// Database connection string (defaults to DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Direction {
    /// Insert the users from the CSV
    Up,
    /// Delete the users whose emails appear in the CSV
    Down,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = SeedConfig::from_env()?;
    if let Some(csv) = cli.csv {
        config.csv_path = csv;
    }
    if let Some(table) = cli.table {
        config.table = table;
    }
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    let pool = config.connect().await?;

    tracing::info!("Connected to database");

    let seeder = Seeder::new(PgUserStore::new(pool), &config.csv_path).with_table(&config.table);

    match cli.command {
        Direction::Up => {
            let inserted = seeder.apply().await?;
            tracing::info!("Seed completed: {} users inserted", inserted);
        }
        Direction::Down => {
            let deleted = seeder.revert().await?;
            tracing::info!("Seed reverted: {} users deleted", deleted);
        }
    }

    Ok(())
}
