//! Medalboard CLI - Olympic athlete results backend

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use medalboard::config::{self, MedalboardConfig};
use medalboard::storage::SqliteStore;
use medalboard::ui;
use medalboard::LookupService;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "medalboard")]
#[command(version)]
#[command(about = "Olympic athlete results backend - REST API over athletes, countries and sports")]
#[command(long_about = r#"
Medalboard stores Olympic athletes and their per-games results and serves
them to a browser grid over a small JSON API.

Example usage:
  medalboard init
  medalboard seed --file olympic-winners.json
  medalboard serve --port 8080
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (default: medalboard.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write a default config file and create the database
    Init {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Load the Olympic winners dataset
    Seed {
        /// JSON file with one row per athlete per games
        #[arg(short, long)]
        file: PathBuf,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// List stored athletes with their medal totals
    Athletes {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show row counts per table
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    if let Err(e) = run(cli) {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let config = config::load_config(Some(&config_path))?.unwrap_or_default();

    match cli.command {
        Commands::Serve { database, port } => {
            let db_path = config.database_path(database);
            config::ensure_db_dir(&db_path)?;
            let store = SqliteStore::open(&db_path)?;
            let addr = config.bind_addr(port)?;
            let origins = config.allowed_origins();

            ui::serve_banner(&db_path, addr, &origins);

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(medalboard::server::start_server(addr, store, &origins))?;
        }

        Commands::Init { database, force } => {
            let db_path = config.database_path(database);
            let new_config = MedalboardConfig {
                database: Some(db_path.display().to_string()),
                ..config.clone()
            };

            config::write_config(&config_path, &new_config, force)?;
            config::ensure_db_dir(&db_path)?;
            SqliteStore::open(&db_path)?;

            ui::init_summary(&config_path, &db_path);
        }

        Commands::Seed { file, database } => {
            let db_path = config.database_path(database);
            config::ensure_db_dir(&db_path)?;
            let mut store = SqliteStore::open(&db_path)?;

            ui::seed_started(&file);
            let report = medalboard::seed::load_file(&mut store, &file)?;
            ui::seed_summary(&report);
        }

        Commands::Athletes { database, json } => {
            let db_path = config.database_path(database);
            let store = open_existing(&db_path)?;
            let athletes = LookupService::new(store.reader()).athletes()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&athletes)?);
            } else if athletes.is_empty() {
                ui::warn("No athletes stored. Run `medalboard seed --file <path>` first.");
            } else {
                ui::roster_header(&athletes);
                println!("{}", ui::athletes_table(&athletes));
            }
        }

        Commands::Stats { database } => {
            let db_path = config.database_path(database);
            let store = open_existing(&db_path)?;
            let stats = store.stats()?;

            ui::stats_summary(&db_path, &stats);
        }
    }

    Ok(())
}

/// Read-only commands should not create an empty database by accident
fn open_existing(path: &std::path::Path) -> anyhow::Result<SqliteStore> {
    if !path.exists() {
        anyhow::bail!("database not found at {} (run `medalboard init` first)", path.display());
    }
    Ok(SqliteStore::open(path)?)
}
