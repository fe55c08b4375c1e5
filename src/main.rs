//! Snipstore CLI - run and administer the snippet persistence service

use clap::{Parser, Subcommand};
use snipstore::config::{self, Settings};
use snipstore::storage::SnippetStore;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "snipstore")]
#[command(version = "0.1.0")]
#[command(about = "Snippet persistence service - namespace-aware CRUD API over SQLite")]
#[command(long_about = r#"
Snipstore stores code snippets grouped into namespaces and serves them
over a JSON HTTP API.

Example usage:
  snipstore serve --port 5000 --database snippets.db
  snipstore stats --database snippets.db
  snipstore wipe --database snippets.db
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a snipstore.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Comma-separated CORS origin allow-list, or '*' for any origin
        #[arg(long)]
        cors_origins: Option<String>,
    },

    /// Initialize (or migrate) the database schema and exit
    Init {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Show row counts for the database
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Drop all data and reseed the default namespace
    Wipe {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let file_config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve {
            port,
            database,
            cors_origins,
        } => {
            let settings = Settings::resolve(database, port, cors_origins, file_config);
            config::ensure_db_dir(&settings.database)?;
            snipstore::server::start_server(settings).await?;
        }

        Commands::Init { database } => {
            let settings = Settings::resolve(database, None, None, file_config);
            config::ensure_db_dir(&settings.database)?;
            SnippetStore::open(&settings.database)?;
            println!("Initialized database at {:?}", settings.database);
        }

        Commands::Stats { database } => {
            let settings = Settings::resolve(database, None, None, file_config);
            let store = SnippetStore::open(&settings.database)?;
            let stats = store.stats()?;
            println!("Snipstore ({:?})", settings.database);
            println!("{}", stats);
        }

        Commands::Wipe { database } => {
            let settings = Settings::resolve(database, None, None, file_config);
            let mut store = SnippetStore::open(&settings.database)?;
            store.wipe()?;
            println!("Database wiped and reseeded at {:?}", settings.database);
        }
    }

    Ok(())
}
