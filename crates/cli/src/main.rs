use anyhow::Result;
use clap::{Parser, Subcommand};
use spellfix_storage::Storage;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "spellfix")]
#[command(about = "Full-text search with spelling correction over a SQLite page index", long_about = None)]
struct Cli {
    /// Index database; defaults to the user's local data directory
    #[arg(long, global = true, env = "SPELLFIX_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add or replace a page
    Add {
        #[arg(long)]
        source: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,
        /// Read the page content from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Build or refresh the spelling index
    Index,
    /// Remove the spelling index
    DropIndex,
    /// Print the corrected form of a query
    Fix { query: String },
    /// List candidate corrections for one word
    Suggest {
        word: String,
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
    /// Search pages from the given sources
    Search {
        query: String,
        #[arg(short, long = "source", required = true)]
        sources: Vec<String>,
        #[arg(short, long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10")]
        page_size: u32,
    },
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spellfix")
        .join("index.db")
}

fn open_storage(db_path: &Path) -> Result<Storage> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Storage::new(db_path)?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(default_db_path);
    let storage = open_storage(&db_path)?;

    match cli.command {
        Commands::Add { source, url, title, description, content, file } => {
            commands::pages::run_add(&storage, source, url, title, description, content, file)?;
        },
        Commands::Index => commands::index::run_index(&storage)?,
        Commands::DropIndex => commands::index::run_drop_index(&storage)?,
        Commands::Fix { query } => commands::index::run_fix(&storage, &query)?,
        Commands::Suggest { word, limit } => commands::index::run_suggest(&storage, &word, limit)?,
        Commands::Search { query, sources, page, page_size } => {
            commands::pages::run_search(&storage, &sources, &query, page, page_size)?;
        },
    }

    Ok(())
}
