//! Strata CLI - reversible schema migrations for SQLite

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod loader;
mod output;

use loader::SqlDirSource;
use output::OutputFormat;
use strata_core::Registry;
use strata_engine::Migrator;

#[derive(Parser)]
#[command(name = "strata")]
#[command(author, version, about = "Reversible schema migrations for SQLite")]
pub struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Directory of NAME.up.sql / NAME.down.sql pairs
    #[arg(short, long, global = true)]
    pub migrations: Option<PathBuf>,

    /// Output format: table, json
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show applied and pending migrations
    Status,
    /// Apply every pending migration
    Up,
    /// Undo every applied migration
    Reset,
    /// Migrate forward or backward to the named migration
    To {
        /// A migration name (the file stem of its .up.sql/.down.sql
        /// pair), or the keywords `latest` / `nothing`
        target: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    let config = config::Config::resolve(&cli)?;
    tracing::debug!(
        database = %config.database.display(),
        migrations = %config.migrations.display(),
        "resolved configuration"
    );

    let mut conn = strata_engine::open_database(&config.database)?;
    let registry = Registry::new(SqlDirSource::new(&config.migrations));
    let mut migrator = Migrator::new(&mut conn, registry)?;

    match &cli.command {
        Commands::Status => {
            commands::status::run(&mut migrator, OutputFormat::from(cli.format.as_str()))?
        }
        Commands::Up => commands::migrate::up(&mut migrator)?,
        Commands::Reset => commands::migrate::reset(&mut migrator)?,
        Commands::To { target } => commands::migrate::to(&mut migrator, target)?,
    }

    Ok(())
}
