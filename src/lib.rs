//! rSleepTracker library root.
//! Exposes the CLI parser, the high-level run() function, and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod logging;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Start => commands::start::handle(cfg).await,
        Commands::Stop => commands::stop::handle(cfg).await,
        Commands::Rate { id, quality } => commands::rate::handle(*id, *quality, cfg).await,
        Commands::Clear => commands::clear::handle(cfg).await,
        Commands::List => commands::list::handle(cfg).await,
        Commands::Show { id } => commands::show::handle(*id, cfg).await,
        Commands::Shell => commands::shell::handle(cfg).await,
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg).await,
    }
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    logging::init(&cfg.log_level);
    tracing::debug!(database = %cfg.database, "configuration loaded");

    dispatch(&cli, &cfg).await
}
