use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command
///
/// Creates the config directory and file (skipped with `--test`), the
/// SQLite database and its schema.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.as_deref(), cli.test)?;
    let db = db_path.to_string_lossy().to_string();

    info("Initializing rSleepTracker…");
    if !cli.test {
        info(format!("Config file : {}", Config::config_file().display()));
    }
    info(format!("Database    : {db}"));

    let pool = DbPool::new(&db)?;
    init_db(&pool.conn)?;

    if let Err(e) = ttlog(&pool.conn, "init", &db, "Database initialized") {
        warning(format!("Failed to write internal log: {e}"));
    }

    success(format!("Database initialized at {db}"));
    Ok(())
}
