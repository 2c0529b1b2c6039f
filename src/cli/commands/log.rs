use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let pool = if cfg.database == ":memory:" {
            DbPool::in_memory()?
        } else {
            DbPool::new(&cfg.database)?
        };
        init_db(&pool.conn)?;
        LogLogic::print_log(&pool.conn)?;
    }

    Ok(())
}
