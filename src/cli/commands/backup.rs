use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        match BackupLogic::backup(&cfg.database, Path::new(file), *compress, *force)? {
            Some(path) => success(format!("Backup created: {}", path.display())),
            None => warning("Backup cancelled by user."),
        }
    }

    Ok(())
}
