use crate::cli::commands::open_dao;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::ExportLogic;
use crate::db::dao::SleepDatabaseDao;
use crate::errors::AppResult;
use crate::ui::messages::success;
use std::path::Path;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        force,
    } = cmd
    {
        let dao = open_dao(cfg).await?;
        let nights = dao.get_all_nights().borrow().clone();
        let path = Path::new(file);

        let count = ExportLogic::export(&nights, *format, path, *force)?;
        success(format!(
            "{} export completed: {} nights → {}",
            format.as_str().to_uppercase(),
            count,
            path.display()
        ));
    }

    Ok(())
}
