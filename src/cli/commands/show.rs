use crate::cli::commands::open_dao;
use crate::config::Config;
use crate::core::detail::{SleepDetailViewModel, SleepDetailViewModelFactory};
use crate::core::factory::ViewModelFactory;
use crate::db::dao::SleepDatabaseDao;
use crate::errors::{AppError, AppResult};
use crate::models::night::SleepNight;
use crate::ui::rows::quality_label;
use crate::utils::formatting::{format_duration_millis, format_time};
use crate::utils::table::{Column, Table};

pub async fn handle(id: i64, cfg: &Config) -> AppResult<()> {
    let dao = open_dao(cfg).await?;
    let night = dao.get(id).await?.ok_or(AppError::NightNotFound(id))?;

    let vm = SleepDetailViewModelFactory::new(night).create();
    print_detail(&vm, cfg);
    vm.on_close();
    Ok(())
}

/// Draw the night held by a detail view-state; nothing once it was closed.
pub(crate) fn print_detail(vm: &SleepDetailViewModel, cfg: &Config) {
    if let Some(night) = vm.night().get() {
        println!("{}", detail_table(&night, cfg).render());
    }
}

fn detail_table(night: &SleepNight, cfg: &Config) -> Table {
    let mut table = Table::new(vec![Column::new("Night", 10), Column::new("", 32)]);

    table.add_row(vec!["Id".into(), format!("#{}", night.night_id)]);
    table.add_row(vec![
        "Start".into(),
        format_time(&night.start_time(), &cfg.date_format),
    ]);
    if night.is_in_progress() {
        table.add_row(vec!["End".into(), "in progress".into()]);
    } else {
        table.add_row(vec![
            "End".into(),
            format_time(&night.end_time(), &cfg.date_format),
        ]);
        table.add_row(vec![
            "Length".into(),
            format_duration_millis(night.duration_millis()),
        ]);
    }
    table.add_row(vec!["Quality".into(), quality_label(night.sleep_quality)]);
    table
}
