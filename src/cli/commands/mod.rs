//! One handler per sub-command.

pub mod backup;
pub mod clear;
pub mod config;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod rate;
pub mod shell;
pub mod show;
pub mod start;
pub mod stop;

use crate::config::Config;
use crate::db::dao::SqliteSleepDao;
use crate::errors::{AppError, AppResult};
use crate::models::night::SleepNight;
use crate::models::quality::SleepQuality;
use crate::utils::formatting::{format_duration_millis, format_time};
use std::sync::Arc;

/// Open the configured database on the storage worker.
pub(crate) async fn open_dao(cfg: &Config) -> AppResult<Arc<SqliteSleepDao>> {
    let path = cfg.database.clone();
    let dao = tokio::task::spawn_blocking(move || SqliteSleepDao::open(&path)).await??;
    Ok(Arc::new(dao))
}

/// A view-state reported a failed storage call: surface it as the command's error.
pub(crate) fn fail_on_storage_error(notice: Option<String>) -> AppResult<()> {
    match notice {
        Some(msg) => Err(AppError::Storage(msg)),
        None => Ok(()),
    }
}

/// One-line summary used by start/stop/rate.
pub(crate) fn describe_night(night: &SleepNight, cfg: &Config) -> String {
    let start = format_time(&night.start_time(), &cfg.date_format);
    if night.is_in_progress() {
        format!("night #{} (started {start})", night.night_id)
    } else {
        let end = format_time(&night.end_time(), &cfg.date_format);
        format!(
            "night #{} ({start} → {end}, {})",
            night.night_id,
            format_duration_millis(night.duration_millis())
        )
    }
}

pub(crate) fn quality_scale() -> String {
    SleepQuality::ALL
        .iter()
        .map(|q| format!("{}={} {}", q.to_db_value(), q.icon(), q.label()))
        .collect::<Vec<_>>()
        .join("  ")
}
