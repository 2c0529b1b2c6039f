//! Export of all recorded nights to CSV or JSON.

use crate::errors::{AppError, AppResult};
use crate::models::night::SleepNight;
use crate::ui::messages::{confirm, info, warning};
use crate::ui::rows::quality_label;
use clap::ValueEnum;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Flat row written to the export file.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NightExport {
    pub id: i64,
    pub start: String,
    pub end: Option<String>,
    pub duration_minutes: Option<i64>,
    pub quality: i32,
    pub quality_label: String,
}

impl From<&SleepNight> for NightExport {
    fn from(night: &SleepNight) -> Self {
        let finished = !night.is_in_progress();
        Self {
            id: night.night_id,
            start: night.start_time().to_rfc3339(),
            end: finished.then(|| night.end_time().to_rfc3339()),
            duration_minutes: finished.then(|| night.duration_millis() / 60_000),
            quality: night.sleep_quality,
            quality_label: quality_label(night.sleep_quality),
        }
    }
}

pub struct ExportLogic;

impl ExportLogic {
    /// Write `nights` to `path`. Returns the number of exported nights.
    pub fn export(
        nights: &[SleepNight],
        format: ExportFormat,
        path: &Path,
        force: bool,
    ) -> AppResult<usize> {
        ensure_writable(path, force)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let rows: Vec<NightExport> = nights.iter().map(NightExport::from).collect();
        match format {
            ExportFormat::Csv => write_csv(path, &rows)?,
            ExportFormat::Json => write_json(path, &rows)?,
        }

        tracing::info!(format = format.as_str(), count = rows.len(), path = %path.display(), "export written");
        Ok(rows.len())
    }
}

fn write_csv(path: &Path, rows: &[NightExport]) -> AppResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "id",
        "start",
        "end",
        "duration_minutes",
        "quality",
        "quality_label",
    ])?;
    for r in rows {
        wtr.write_record([
            r.id.to_string(),
            r.start.clone(),
            r.end.clone().unwrap_or_default(),
            r.duration_minutes.map(|d| d.to_string()).unwrap_or_default(),
            r.quality.to_string(),
            r.quality_label.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_json(path: &Path, rows: &[NightExport]) -> AppResult<()> {
    let json = serde_json::to_string_pretty(rows)?;
    fs::write(path, json)?;
    Ok(())
}

/// Existing files are only replaced with `force` or after the user agrees.
fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));
    if confirm("Overwrite?")? {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(
            "export cancelled: existing file not overwritten".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nights() -> Vec<SleepNight> {
        let mut done = SleepNight::started_at(1_700_000_000_000);
        done.night_id = 2;
        done.end_time_milli += 8 * 3_600_000;
        done.sleep_quality = 4;

        let mut open = SleepNight::started_at(1_700_100_000_000);
        open.night_id = 3;
        vec![open, done]
    }

    #[test]
    fn in_progress_nights_have_no_end() {
        let rows: Vec<NightExport> = nights().iter().map(NightExport::from).collect();
        assert_eq!(rows[0].end, None);
        assert_eq!(rows[0].duration_minutes, None);
        assert_eq!(rows[1].duration_minutes, Some(480));
        assert!(rows[1].quality_label.contains("Pretty good"));
    }

    #[test]
    fn csv_and_json_files_are_written() {
        let dir = std::env::temp_dir().join(format!("rst-export-{}", std::process::id()));
        let csv_path = dir.join("nights.csv");
        let json_path = dir.join("nights.json");

        assert_eq!(ExportLogic::export(&nights(), ExportFormat::Csv, &csv_path, true).unwrap(), 2);
        ExportLogic::export(&nights(), ExportFormat::Json, &json_path, true).unwrap();

        let csv = fs::read_to_string(&csv_path).unwrap();
        assert!(csv.starts_with("id,start,end,duration_minutes,quality,quality_label"));
        assert_eq!(csv.lines().count(), 3);

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[1]["quality"], 4);

        let _ = fs::remove_dir_all(&dir);
    }
}
