use super::quality::{SleepQuality, UNRATED};
use crate::errors::AppResult;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SleepNight {
    pub night_id: i64,         // ⇔ nightId (INTEGER PK AUTOINCREMENT, 0 = not inserted yet)
    pub start_time_milli: i64, // ⇔ start_time_milli (epoch ms)
    pub end_time_milli: i64,   // ⇔ end_time_milli (epoch ms, == start while in progress)
    pub sleep_quality: i32,    // ⇔ quality_rating (-1 = unrated)
}

impl SleepNight {
    /// A fresh night starting now: start = end, unrated, not yet persisted.
    pub fn new() -> Self {
        Self::started_at(now_millis())
    }

    pub fn started_at(start_time_milli: i64) -> Self {
        Self {
            night_id: 0,
            start_time_milli,
            end_time_milli: start_time_milli,
            sleep_quality: UNRATED,
        }
    }

    /// In progress iff start == end.
    ///
    /// A deliberately zero-length night would be reported as in progress too;
    /// there is no explicit status column to tell them apart.
    pub fn is_in_progress(&self) -> bool {
        self.start_time_milli == self.end_time_milli
    }

    pub fn quality(&self) -> AppResult<Option<SleepQuality>> {
        SleepQuality::from_db_value(self.sleep_quality)
    }

    pub fn start_time(&self) -> DateTime<Local> {
        millis_to_local(self.start_time_milli)
    }

    pub fn end_time(&self) -> DateTime<Local> {
        millis_to_local(self.end_time_milli)
    }

    pub fn duration_millis(&self) -> i64 {
        (self.end_time_milli - self.start_time_milli).max(0)
    }
}

impl Default for SleepNight {
    fn default() -> Self {
        Self::new()
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn millis_to_local(ms: i64) -> DateTime<Local> {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH.with_timezone(&Local))
}
