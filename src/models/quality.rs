use crate::errors::{AppError, AppResult};
use serde::Serialize;

/// Stored value of a night that has not been rated yet.
pub const UNRATED: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SleepQuality {
    VeryBad,    // 0
    Poor,       // 1
    SoSo,       // 2
    Ok,         // 3
    PrettyGood, // 4
    Excellent,  // 5
}

impl SleepQuality {
    pub const ALL: [SleepQuality; 6] = [
        SleepQuality::VeryBad,
        SleepQuality::Poor,
        SleepQuality::SoSo,
        SleepQuality::Ok,
        SleepQuality::PrettyGood,
        SleepQuality::Excellent,
    ];

    /// Convert DB integer → enum. `-1` (unrated) maps to `None`.
    pub fn from_db_value(v: i32) -> AppResult<Option<Self>> {
        match v {
            UNRATED => Ok(None),
            0 => Ok(Some(SleepQuality::VeryBad)),
            1 => Ok(Some(SleepQuality::Poor)),
            2 => Ok(Some(SleepQuality::SoSo)),
            3 => Ok(Some(SleepQuality::Ok)),
            4 => Ok(Some(SleepQuality::PrettyGood)),
            5 => Ok(Some(SleepQuality::Excellent)),
            other => Err(AppError::InvalidQuality(other)),
        }
    }

    /// Convert enum → DB integer
    pub fn to_db_value(self) -> i32 {
        match self {
            SleepQuality::VeryBad => 0,
            SleepQuality::Poor => 1,
            SleepQuality::SoSo => 2,
            SleepQuality::Ok => 3,
            SleepQuality::PrettyGood => 4,
            SleepQuality::Excellent => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SleepQuality::VeryBad => "Very bad",
            SleepQuality::Poor => "Poor",
            SleepQuality::SoSo => "So-so",
            SleepQuality::Ok => "OK",
            SleepQuality::PrettyGood => "Pretty good",
            SleepQuality::Excellent => "Excellent",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SleepQuality::VeryBad => "😫",
            SleepQuality::Poor => "😞",
            SleepQuality::SoSo => "😐",
            SleepQuality::Ok => "🙂",
            SleepQuality::PrettyGood => "😊",
            SleepQuality::Excellent => "😴",
        }
    }
}
