//! Row shapes drawn by the night list: a header line and a night line.

use crate::errors::AppError;
use crate::models::night::SleepNight;
use crate::models::quality::SleepQuality;
use crate::utils::colors::{RESET, color_for_quality, colorize_optional};
use crate::utils::formatting::{bold, format_duration_millis, format_time, pad_left, pad_right};

pub const DEFAULT_HEADER_TITLE: &str = "Sleep Results";
pub const DEFAULT_DATE_FORMAT: &str = "%a %d %b %Y %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    Header = 0,
    Item = 1,
}

impl TryFrom<i32> for ViewType {
    type Error = AppError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(ViewType::Header),
            1 => Ok(ViewType::Item),
            other => Err(AppError::UnknownViewType(other)),
        }
    }
}

/// Presentation settings shared by all rows of one list.
#[derive(Debug, Clone)]
pub struct RowStyle {
    pub header_title: String,
    pub date_format: String,
}

impl Default for RowStyle {
    fn default() -> Self {
        Self {
            header_title: DEFAULT_HEADER_TITLE.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

pub struct TextViewHolder {
    title: String,
}

impl TextViewHolder {
    pub fn render(&self) -> String {
        bold(&format!("=== {} ===", self.title))
    }
}

pub struct NightViewHolder {
    date_format: String,
    night: Option<SleepNight>,
}

impl NightViewHolder {
    pub fn bind(&mut self, night: &SleepNight) {
        self.night = Some(night.clone());
    }

    pub fn render(&self) -> String {
        let Some(night) = &self.night else {
            return String::new();
        };

        let color = color_for_quality(night.sleep_quality);
        let quality = match night.quality() {
            Ok(Some(q)) => format!("{} {}", q.icon(), q.label()),
            Ok(None) => "-- Not rated".to_string(),
            Err(_) => format!("?? {}", night.sleep_quality),
        };

        let start = format_time(&night.start_time(), &self.date_format);
        let (end, length) = if night.is_in_progress() {
            ("in progress".to_string(), "--:--".to_string())
        } else {
            (
                format_time(&night.end_time(), &self.date_format),
                format_duration_millis(night.duration_millis()),
            )
        };

        format!(
            "{} {}{}{}  {} → {}  {}",
            pad_left(&format!("#{}", night.night_id), 5),
            color,
            pad_right(&quality, 15),
            RESET,
            start,
            colorize_optional(&end),
            colorize_optional(&length),
        )
    }
}

pub enum ViewHolder {
    Header(TextViewHolder),
    Night(NightViewHolder),
}

impl ViewHolder {
    pub fn create(view_type: ViewType, style: &RowStyle) -> Self {
        match view_type {
            ViewType::Header => ViewHolder::Header(TextViewHolder {
                title: style.header_title.clone(),
            }),
            ViewType::Item => ViewHolder::Night(NightViewHolder {
                date_format: style.date_format.clone(),
                night: None,
            }),
        }
    }

    pub fn view_type(&self) -> ViewType {
        match self {
            ViewHolder::Header(_) => ViewType::Header,
            ViewHolder::Night(_) => ViewType::Item,
        }
    }

    pub fn render(&self) -> String {
        match self {
            ViewHolder::Header(h) => h.render(),
            ViewHolder::Night(n) => n.render(),
        }
    }
}

/// Label used by `show` and `rate` output.
pub fn quality_label(value: i32) -> String {
    match SleepQuality::from_db_value(value) {
        Ok(Some(q)) => format!("{} {}", q.icon(), q.label()),
        Ok(None) => "Not rated".to_string(),
        Err(_) => format!("Unknown ({value})"),
    }
}
