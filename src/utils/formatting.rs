//! Formatting utilities used for CLI and export outputs.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

/// Used when a configured date format cannot be rendered.
const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Pad to `width` terminal columns (emoji count as two).
pub fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(UnicodeWidthStr::width(s));
    format!("{}{}", s, " ".repeat(pad))
}

pub fn pad_left(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(UnicodeWidthStr::width(s));
    format!("{}{}", " ".repeat(pad), s)
}

pub fn mins2readable(mins: i64, want_sign: bool, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;

    let sign = if mins > 0 && want_sign {
        "+"
    } else if mins < 0 && want_sign {
        "-"
    } else {
        ""
    };

    if short {
        // e.g. 07:25
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        // e.g. 07h 25m
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// Sleep length as shown in rows: seconds under a minute, then `HHh MMm`.
pub fn format_duration_millis(ms: i64) -> String {
    let secs = ms.max(0) / 1000;
    if secs < 60 {
        format!("{secs}s")
    } else {
        mins2readable(secs / 60, false, false)
    }
}

/// Whether `fmt` only contains strftime items chrono understands.
pub fn is_valid_date_format(fmt: &str) -> bool {
    !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}

/// Format `time` with `fmt`, falling back to `%Y-%m-%d %H:%M` when `fmt`
/// is not a usable strftime pattern.
pub fn format_time(time: &DateTime<Local>, fmt: &str) -> String {
    let mut out = String::new();
    if is_valid_date_format(fmt) && write!(out, "{}", time.format(fmt)).is_ok() {
        return out;
    }
    time.format(FALLBACK_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_minutes() {
        assert_eq!(mins2readable(445, false, false), "07h 25m");
        assert_eq!(mins2readable(-70, true, true), "-01:10");
    }

    #[test]
    fn short_nights_show_seconds() {
        assert_eq!(format_duration_millis(42_000), "42s");
        assert_eq!(format_duration_millis(8 * 3_600_000), "08h 00m");
    }

    #[test]
    fn bad_date_format_falls_back() {
        let t = chrono::TimeZone::with_ymd_and_hms(&Local, 2024, 3, 9, 23, 5, 0).unwrap();

        assert!(!is_valid_date_format("%Q"));
        assert!(is_valid_date_format("%a %d %b %Y %H:%M"));
        assert_eq!(format_time(&t, "%H:%M"), "23:05");
        assert_eq!(format_time(&t, "%Q"), "2024-03-09 23:05");
    }

    #[test]
    fn padding_counts_wide_glyphs() {
        assert_eq!(pad_right("😴", 4), "😴  ");
        assert_eq!(pad_left("ab", 4), "  ab");
    }
}
