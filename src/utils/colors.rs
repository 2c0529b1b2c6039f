/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";

/// Quality color:
/// unrated → grey
/// 0..=1 → red
/// 2..=3 → yellow
/// 4..=5 → green
pub fn color_for_quality(value: i32) -> &'static str {
    match value {
        0..=1 => RED,
        2..=3 => YELLOW,
        4..=5 => GREEN,
        _ => GREY,
    }
}

/// Wraps `value` in grey when it is a placeholder ("--:--", "" or "in progress").
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--:--" || v == "in progress" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
