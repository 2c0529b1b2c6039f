use crate::db::log::load_log;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use rusqlite::Connection;

const OP_WIDTH_MAX: usize = 60;

fn strip_ansi(s: &str) -> String {
    match Regex::new(r"\x1B\[[0-9;]*[mK]") {
        Ok(re) => re.replace_all(s, "").into_owned(),
        Err(_) => s.to_string(),
    }
}

fn color_for_operation(op: &str) -> Colour {
    match op {
        "insert" => Colour::Green,
        "update" => Colour::Yellow,
        "clear" => Colour::Red,
        "backup" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Lines of the internal log, oldest first, ready to print.
    pub fn render(conn: &Connection) -> AppResult<Vec<String>> {
        let entries: Vec<(i64, String, String, String, String)> = load_log(conn)?
            .into_iter()
            .map(|(id, raw_date, op, target, message)| {
                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(raw_date);
                (id, date, op, target, message)
            })
            .collect();

        let id_w = entries
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|(_, d, ..)| d.len()).max().unwrap_or(0);
        let op_w = entries
            .iter()
            .map(|(_, _, op, target, _)| op_target(op, target).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_MAX);

        let mut lines = Vec::with_capacity(entries.len());
        for (id, date, op, target, message) in entries {
            let mut visible = op_target(&op, &target);
            if visible.chars().count() > OP_WIDTH_MAX {
                visible = visible.chars().take(OP_WIDTH_MAX - 3).collect();
                visible.push_str("...");
            }

            // only the operation word is colored
            let color = color_for_operation(&op);
            let colored = match visible.split_once(' ') {
                Some((word, rest)) => format!("{} {}", color.paint(word), rest),
                None => color.paint(visible.as_str()).to_string(),
            };
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

            lines.push(format!(
                "{id:>id_w$}: {date:<date_w$} | {colored}{padding} => {message}"
            ));
        }
        Ok(lines)
    }

    pub fn print_log(conn: &Connection) -> AppResult<()> {
        let lines = Self::render(conn)?;
        println!("📜 Internal log:\n");
        for line in lines {
            println!("{line}");
        }
        Ok(())
    }
}

fn op_target(op: &str, target: &str) -> String {
    if target.is_empty() {
        op.to_string()
    } else {
        format!("{op} ({target})")
    }
}
