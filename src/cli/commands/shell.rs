//! Interactive session around one tracker view-state.
//!
//! The night list is kept on screen by an adapter; after every command only
//! the rows that changed are printed.

use crate::cli::commands::show::print_detail;
use crate::cli::commands::{describe_night, open_dao, quality_scale};
use crate::config::Config;
use crate::core::detail::SleepDetailViewModelFactory;
use crate::core::factory::ViewModelFactory;
use crate::core::quality::SleepQualityViewModelFactory;
use crate::core::tracker::SleepTrackerViewModel;
use crate::db::dao::SleepDatabaseDao;
use crate::errors::AppResult;
use crate::models::night::SleepNight;
use crate::ui::adapter::SleepNightAdapter;
use crate::ui::diff::{ListUpdate, UpdateLog};
use crate::ui::messages::{error, info, snackbar, success, warning};
use crate::utils::colors::{GREY, RESET};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

const HELP: &str = "\
Commands:
  start         start tracking a night
  stop          stop the night in progress
  rate <0-5>    rate the night that was just stopped
  clear         delete every night
  list          print the whole list again
  show <row>    details of the night on list row <row> (the header is row 0)
  help          this text
  quit          leave the session";

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let dao: Arc<dyn SleepDatabaseDao> = open_dao(cfg).await?;
    let tracker = SleepTrackerViewModel::new(Arc::clone(&dao));

    let (click_tx, mut click_rx) = mpsc::unbounded_channel::<SleepNight>();
    let mut adapter = SleepNightAdapter::new(cfg.row_style(), move |night: &SleepNight| {
        let _ = click_tx.send(night.clone());
    });

    let mut nights_rx = tracker.nights().subscribe();
    tracker.wait_idle().await;
    refresh(&mut nights_rx, &mut adapter, false).await;
    print_all(&adapter);
    print_controls(&tracker, cfg);

    let mut last_stopped: Option<i64> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("sleep> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let mut words = line.split_whitespace();

        match (words.next(), words.next()) {
            (None, _) => continue,
            (Some("quit" | "exit"), _) => break,
            (Some("help"), _) => println!("{HELP}"),
            (Some("list"), _) => print_all(&adapter),
            (Some("start"), _) => {
                if tracker.start_button_enabled().get() {
                    tracker.on_start_tracking();
                } else {
                    warning("Already tracking. Use `stop` first.");
                }
            }
            (Some("stop"), _) => {
                tracker.on_stop_tracking();
                tracker.wait_idle().await;
                match tracker.take_navigation() {
                    Some(night) => {
                        success(format!("Stopped {}", describe_night(&night, cfg)));
                        info(format!("rate <0-5>   {}", quality_scale()));
                        last_stopped = Some(night.night_id);
                    }
                    None if tracker.storage_error().get().is_none() => {
                        warning("No night in progress.")
                    }
                    None => {}
                }
            }
            (Some("rate"), arg) => {
                let Some(quality) = arg.and_then(|a| a.parse::<i32>().ok()) else {
                    warning("Usage: rate <0-5>");
                    continue;
                };
                let Some(key) = last_stopped.or_else(|| latest_finished(&tracker)) else {
                    warning("No finished night to rate.");
                    continue;
                };
                rate(key, quality, &dao).await;
                last_stopped = None;
            }
            (Some("clear"), _) => {
                if tracker.clear_button_enabled().get() {
                    tracker.on_clear();
                    last_stopped = None;
                } else {
                    info("Nothing to clear.");
                }
            }
            (Some("show"), Some(row)) => match row.parse::<usize>() {
                Ok(position) => {
                    adapter.click(position);
                    match click_rx.try_recv() {
                        Ok(night) => {
                            let detail = SleepDetailViewModelFactory::new(night).create();
                            print_detail(&detail, cfg);
                            detail.on_close();
                        }
                        Err(_) => warning(format!("Row {position} is not a night.")),
                    }
                }
                Err(_) => warning("Usage: show <row>"),
            },
            (Some("show"), None) => warning("Usage: show <row>"),
            (Some(other), _) => warning(format!("Unknown command '{other}'. Try `help`.")),
        }

        tracker.wait_idle().await;
        if let Some(msg) = tracker.take_storage_error() {
            error(msg);
        }
        if tracker.take_snackbar() {
            snackbar("All your data is gone forever.");
        }
        if refresh(&mut nights_rx, &mut adapter, true).await {
            print_controls(&tracker, cfg);
        }
    }

    tracker.on_cleared();
    Ok(())
}

async fn rate(key: i64, quality: i32, dao: &Arc<dyn SleepDatabaseDao>) {
    let vm = SleepQualityViewModelFactory::new(key, Arc::clone(dao)).create();
    if let Err(e) = vm.on_set_sleep_quality(quality) {
        error(e);
        return;
    }
    vm.wait_idle().await;
    if let Some(msg) = vm.take_storage_error() {
        error(msg);
    } else if vm.take_navigation() {
        success(format!("Night #{key} rated."));
    }
}

fn latest_finished(tracker: &SleepTrackerViewModel) -> Option<i64> {
    tracker
        .nights()
        .get()
        .iter()
        .find(|n| !n.is_in_progress())
        .map(|n| n.night_id)
}

/// Resubmit the nights if they were published since the last call and print
/// what changed. The first, silent pass always submits. Returns whether any
/// row changed.
async fn refresh<F>(
    nights_rx: &mut watch::Receiver<Vec<SleepNight>>,
    adapter: &mut SleepNightAdapter<F>,
    print_changes: bool,
) -> bool
where
    F: FnMut(&SleepNight),
{
    if print_changes && !nights_rx.has_changed().unwrap_or(false) {
        return false;
    }
    let nights = nights_rx.borrow_and_update().clone();
    adapter.add_header_and_submit_list(nights);
    let mut log = UpdateLog::default();
    let Some(diff) = adapter.next_submission(&mut log).await else {
        return false;
    };
    if print_changes {
        print_updates(adapter, &log.updates);
    }
    !diff.is_empty()
}

fn print_updates<F: FnMut(&SleepNight)>(adapter: &SleepNightAdapter<F>, updates: &[ListUpdate]) {
    for update in updates {
        match *update {
            ListUpdate::Removed { position } => println!("  - row {position} removed"),
            ListUpdate::Moved { from, to } => println!("  ↕ row {from} → {to}"),
            ListUpdate::Inserted { position } => {
                println!("  + {}", adapter.render_row(position).unwrap_or_default())
            }
            ListUpdate::Changed { position } => {
                println!("  ~ {}", adapter.render_row(position).unwrap_or_default())
            }
        }
    }
}

fn print_all<F: FnMut(&SleepNight)>(adapter: &SleepNightAdapter<F>) {
    for (row, line) in adapter.render_all().iter().enumerate() {
        println!("{row:>3} {line}");
    }
}

/// Which actions are available right now; unavailable ones are greyed out.
fn print_controls(tracker: &SleepTrackerViewModel, cfg: &Config) {
    let button = |label: &str, enabled: bool| {
        if enabled {
            format!("[{label}]")
        } else {
            format!("{GREY}[{label}]{RESET}")
        }
    };

    let status = match tracker.tonight().get() {
        Some(night) => format!("Tracking {}", describe_night(&night, cfg)),
        None => "Idle".to_string(),
    };
    println!(
        "{status}   {} {} {}",
        button("start", tracker.start_button_enabled().get()),
        button("stop", tracker.stop_button_enabled().get()),
        button("clear", tracker.clear_button_enabled().get()),
    );
}
