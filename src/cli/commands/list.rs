use crate::cli::commands::{fail_on_storage_error, open_dao};
use crate::config::Config;
use crate::core::tracker::SleepTrackerViewModel;
use crate::errors::AppResult;
use crate::models::night::SleepNight;
use crate::ui::adapter::SleepNightAdapter;
use crate::ui::diff::UpdateLog;
use crate::ui::messages::info;

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let vm = SleepTrackerViewModel::new(open_dao(cfg).await?);
    vm.wait_idle().await;
    fail_on_storage_error(vm.take_storage_error())?;

    let mut adapter = SleepNightAdapter::new(cfg.row_style(), |_: &SleepNight| {});
    adapter.add_header_and_submit_list(vm.nights().get());
    adapter.next_submission(&mut UpdateLog::default()).await;

    for line in adapter.render_all() {
        println!("{line}");
    }
    if vm.has_no_records().get() {
        info("No nights recorded yet. Start one with `rsleeptracker start`.");
    }
    Ok(())
}
