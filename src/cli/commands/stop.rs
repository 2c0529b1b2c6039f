use crate::cli::commands::{describe_night, fail_on_storage_error, open_dao, quality_scale};
use crate::config::Config;
use crate::core::tracker::SleepTrackerViewModel;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let vm = SleepTrackerViewModel::new(open_dao(cfg).await?);
    vm.wait_idle().await;
    fail_on_storage_error(vm.take_storage_error())?;

    if !vm.stop_button_enabled().get() {
        warning("No night in progress.");
        return Ok(());
    }

    vm.on_stop_tracking();
    vm.wait_idle().await;
    fail_on_storage_error(vm.take_storage_error())?;

    // the rating screen is a separate command here
    if let Some(night) = vm.take_navigation() {
        success(format!("Stopped {}", describe_night(&night, cfg)));
        info(format!(
            "How did you sleep? rsleeptracker rate {} <0-5>\n   {}",
            night.night_id,
            quality_scale()
        ));
    }
    Ok(())
}
