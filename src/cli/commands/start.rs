use crate::cli::commands::{describe_night, fail_on_storage_error, open_dao};
use crate::config::Config;
use crate::core::tracker::SleepTrackerViewModel;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let vm = SleepTrackerViewModel::new(open_dao(cfg).await?);
    vm.wait_idle().await;
    fail_on_storage_error(vm.take_storage_error())?;

    if let Some(night) = vm.tonight().get() {
        warning(format!(
            "Already tracking {}. Use `stop` first.",
            describe_night(&night, cfg)
        ));
        return Ok(());
    }

    vm.on_start_tracking();
    vm.wait_idle().await;
    fail_on_storage_error(vm.take_storage_error())?;

    if let Some(night) = vm.tonight().get() {
        success(format!("Tracking {}", describe_night(&night, cfg)));
    }
    Ok(())
}
