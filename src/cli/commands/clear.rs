use crate::cli::commands::{fail_on_storage_error, open_dao};
use crate::config::Config;
use crate::core::tracker::SleepTrackerViewModel;
use crate::errors::AppResult;
use crate::ui::messages::{info, snackbar};

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let vm = SleepTrackerViewModel::new(open_dao(cfg).await?);
    vm.wait_idle().await;

    if !vm.clear_button_enabled().get() {
        info("Nothing to clear.");
        return Ok(());
    }

    vm.on_clear();
    vm.wait_idle().await;
    fail_on_storage_error(vm.take_storage_error())?;

    if vm.take_snackbar() {
        snackbar("All your data is gone forever.");
    }
    Ok(())
}
