use crate::cli::commands::{fail_on_storage_error, open_dao};
use crate::config::Config;
use crate::core::factory::ViewModelFactory;
use crate::core::quality::SleepQualityViewModelFactory;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::ui::rows::quality_label;

pub async fn handle(id: i64, quality: i32, cfg: &Config) -> AppResult<()> {
    let vm = SleepQualityViewModelFactory::new(id, open_dao(cfg).await?).create();
    vm.on_set_sleep_quality(quality)?;
    vm.wait_idle().await;
    fail_on_storage_error(vm.take_storage_error())?;

    if vm.take_navigation() {
        success(format!(
            "Night #{} rated: {}",
            vm.night_key(),
            quality_label(quality)
        ));
    }
    Ok(())
}
