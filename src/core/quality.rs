//! View-state of the rating screen shown after a night is stopped.

use crate::core::factory::ViewModelFactory;
use crate::core::live_data::{LiveData, MutableLiveData};
use crate::core::scope::{ScopeToken, ViewModelScope};
use crate::db::dao::SleepDatabaseDao;
use crate::errors::{AppError, AppResult};
use crate::models::quality::SleepQuality;
use std::sync::Arc;
use tracing::{info, warn};

struct QualityState {
    night_key: i64,
    database: Arc<dyn SleepDatabaseDao>,
    navigate_to_sleep_tracker: MutableLiveData<bool>,
    storage_error: MutableLiveData<Option<String>>,
    token: ScopeToken,
}

impl QualityState {
    async fn rate(&self, quality: SleepQuality) -> AppResult<()> {
        let mut night = self
            .database
            .get(self.night_key)
            .await?
            .ok_or(AppError::NightNotFound(self.night_key))?;

        night.sleep_quality = quality.to_db_value();
        self.database.update(&night).await?;
        if self.token.is_cancelled() {
            return Ok(());
        }

        info!(night_id = self.night_key, quality = quality.label(), "night rated");
        self.navigate_to_sleep_tracker.set(true);
        Ok(())
    }
}

pub struct SleepQualityViewModel {
    state: Arc<QualityState>,
    scope: ViewModelScope,
}

impl SleepQualityViewModel {
    pub fn new(night_key: i64, database: Arc<dyn SleepDatabaseDao>) -> Self {
        let scope = ViewModelScope::new();
        let state = Arc::new(QualityState {
            night_key,
            database,
            navigate_to_sleep_tracker: MutableLiveData::new(false),
            storage_error: MutableLiveData::new(None),
            token: scope.token(),
        });
        Self { state, scope }
    }

    pub fn night_key(&self) -> i64 {
        self.state.night_key
    }

    pub fn navigate_to_sleep_tracker(&self) -> LiveData<bool> {
        self.state.navigate_to_sleep_tracker.as_live_data()
    }

    pub fn done_navigating(&self) {
        self.state.navigate_to_sleep_tracker.set(false);
    }

    pub fn take_navigation(&self) -> bool {
        self.state.navigate_to_sleep_tracker.take()
    }

    pub fn storage_error(&self) -> LiveData<Option<String>> {
        self.state.storage_error.as_live_data()
    }

    pub fn take_storage_error(&self) -> Option<String> {
        self.state.storage_error.take()
    }

    /// Store `quality` (0..=5) on the night. Out-of-range values are
    /// rejected before anything is scheduled.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_set_sleep_quality(&self, quality: i32) -> AppResult<()> {
        let quality =
            SleepQuality::from_db_value(quality)?.ok_or(AppError::InvalidQuality(quality))?;

        let state = Arc::clone(&self.state);
        self.scope.launch(async move {
            if let Err(e) = state.rate(quality).await {
                warn!(night_id = state.night_key, error = %e, "rating failed");
                if !state.token.is_cancelled() {
                    state
                        .storage_error
                        .set(Some(format!("Could not rate night: {e}. Please try again.")));
                }
            }
        });
        Ok(())
    }

    pub async fn wait_idle(&self) {
        self.scope.wait_idle().await;
    }

    pub fn on_cleared(&self) {
        self.scope.cancel();
    }
}

pub struct SleepQualityViewModelFactory {
    night_key: i64,
    database: Arc<dyn SleepDatabaseDao>,
}

impl SleepQualityViewModelFactory {
    pub fn new(night_key: i64, database: Arc<dyn SleepDatabaseDao>) -> Self {
        Self {
            night_key,
            database,
        }
    }
}

impl ViewModelFactory for SleepQualityViewModelFactory {
    type ViewModel = SleepQualityViewModel;

    fn create(&self) -> SleepQualityViewModel {
        SleepQualityViewModel::new(self.night_key, Arc::clone(&self.database))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::dao::SqliteSleepDao;
    use crate::models::night::SleepNight;

    #[tokio::test]
    async fn rating_updates_the_night_and_navigates_back() {
        let dao = Arc::new(SqliteSleepDao::in_memory().unwrap());
        let mut night = SleepNight::started_at(1_000);
        night.end_time_milli = 9_000;
        let id = dao.insert(&night).await.unwrap();

        let vm = SleepQualityViewModelFactory::new(id, dao.clone()).create();
        vm.on_set_sleep_quality(5).unwrap();
        vm.wait_idle().await;

        assert_eq!(dao.get(id).await.unwrap().unwrap().sleep_quality, 5);
        assert!(vm.take_navigation());
        assert!(!vm.navigate_to_sleep_tracker().get());
    }

    #[tokio::test]
    async fn invalid_quality_is_rejected_up_front() {
        let dao = Arc::new(SqliteSleepDao::in_memory().unwrap());
        let vm = SleepQualityViewModel::new(1, dao);

        assert!(matches!(
            vm.on_set_sleep_quality(9),
            Err(AppError::InvalidQuality(9))
        ));
        assert!(matches!(
            vm.on_set_sleep_quality(-1),
            Err(AppError::InvalidQuality(-1))
        ));
    }

    #[tokio::test]
    async fn missing_night_raises_an_error_notice() {
        let dao = Arc::new(SqliteSleepDao::in_memory().unwrap());
        let vm = SleepQualityViewModel::new(77, dao);

        vm.on_set_sleep_quality(2).unwrap();
        vm.wait_idle().await;

        assert!(!vm.take_navigation());
        assert!(vm.take_storage_error().unwrap().contains("77"));
    }
}
