//! View-state of the tracker screen.
//!
//! Idle/Tracking state machine over `tonight`, the night currently in
//! progress. Storage calls run in the view-state's scope, which executes the
//! initial load, start, stop and clear one at a time in the order they were
//! requested, so two quick taps cannot interleave.

use crate::core::live_data::{LiveData, MappedLiveData, MutableLiveData};
use crate::core::scope::{ScopeToken, ViewModelScope};
use crate::db::dao::SleepDatabaseDao;
use crate::errors::AppResult;
use crate::models::night::{SleepNight, now_millis};
use std::sync::Arc;
use tracing::{debug, info, warn};

struct TrackerState {
    database: Arc<dyn SleepDatabaseDao>,
    tonight: MutableLiveData<Option<SleepNight>>,
    navigate_to_sleep_quality: MutableLiveData<Option<SleepNight>>,
    show_snackbar: MutableLiveData<bool>,
    storage_error: MutableLiveData<Option<String>>,
    token: ScopeToken,
}

impl TrackerState {
    /// Most recent night, kept only while it is still in progress.
    ///
    /// "In progress" is inferred from start == end, and at most one such
    /// night is assumed to exist.
    async fn get_night_from_database(&self) -> AppResult<Option<SleepNight>> {
        let night = self.database.get_tonight().await?;
        Ok(night.filter(SleepNight::is_in_progress))
    }

    async fn initialize_night(&self) -> AppResult<()> {
        let tonight = self.get_night_from_database().await?;
        if self.token.is_cancelled() {
            return Ok(());
        }
        debug!(tracking = tonight.is_some(), "tonight loaded");
        self.tonight.set(tonight);
        Ok(())
    }

    async fn start_tracking(&self) -> AppResult<()> {
        if self.tonight.get().is_some() {
            debug!("start ignored: already tracking");
            return Ok(());
        }
        // another view-state or process may have started one meanwhile
        if let Some(open) = self.get_night_from_database().await? {
            debug!(night_id = open.night_id, "start ignored: night already in progress");
            if !self.token.is_cancelled() {
                self.tonight.set(Some(open));
            }
            return Ok(());
        }
        if self.token.is_cancelled() {
            return Ok(());
        }

        self.database.insert(&SleepNight::new()).await?;
        if self.token.is_cancelled() {
            return Ok(());
        }

        let tonight = self.get_night_from_database().await?;
        if self.token.is_cancelled() {
            return Ok(());
        }
        info!(night_id = ?tonight.as_ref().map(|n| n.night_id), "tracking started");
        self.tonight.set(tonight);
        Ok(())
    }

    async fn stop_tracking(&self) -> AppResult<()> {
        let Some(mut night) = self.tonight.get() else {
            debug!("stop ignored: nothing in progress");
            return Ok(());
        };

        // end must differ from start, or the night would still read as in progress
        night.end_time_milli = now_millis().max(night.start_time_milli + 1);
        self.database.update(&night).await?;
        if self.token.is_cancelled() {
            return Ok(());
        }

        info!(night_id = night.night_id, "tracking stopped");
        self.tonight.set(None);
        self.navigate_to_sleep_quality.set(Some(night));
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.database.clear().await?;
        if self.token.is_cancelled() {
            return Ok(());
        }

        info!("all nights cleared");
        self.tonight.set(None);
        self.show_snackbar.set(true);
        Ok(())
    }

    fn report(&self, op: &str, result: AppResult<()>) {
        if let Err(e) = result {
            warn!(op, error = %e, "storage operation failed");
            if !self.token.is_cancelled() {
                self.storage_error
                    .set(Some(format!("Could not {op}: {e}. Please try again.")));
            }
        }
    }
}

pub struct SleepTrackerViewModel {
    state: Arc<TrackerState>,
    nights: LiveData<Vec<SleepNight>>,
    scope: ViewModelScope,
}

impl SleepTrackerViewModel {
    /// Build the view-state and start loading tonight's night.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(database: Arc<dyn SleepDatabaseDao>) -> Self {
        let scope = ViewModelScope::new();
        let nights = LiveData::from_receiver(database.get_all_nights());
        let state = Arc::new(TrackerState {
            database,
            tonight: MutableLiveData::new(None),
            navigate_to_sleep_quality: MutableLiveData::new(None),
            show_snackbar: MutableLiveData::new(false),
            storage_error: MutableLiveData::new(None),
            token: scope.token(),
        });

        let vm = Self {
            state,
            nights,
            scope,
        };
        vm.launch("load tonight", |s| async move { s.initialize_night().await });
        vm
    }

    fn launch<F, Fut>(&self, op: &'static str, f: F)
    where
        F: FnOnce(Arc<TrackerState>) -> Fut,
        Fut: std::future::Future<Output = AppResult<()>> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let fut = f(Arc::clone(&state));
        self.scope.launch(async move {
            let result = fut.await;
            state.report(op, result);
        });
    }

    // ---------------------------
    // Observables
    // ---------------------------

    pub fn tonight(&self) -> LiveData<Option<SleepNight>> {
        self.state.tonight.as_live_data()
    }

    pub fn nights(&self) -> LiveData<Vec<SleepNight>> {
        self.nights.clone()
    }

    pub fn is_tracking(&self) -> MappedLiveData<Option<SleepNight>, bool> {
        self.tonight().map(Option::is_some)
    }

    pub fn has_no_records(&self) -> MappedLiveData<Vec<SleepNight>, bool> {
        self.nights.map(Vec::is_empty)
    }

    pub fn start_button_enabled(&self) -> MappedLiveData<Option<SleepNight>, bool> {
        self.tonight().map(Option::is_none)
    }

    pub fn stop_button_enabled(&self) -> MappedLiveData<Option<SleepNight>, bool> {
        self.is_tracking()
    }

    pub fn clear_button_enabled(&self) -> MappedLiveData<Vec<SleepNight>, bool> {
        self.nights.map(|n| !n.is_empty())
    }

    // ---------------------------
    // One-shot signals
    // ---------------------------

    pub fn navigate_to_sleep_quality(&self) -> LiveData<Option<SleepNight>> {
        self.state.navigate_to_sleep_quality.as_live_data()
    }

    pub fn done_navigating(&self) {
        self.state.navigate_to_sleep_quality.set(None);
    }

    /// Consume the pending navigation, if any.
    pub fn take_navigation(&self) -> Option<SleepNight> {
        self.state.navigate_to_sleep_quality.take()
    }

    pub fn show_snackbar(&self) -> LiveData<bool> {
        self.state.show_snackbar.as_live_data()
    }

    pub fn done_showing_snackbar(&self) {
        self.state.show_snackbar.set(false);
    }

    /// Consume the clear confirmation, if raised.
    pub fn take_snackbar(&self) -> bool {
        self.state.show_snackbar.take()
    }

    pub fn storage_error(&self) -> LiveData<Option<String>> {
        self.state.storage_error.as_live_data()
    }

    pub fn take_storage_error(&self) -> Option<String> {
        self.state.storage_error.take()
    }

    // ---------------------------
    // UI actions
    // ---------------------------

    pub fn on_start_tracking(&self) {
        self.launch("start tracking", |s| async move { s.start_tracking().await });
    }

    pub fn on_stop_tracking(&self) {
        self.launch("stop tracking", |s| async move { s.stop_tracking().await });
    }

    pub fn on_clear(&self) {
        self.launch("clear nights", |s| async move { s.clear().await });
    }

    /// Wait for every launched action to finish.
    pub async fn wait_idle(&self) {
        self.scope.wait_idle().await;
    }

    /// Screen torn down: stop scheduling work. Also happens on drop.
    pub fn on_cleared(&self) {
        self.scope.cancel();
    }
}
