//! View-state of the night detail screen.

use crate::core::factory::ViewModelFactory;
use crate::core::live_data::{LiveData, MutableLiveData};
use crate::models::night::SleepNight;

pub struct SleepDetailViewModel {
    night: MutableLiveData<Option<SleepNight>>,
}

impl SleepDetailViewModel {
    pub fn new(night: SleepNight) -> Self {
        Self {
            night: MutableLiveData::new(Some(night)),
        }
    }

    /// The night on display; `None` once the screen has been closed.
    pub fn night(&self) -> LiveData<Option<SleepNight>> {
        self.night.as_live_data()
    }

    /// Dismiss the screen.
    pub fn on_close(&self) {
        self.night.set(None);
    }
}

pub struct SleepDetailViewModelFactory {
    night: SleepNight,
}

impl SleepDetailViewModelFactory {
    pub fn new(night: SleepNight) -> Self {
        Self { night }
    }
}

impl ViewModelFactory for SleepDetailViewModelFactory {
    type ViewModel = SleepDetailViewModel;

    fn create(&self) -> SleepDetailViewModel {
        SleepDetailViewModel::new(self.night.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_the_night_until_closed() {
        let night = SleepNight::started_at(1_000);
        let vm = SleepDetailViewModelFactory::new(night.clone()).create();
        let view = vm.night();

        assert_eq!(view.get(), Some(night));

        vm.on_close();
        assert_eq!(view.get(), None);
    }
}
