//! Observable values for view-states.
//!
//! `MutableLiveData` is the writable side owned by a view-state; the UI gets
//! read-only `LiveData` / `MappedLiveData` handles. Every write stores the new
//! value first and then wakes subscribers, so a woken reader always sees the
//! value that triggered the notification (or a newer one).

use std::sync::Arc;
use tokio::sync::watch;

pub struct MutableLiveData<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> MutableLiveData<T> {
    pub fn new(value: T) -> Self {
        let (tx, _) = watch::channel(value);
        Self { tx }
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Read-only handle for the UI.
    pub fn as_live_data(&self) -> LiveData<T> {
        LiveData {
            rx: self.tx.subscribe(),
        }
    }
}

impl<T: Clone + Default> MutableLiveData<T> {
    /// Read the value and reset it to its default in one step.
    /// This is how one-shot signals are consumed.
    pub fn take(&self) -> T {
        self.tx.send_replace(T::default())
    }
}

/// Read-only observable value.
#[derive(Clone)]
pub struct LiveData<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> LiveData<T> {
    pub fn from_receiver(rx: watch::Receiver<T>) -> Self {
        Self { rx }
    }

    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Wait for the next write. Returns `false` once the owner is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.rx.clone()
    }

    /// Derive a value that is recomputed from this one on every read.
    pub fn map<U>(&self, f: impl Fn(&T) -> U + Send + Sync + 'static) -> MappedLiveData<T, U> {
        MappedLiveData {
            source: self.rx.clone(),
            f: Arc::new(f),
        }
    }
}

/// Value derived from another observable. It has no setter: the only way to
/// change it is to change its source.
pub struct MappedLiveData<S, U> {
    source: watch::Receiver<S>,
    f: Arc<dyn Fn(&S) -> U + Send + Sync>,
}

impl<S, U> Clone for MappedLiveData<S, U> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            f: Arc::clone(&self.f),
        }
    }
}

impl<S, U> MappedLiveData<S, U> {
    pub fn get(&self) -> U {
        (self.f)(&self.source.borrow())
    }

    /// Wait for the source to change. Returns `false` once the source is gone.
    pub async fn changed(&mut self) -> bool {
        self.source.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_resets_to_default() {
        let flag = MutableLiveData::new(false);
        flag.set(true);

        assert!(flag.take());
        assert!(!flag.get());
        assert!(!flag.take());
    }

    #[test]
    fn mapped_value_follows_its_source() {
        let source = MutableLiveData::new(Vec::<i32>::new());
        let is_empty = source.as_live_data().map(|v| v.is_empty());
        assert!(is_empty.get());

        source.set(vec![1]);
        assert!(!is_empty.get());
    }

    #[tokio::test]
    async fn subscribers_see_the_written_value() {
        let source = MutableLiveData::new(0);
        let mut view = source.as_live_data();

        let waiter = tokio::spawn(async move {
            view.changed().await;
            view.get()
        });
        tokio::task::yield_now().await;
        source.set(7);

        assert_eq!(waiter.await.unwrap(), 7);
    }
}
