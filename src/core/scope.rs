//! Lifetime-bound task scope for view-states.
//!
//! Work launched here belongs to one view-state and runs one piece at a time,
//! in launch order, whatever runtime flavor drives it. `cancel` aborts it at
//! its next `.await` and raises a flag the work checks before publishing
//! results, so a destroyed screen never receives stale state. Statements
//! already handed to the storage worker still run to completion: the blocking
//! pool does not observe aborts.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Clone, Debug, Default)]
pub struct ScopeToken(Arc<AtomicBool>);

impl ScopeToken {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct ViewModelScope {
    token: ScopeToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    // completion signal of the most recently launched task
    tail: Mutex<Option<oneshot::Receiver<()>>>,
}

impl ViewModelScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> ScopeToken {
        self.token.clone()
    }

    fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Spawn `fut` on the runtime, tied to this scope. It starts only after
    /// everything launched before it has finished. Ignored once cancelled.
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if !self.is_active() {
            debug!("scope cancelled, dropping launch");
            return;
        }

        let (done_tx, done_rx) = oneshot::channel::<()>();
        let previous = self
            .tail
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(done_rx);

        let handle = tokio::spawn(async move {
            if let Some(previous) = previous {
                // Err means the predecessor was aborted; either way it is over
                let _ = previous.await;
            }
            fut.await;
            drop(done_tx);
        });
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }

    /// Wait until every task launched so far (and any they launched) is done.
    pub async fn wait_idle(&self) {
        loop {
            let batch = {
                let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut *tasks)
            };
            if batch.is_empty() {
                return;
            }
            for handle in batch {
                if let Err(e) = handle.await
                    && e.is_panic()
                {
                    warn!(error = %e, "view-state task panicked");
                }
            }
        }
    }

    /// Stop scheduling work for this scope and abort what is pending.
    pub fn cancel(&self) {
        self.token.0.store(true, Ordering::SeqCst);
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        for handle in tasks.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for ViewModelScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn wait_idle_joins_launched_work() {
        let scope = ViewModelScope::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let hits = Arc::clone(&hits);
            scope.launch(async move {
                tokio::task::yield_now().await;
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }
        scope.wait_idle().await;

        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn work_runs_in_launch_order_on_many_threads() {
        for _ in 0..50 {
            let scope = ViewModelScope::new();
            let order = Arc::new(Mutex::new(Vec::new()));

            for i in 0..8u32 {
                let order = Arc::clone(&order);
                scope.launch(async move {
                    // later tasks sleep less, so any overlap would reorder them
                    tokio::time::sleep(Duration::from_micros(u64::from(8 - i) * 50)).await;
                    order.lock().unwrap().push(i);
                });
            }
            scope.wait_idle().await;

            assert_eq!(*order.lock().unwrap(), (0..8).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn cancel_aborts_pending_work_and_refuses_new_work() {
        let scope = ViewModelScope::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = Arc::clone(&hits);
        scope.launch(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            h.fetch_add(1, Ordering::SeqCst);
        });
        scope.cancel();

        let h = Arc::clone(&hits);
        scope.launch(async move {
            h.fetch_add(1, Ordering::SeqCst);
        });
        scope.wait_idle().await;

        assert!(scope.token().is_cancelled());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
