use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Cancelable scheduled task with a fixed quiet window.
///
/// Each `call` aborts the previously pending timer before scheduling a
/// new one, so at most one trigger is pending at a time. Once the window
/// elapses the work is spawned detached: a fetch that has already been
/// dispatched is never cancelled by a newer trigger, so only work still
/// waiting out its quiet window can be superseded.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `task` to run after the quiet window, cancelling any
    /// previously scheduled run that has not started yet.
    pub fn call<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            tokio::spawn(task);
        }));
    }

    /// Abort the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
