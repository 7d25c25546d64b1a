use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle};

/// Output that follows its input only once the input has been left alone for
/// `quiet_period`.
///
/// Every [`set`](Self::set) restarts the timer and cancels the update still
/// pending from the previous call. Dropping the value cancels the pending
/// update as well. `set` spawns onto the current tokio runtime.
pub struct DebouncedValue<T> {
    quiet_period: Duration,
    output: Arc<watch::Sender<T>>,
    pending: Option<JoinHandle<()>>,
}

impl<T> DebouncedValue<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T, quiet_period: Duration) -> Self {
        let (output, _) = watch::channel(initial);
        Self {
            quiet_period,
            output: Arc::new(output),
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.subscribe()
    }

    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }

    pub fn set(&mut self, value: T) {
        self.cancel();
        let output = Arc::clone(&self.output);
        let quiet_period = self.quiet_period;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            output.send_if_modified(|current| {
                if *current == value {
                    return false;
                }
                *current = value;
                true
            });
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl<T> Drop for DebouncedValue<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/debounce_tests.rs"]
mod tests;
