use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Handle for one recurring background task. Cancellation is idempotent:
/// calling `cancel` on an already-cancelled handle is a no-op.
pub struct TaskHandle {
    name: &'static str,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl TaskHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn cancel(&mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Owns every recurring task started for the active screen. The controller
/// installs tasks on screen entry and calls `cancel_all` on every exit path,
/// so no task outlives the screen that started it.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: Vec<TaskHandle>,
    starts: Arc<AtomicUsize>,
    cancels: Arc<AtomicUsize>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a recurring task that runs `tick` once per `period` until
    /// cancelled. The first tick fires after one full period.
    pub fn start_interval<F, Fut>(&mut self, name: &'static str, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval's first tick resolves immediately; swallow it so the
            // task fires after one full period like a plain setInterval.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => tick().await,
                    _ = token.cancelled() => {
                        debug!("background task shutting down");
                        break;
                    }
                }
            }
        });

        self.starts.fetch_add(1, Ordering::SeqCst);
        self.tasks.push(TaskHandle {
            name,
            cancel_token,
            handle: Some(handle),
        });
    }

    /// Spawn a task that runs `tick` immediately, then once per `period`.
    /// Used by the planned-visitor poll, which refreshes on mount.
    pub fn start_interval_immediate<F, Fut>(
        &mut self,
        name: &'static str,
        period: Duration,
        mut tick: F,
    ) where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => tick().await,
                    _ = token.cancelled() => break,
                }
            }
        });

        self.starts.fetch_add(1, Ordering::SeqCst);
        self.tasks.push(TaskHandle {
            name,
            cancel_token,
            handle: Some(handle),
        });
    }

    /// Cancel every owned task. Safe to call with nothing running and safe to
    /// call twice; already-cancelled handles are skipped.
    pub fn cancel_all(&mut self) {
        for mut task in self.tasks.drain(..) {
            if task.is_cancelled() {
                error!("task {} was cancelled outside the registry", task.name());
                continue;
            }
            task.cancel();
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    /// Lifetime start/cancel totals, used to assert the exactly-once cleanup
    /// discipline.
    pub fn totals(&self) -> (usize, usize) {
        (
            self.starts.load(Ordering::SeqCst),
            self.cancels.load(Ordering::SeqCst),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn interval_task_fires_until_cancelled() {
        let mut registry = TaskRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();

        registry.start_interval("test-tick", Duration::from_millis(10), move || {
            let hits = hits_clone.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(55)).await;
        registry.cancel_all();
        let observed = hits.load(Ordering::SeqCst);
        assert!(observed >= 2, "expected at least 2 ticks, got {observed}");

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(hits.load(Ordering::SeqCst), observed, "ticked after cancel");
    }

    #[tokio::test]
    async fn immediate_interval_fires_on_start() {
        let mut registry = TaskRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();

        registry.start_interval_immediate("poll", Duration::from_secs(600), move || {
            let hits = hits_clone.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        registry.cancel_all();
    }

    #[tokio::test]
    async fn cancel_all_is_idempotent() {
        let mut registry = TaskRegistry::new();
        registry.start_interval("noop", Duration::from_secs(60), || async {});

        registry.cancel_all();
        registry.cancel_all();
        registry.cancel_all();

        let (starts, cancels) = registry.totals();
        assert_eq!(starts, 1);
        assert_eq!(cancels, 1);
        assert_eq!(registry.active_count(), 0);
    }

    #[tokio::test]
    async fn n_enter_leave_cycles_give_n_start_cancel_pairs() {
        let mut registry = TaskRegistry::new();
        for _ in 0..5 {
            registry.start_interval("clock", Duration::from_secs(1), || async {});
            registry.cancel_all();
        }
        let (starts, cancels) = registry.totals();
        assert_eq!(starts, 5);
        assert_eq!(cancels, 5);
    }
}
