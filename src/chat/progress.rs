//! Rotating progress text shown while a query is in flight

use crate::config::ChatConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Steps and cadence of the progress rotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSettings {
    pub steps: Vec<String>,
    pub interval: Duration,
}

impl ProgressSettings {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            steps: config.progress_steps.clone(),
            interval: config.progress_interval(),
        }
    }
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}

/// Guard owning a running progress rotation
///
/// The first step is published synchronously by [`ProgressTicker::start`];
/// a background task advances to the next step every interval, wrapping
/// around. Dropping the guard stops the task and publishes `None`. A tick
/// racing with the drop can never overwrite that `None`.
#[derive(Debug)]
pub struct ProgressTicker {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
    tx: Arc<watch::Sender<Option<String>>>,
}

impl ProgressTicker {
    /// Start rotating through `settings.steps`
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(settings: &ProgressSettings, tx: Arc<watch::Sender<Option<String>>>) -> Self {
        let token = CancellationToken::new();
        tx.send_replace(settings.steps.first().cloned());

        let handle = (settings.steps.len() > 1).then(|| {
            let steps = settings.steps.clone();
            let interval = settings.interval;
            let token = token.clone();
            let tx = Arc::clone(&tx);
            tokio::spawn(async move {
                let mut ticker =
                    tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
                let mut index = 0;
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = ticker.tick() => {
                            index = (index + 1) % steps.len();
                            let step = steps[index].clone();
                            tx.send_if_modified(|current| {
                                if token.is_cancelled() {
                                    return false;
                                }
                                *current = Some(step);
                                true
                            });
                        }
                    }
                }
            })
        });

        Self { token, handle, tx }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.tx.send_replace(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ProgressSettings {
        ProgressSettings {
            steps: vec!["one".to_string(), "two".to_string(), "three".to_string()],
            interval: Duration::from_millis(1500),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_cycles_and_wraps() {
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);
        let ticker = ProgressTicker::start(&settings(), Arc::clone(&tx));
        assert_eq!(rx.borrow().as_deref(), Some("one"));

        // sample between ticks
        tokio::time::sleep(Duration::from_millis(100)).await;
        let mut seen = Vec::new();
        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            seen.push(rx.borrow().clone().unwrap_or_default());
        }
        assert_eq!(seen, vec!["two", "three", "one"]);

        drop(ticker);
        assert_eq!(*rx.borrow(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_after_drop() {
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);
        drop(ProgressTicker::start(&settings(), Arc::clone(&tx)));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(*rx.borrow(), None);
    }

    #[tokio::test]
    async fn test_single_step_stays_put() {
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);
        let ticker = ProgressTicker::start(
            &ProgressSettings {
                steps: vec!["only".to_string()],
                interval: Duration::from_millis(10),
            },
            Arc::clone(&tx),
        );
        assert!(ticker.handle.is_none());
        assert_eq!(rx.borrow().as_deref(), Some("only"));
    }
}
