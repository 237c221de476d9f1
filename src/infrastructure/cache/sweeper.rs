//! Background task that purges expired passphrase cache entries.

use crate::foundation::MIN_SWEEP_INTERVAL_MILLIS;
use crate::infrastructure::cache::passphrase_cache::PassphraseCache;
use log::{debug, info, warn};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Handle to a running sweeper. Dropping it aborts the task.
pub struct CacheSweeper {
    handle: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl CacheSweeper {
    /// Start sweeping `cache` every `interval` on the current tokio runtime.
    ///
    /// The task only holds a weak reference and exits once the cache is dropped.
    /// Intervals shorter than [`MIN_SWEEP_INTERVAL_MILLIS`] are raised to it.
    pub fn spawn(cache: &Arc<PassphraseCache>, interval: Duration) -> Self {
        let min_interval = Duration::from_millis(MIN_SWEEP_INTERVAL_MILLIS);
        let interval = if interval < min_interval {
            warn!("passphrase cache sweep interval {:?} too short, using {:?}", interval, min_interval);
            min_interval
        } else {
            interval
        };
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run_sweep_loop(Arc::downgrade(cache), interval, shutdown_rx));
        info!("passphrase cache sweeper started interval_ms={}", interval.as_millis());
        Self { handle: Some(handle), shutdown: Some(shutdown_tx) }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |handle| handle.is_finished())
    }

    /// Stop the task and wait for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for CacheSweeper {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run_sweep_loop(cache: Weak<PassphraseCache>, interval: Duration, mut shutdown: oneshot::Receiver<()>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debug!("passphrase cache sweeper shutting down");
                return;
            }
            _ = ticker.tick() => {
                let Some(cache) = cache.upgrade() else {
                    debug!("passphrase cache dropped; sweeper exiting");
                    return;
                };
                cache.purge_expired();
            }
        }
    }
}
