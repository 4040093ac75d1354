//! Reaper Task
//!
//! Background task that periodically sweeps expired cache entries and stops
//! when signalled.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Something a reaper can sweep.
pub trait Reap: Send + Sync + 'static {
    /// Removes every stale entry and returns how many were removed.
    fn reap_expired(&self) -> usize;
}

// == Reaper Handle ==
/// Owned handle to a running reaper task.
///
/// Dropping the handle signals the task to stop; [`ReaperHandle::shutdown`]
/// additionally waits for it to finish.
#[derive(Debug)]
pub struct ReaperHandle {
    shutdown_tx: watch::Sender<bool>,
    join: Option<JoinHandle<()>>,
}

impl ReaperHandle {
    /// Asks the task to stop without waiting for it.
    pub fn signal(&self) {
        // Err only means the task already exited
        let _ = self.shutdown_tx.send(true);
    }

    /// Signals the task and waits until it has exited.
    pub async fn shutdown(mut self) {
        self.signal();
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                warn!("Reaper task ended abnormally: {}", e);
            }
        }
    }

    /// True once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for ReaperHandle {
    fn drop(&mut self) {
        self.signal();
    }
}

/// Spawns a background task that calls [`Reap::reap_expired`] on `target`
/// every `interval`.
///
/// The task holds only a weak reference: it exits on shutdown signal or as
/// soon as the target has been dropped. The target's lock is taken only for
/// the sweep itself, never across the sleep.
///
/// Must be called from within a Tokio runtime.
///
/// # Example
/// ```ignore
/// let handle = spawn_reaper(Arc::downgrade(&inner), Duration::from_secs(60));
/// // Later, during teardown:
/// handle.shutdown().await;
/// ```
pub fn spawn_reaper<T: Reap>(target: Weak<T>, interval: Duration) -> ReaperHandle {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let join = tokio::spawn(async move {
        info!("Starting reaper task with interval of {:?}", interval);

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                // Only `true` is ever sent, and a closed channel means the
                // handle is gone: either way, stop
                _ = shutdown_rx.changed() => break,
            }

            let Some(target) = target.upgrade() else {
                debug!("Reaper target dropped");
                break;
            };

            let removed = target.reap_expired();
            if removed > 0 {
                info!("Reaper: removed {} expired entries", removed);
            } else {
                debug!("Reaper: no expired entries found");
            }
        }

        info!("Reaper task stopped");
    });

    ReaperHandle {
        shutdown_tx,
        join: Some(join),
    }
}
