use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

/// Something that can drop its stale entries on demand.
pub trait Sweep: Send + Sync + 'static {
    /// Removes everything expired as of now and returns how many entries went.
    fn sweep(&self) -> usize;
}

/// Background task that calls [`Sweep::sweep`] on a fixed period.
///
/// The period is independent of any record's lifetime, so a record can stay
/// resident for up to one period past its expiry instant.
pub struct ExpirySweeper;

impl ExpirySweeper {
    /// Spawns the sweeper on the current Tokio runtime. The first sweep runs
    /// one full `period` after spawning.
    pub fn spawn<T: Sweep>(target: Arc<T>, period: Duration) -> SweeperHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(?period, "expiry sweeper started");

            loop {
                tokio::select! {
                    biased;
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let removed = target.sweep();
                        if removed > 0 {
                            debug!(removed, "sweep evicted expired records");
                        } else {
                            trace!("sweep found nothing to evict");
                        }
                    }
                }
            }

            debug!("expiry sweeper stopped");
        });

        SweeperHandle {
            stop: stop_tx,
            task: Some(task),
        }
    }
}

/// Owner of a running [`ExpirySweeper`]. Dropping the handle cancels it.
pub struct SweeperHandle {
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Signals the sweeper to stop. No sweep starts after this returns.
    pub fn cancel(&self) {
        self.stop.send_replace(true);
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Cancels the sweeper and waits until its task has finished.
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            // an aborted task reports a cancelled JoinError, which is expected
            let _ = task.await;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
