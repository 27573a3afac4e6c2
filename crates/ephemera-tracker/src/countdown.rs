use ephemera_core::{Countdown, CountdownState, RecordId};
use jiff::Timestamp;
use std::sync::Weak;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::trace;

/// What a countdown needs to know about the world it displays.
pub trait CountdownSource: Send + Sync + 'static {
    fn now(&self) -> Timestamp;

    /// Whether the record is still displayed (resident in the store).
    fn is_resident(&self, id: RecordId) -> bool;
}

/// Recomputes one record's [`Countdown`] on a fixed period and publishes the
/// result through a `watch` channel.
///
/// The ticker holds only a weak reference to its source and stops, releasing
/// its timer, as soon as the record is gone, the countdown has expired, the
/// source is dropped, or it is told to stop.
pub struct CountdownTicker;

impl CountdownTicker {
    pub fn spawn<T: CountdownSource>(
        source: Weak<T>,
        id: RecordId,
        expires_at: Timestamp,
        period: Duration,
        mut session_stop: watch::Receiver<bool>,
    ) -> Option<CountdownHandle> {
        let now = source.upgrade()?.now();
        let mut countdown = Countdown::new(expires_at, now);
        let (state_tx, state_rx) = watch::channel(countdown.state());
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            if countdown.is_expired() {
                return;
            }

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first tick completes immediately; the state is already current
            ticker.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = session_stop.changed() => break,
                    _ = ticker.tick() => {
                        let Some(source) = source.upgrade() else {
                            break;
                        };
                        if !source.is_resident(id) {
                            trace!(id = %id, "record no longer displayed; stopping countdown");
                            break;
                        }
                        let state = countdown.observe(source.now());
                        state_tx.send_replace(state);
                        if countdown.is_expired() {
                            break;
                        }
                    }
                }
            }
        });

        Some(CountdownHandle {
            state: state_rx,
            stop: stop_tx,
            task,
        })
    }
}

/// A live countdown for one record. Dropping the handle stops the ticker.
pub struct CountdownHandle {
    state: watch::Receiver<CountdownState>,
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// The most recently computed state.
    pub fn current(&self) -> CountdownState {
        *self.state.borrow()
    }

    /// Display text, e.g. `"Expires in: 4m 07s"` or `"Expired"`.
    pub fn text(&self) -> String {
        self.current().to_string()
    }

    /// Waits for the next recomputed state. Returns `None` once the ticker
    /// has stopped.
    pub async fn changed(&mut self) -> Option<CountdownState> {
        self.state.changed().await.ok()?;
        Some(*self.state.borrow_and_update())
    }

    pub fn cancel(&self) {
        self.stop.send_replace(true);
        self.task.abort();
    }

    /// Whether the ticker has released its timer.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
