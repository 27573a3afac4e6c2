use crate::countdown::{CountdownHandle, CountdownSource, CountdownTicker};
use crate::error::{Result, SessionError};
use crate::settings::SessionSettings;
use crate::sweeper::{ExpirySweeper, Sweep, SweeperHandle};
use ephemera_core::{validate_target, Clock, Record, RecordId, RecordStore};
use ephemera_gateway::Gateway;
use ephemera_storage::{DurableStore, PersistenceBridge};
use jiff::Timestamp;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// State shared between the session and its background tasks.
///
/// The store lock is held across every mutate-then-persist pair, so the
/// durable copy is always written in mutation order.
struct Shared<S, C> {
    records: Mutex<RecordStore>,
    bridge: PersistenceBridge<S>,
    clock: C,
    closed: AtomicBool,
}

impl<S: DurableStore, C: Clock> Shared<S, C> {
    fn mutate<T>(&self, f: impl FnOnce(&mut RecordStore) -> (T, bool)) -> T {
        let mut records = self.records.lock();
        let (output, changed) = f(&mut records);
        if changed {
            self.persist(&records);
        }
        output
    }

    fn persist(&self, records: &RecordStore) {
        // the in-memory store stays authoritative when the write fails
        if let Err(e) = self.bridge.save(records.snapshot()) {
            warn!(error = %e, count = records.len(), "failed to persist records");
        }
    }
}

impl<S: DurableStore, C: Clock> Sweep for Shared<S, C> {
    fn sweep(&self) -> usize {
        if self.closed.load(Ordering::SeqCst) {
            return 0;
        }
        let now = self.clock.now();
        self.mutate(|records| {
            let removed = records.filter_expired(now);
            (removed, removed > 0)
        })
    }
}

impl<S: DurableStore, C: Clock> CountdownSource for Shared<S, C> {
    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn is_resident(&self, id: RecordId) -> bool {
        self.records.lock().get(id).is_some()
    }
}

/// The process-wide record store with its persistence and timers.
///
/// Create one with [`Session::init`] and end it with [`Session::teardown`].
/// Every operation that changes the records writes the full sequence to the
/// durable store before returning.
pub struct Session<S, G, C> {
    shared: Arc<Shared<S, C>>,
    gateway: G,
    settings: SessionSettings,
    sweeper: Option<SweeperHandle>,
    stop: watch::Sender<bool>,
}

impl<S, G, C> Session<S, G, C>
where
    S: DurableStore,
    G: Gateway,
    C: Clock,
{
    /// Loads persisted records, drops the expired ones before anything can
    /// see them, and starts the expiry sweeper.
    ///
    /// Fails with [`SessionError::InvalidSettings`] before touching storage
    /// when `settings` does not validate.
    pub async fn init(settings: SessionSettings, durable: S, gateway: G, clock: C) -> Result<Self> {
        settings.validate()?;

        let bridge = PersistenceBridge::new(durable);
        let mut records = RecordStore::from_records(bridge.load());
        let loaded = records.len();

        let removed = records.filter_expired(clock.now());

        let shared = Arc::new(Shared {
            records: Mutex::new(records),
            bridge,
            clock,
            closed: AtomicBool::new(false),
        });
        if removed > 0 {
            shared.persist(&shared.records.lock());
        }
        info!(loaded, removed, "session initialised");

        let sweeper = ExpirySweeper::spawn(shared.clone(), settings.sweep_interval);
        let (stop, _) = watch::channel(false);

        Ok(Self {
            shared,
            gateway,
            settings,
            sweeper: Some(sweeper),
            stop,
        })
    }

    /// Validates `input`, asks the gateway for a short alias and tracks the
    /// result. On failure no record is created.
    pub async fn shorten(&self, input: &str) -> Result<Record> {
        let target = validate_target(input).inspect_err(|e| {
            debug!(input, error = %e, "rejected input");
        })?;

        let short_url = match timeout(self.settings.gateway_timeout, self.gateway.shorten(input)).await {
            Ok(result) => result.map_err(SessionError::from),
            Err(_) => Err(SessionError::Network(format!(
                "gateway did not answer within {:?}",
                self.settings.gateway_timeout
            ))),
        }
        .inspect_err(|e| warn!(url = %target, error = ?e, "shortening failed"))?;

        let record = Record::with_ttl(input, short_url, self.shared.clock.now(), self.settings.ttl)?;
        self.shared.mutate(|records| {
            let inserted = records.insert(record.clone());
            let changed = inserted.is_ok();
            (inserted, changed)
        })?;

        info!(id = %record.id(), short_url = record.short_url(), "tracking new link");
        Ok(record)
    }

    /// Stops tracking `id`. Deleting an unknown id is a no-op.
    pub fn delete(&self, id: RecordId) -> bool {
        self.shared.mutate(|records| {
            let removed = records.remove(id);
            (removed, removed)
        })
    }

    /// Counts one user click on the short link of `id`.
    pub fn record_click(&self, id: RecordId) -> Option<u64> {
        self.shared.mutate(|records| {
            let clicks = records.increment_clicks(id);
            (clicks, clicks.is_some())
        })
    }

    /// Runs a sweep right now, outside the periodic schedule.
    pub fn sweep(&self) -> usize {
        self.shared.sweep()
    }

    /// A copy of the current records, most recent first.
    pub fn records(&self) -> Vec<Record> {
        self.shared.records.lock().snapshot().to_vec()
    }

    pub fn get(&self, id: RecordId) -> Option<Record> {
        self.shared.records.lock().get(id).cloned()
    }

    pub fn now(&self) -> Timestamp {
        self.shared.clock.now()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Starts a live countdown for `id`, or `None` if it is not resident.
    pub fn watch_countdown(&self, id: RecordId) -> Option<CountdownHandle> {
        let expires_at = self.shared.records.lock().get(id)?.expires_at();
        CountdownTicker::spawn(
            Arc::downgrade(&self.shared),
            id,
            expires_at,
            self.settings.countdown_interval,
            self.stop.subscribe(),
        )
    }

    /// Stops the sweeper and every countdown. Nothing is swept or persisted
    /// by background work after this returns.
    pub async fn teardown(mut self) {
        self.close();
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.shutdown().await;
        }
        info!(resident = self.shared.records.lock().len(), "session torn down");
    }

    fn close(&self) {
        self.shared.closed.store(true, Ordering::SeqCst);
        self.stop.send_replace(true);
        if let Some(sweeper) = &self.sweeper {
            sweeper.cancel();
        }
    }
}

impl<S, G, C> Drop for Session<S, G, C> {
    fn drop(&mut self) {
        self.shared.closed.store(true, Ordering::SeqCst);
        self.stop.send_replace(true);
        // the sweeper handle cancels itself when dropped
    }
}
