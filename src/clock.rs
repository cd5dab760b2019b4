use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Shared countdown tick source. Rows register interest instead of owning
/// their own timers: one interval task serves the whole observation set, and
/// it only runs while at least one row is observed.
pub struct ExpiryClock {
    observed: HashSet<String>,
    now_tx: watch::Sender<DateTime<Utc>>,
    now_rx: watch::Receiver<DateTime<Utc>>,
    ticker: Option<JoinHandle<()>>,
}

impl ExpiryClock {
    pub fn new() -> Self {
        let (now_tx, now_rx) = watch::channel(Utc::now());
        Self {
            observed: HashSet::new(),
            now_tx,
            now_rx,
            ticker: None,
        }
    }

    /// Add an id to the observation set. The first observation starts the
    /// shared ticker; observing an already observed id is a no-op.
    pub fn observe(&mut self, id: &str) {
        if !self.observed.insert(id.to_string()) {
            return;
        }
        if self.observed.len() == 1 {
            self.start();
        }
    }

    /// Remove an id from the observation set. Removing the last id stops the
    /// ticker; unobserving an unknown id is a no-op.
    pub fn unobserve(&mut self, id: &str) {
        if self.observed.remove(id) && self.observed.is_empty() {
            self.stop();
        }
    }

    pub fn is_observed(&self, id: &str) -> bool {
        self.observed.contains(id)
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Latest published instant; frozen while nothing is observed.
    pub fn now(&self) -> DateTime<Utc> {
        *self.now_rx.borrow()
    }

    /// Receiver that resolves once per tick, for tick-driven re-render.
    pub fn subscribe(&self) -> watch::Receiver<DateTime<Utc>> {
        self.now_rx.clone()
    }

    fn start(&mut self) {
        let tx = self.now_tx.clone();
        self.ticker = Some(tokio::spawn(async move {
            // First tick completes immediately so an observed row gets its
            // countdown without waiting out the first period.
            let mut tick = time::interval(TICK_PERIOD);
            loop {
                tick.tick().await;
                tx.send_replace(Utc::now());
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for ExpiryClock {
    fn drop(&mut self) {
        // Unconditional: the interval must not outlive its owner, whatever
        // the observation set holds at teardown.
        self.stop();
    }
}
