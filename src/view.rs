use chrono::{DateTime, Utc};
use tokio::sync::watch;
use url::Url;

use crate::clock::ExpiryClock;
use crate::lifecycle::{self, Lifecycle};
use crate::model::LinkRecord;
use crate::nav::{self, Dispatch};
use crate::page;
use crate::store::{FetchError, LinkSource, LinkStore};

/// Mutually exclusive terminal display states, computed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// First load in progress, nothing to show yet.
    Loading,
    /// Fetch failed and there is no previous collection to fall back on.
    Error,
    /// Fetch succeeded with zero records.
    Empty,
    Ready,
}

/// One visible table row.
#[derive(Debug, Clone)]
pub struct Row {
    /// 1-based position in the full sorted collection.
    pub index: usize,
    pub id: String,
    pub short_url: String,
    pub alias: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Live remaining-time label while observed; "-" otherwise. Permanent
    /// rows always show "-".
    pub countdown: String,
    /// False for expired rows: their link renders as inert text.
    pub activatable: bool,
}

/// Orchestrates fetch, sort, pagination and countdown observation for the
/// link-history surface.
pub struct LinkHistory<S> {
    store: LinkStore<S>,
    clock: ExpiryClock,
    origin: Url,
    page: usize,
    page_size: usize,
}

impl<S: LinkSource> LinkHistory<S> {
    pub fn new(source: S, origin: Url, page_size: usize) -> Self {
        Self {
            store: LinkStore::new(source),
            clock: ExpiryClock::new(),
            origin,
            page: 1,
            page_size,
        }
    }

    /// Fetch the collection. Used both for the initial load and the manual
    /// reload action; the store's loading/reloading flags tell the two
    /// apart. The current page is re-clamped after every round so a
    /// shrinking collection cannot leave the view past the last page.
    pub async fn refresh(&mut self) {
        self.store.refresh().await;
        self.page = page::clamp_page(self.page, self.store.len(), self.page_size);
        tracing::debug!(
            records = self.store.len(),
            page = self.page,
            "refresh settled"
        );
    }

    pub fn display_state(&self) -> DisplayState {
        if !self.store.loaded() {
            if self.store.error().is_some() && !self.store.loading() {
                DisplayState::Error
            } else {
                DisplayState::Loading
            }
        } else if self.store.is_empty() {
            DisplayState::Empty
        } else {
            DisplayState::Ready
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.store.error()
    }

    /// Error banner shown alongside data that is still being displayed
    /// (a refresh failed but the previous collection survives).
    pub fn inline_error(&self) -> Option<String> {
        if self.store.loaded() {
            self.store
                .error()
                .map(|e| format!("{e} (reload to try again)"))
        } else {
            None
        }
    }

    pub fn reloading(&self) -> bool {
        self.store.reloading()
    }

    // --- countdown observation -------------------------------------------

    pub fn observe(&mut self, id: &str) {
        self.clock.observe(id);
        tracing::debug!(id, ticking = self.clock.is_ticking(), "observe");
    }

    pub fn unobserve(&mut self, id: &str) {
        self.clock.unobserve(id);
        tracing::debug!(id, ticking = self.clock.is_ticking(), "unobserve");
    }

    /// Tick stream for re-rendering observed countdowns.
    pub fn ticks(&self) -> watch::Receiver<DateTime<Utc>> {
        self.clock.subscribe()
    }

    // --- pagination ------------------------------------------------------

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        page::total_pages(self.store.len(), self.page_size)
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn next_page(&mut self) {
        if self.can_next() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.can_prev() {
            self.page -= 1;
        }
    }

    // --- row projection --------------------------------------------------

    /// Project the visible slice. The remaining-time label is only computed
    /// for observed rows; everything else gets the static placeholder.
    pub fn rows(&self) -> Vec<Row> {
        let now = self.clock.now();
        let offset = (self.page - 1) * self.page_size;
        page::window(self.store.sorted(), self.page, self.page_size)
            .iter()
            .enumerate()
            .map(|(i, record)| self.project(record, offset + i + 1, now))
            .collect()
    }

    fn project(&self, record: &LinkRecord, index: usize, now: DateTime<Utc>) -> Row {
        // Label formatting runs only for observed rows; the rest settle for
        // the cheap state check and a static placeholder.
        let (state, countdown) = if record.expires_at.is_some() && self.clock.is_observed(&record.id)
        {
            let cd = lifecycle::classify(record.expires_at, now);
            (cd.state, cd.label)
        } else {
            (lifecycle::state_of(record.expires_at, now), "-".to_string())
        };
        Row {
            index,
            id: record.id.clone(),
            short_url: record.short_url.clone(),
            alias: record.alias.clone(),
            created_at: record.created_at,
            expires_at: record.expires_at,
            countdown,
            activatable: state != Lifecycle::Expired,
        }
    }

    // --- activation ------------------------------------------------------

    /// Decide how to navigate for a row activation. Expired and unknown
    /// rows are inert and return None.
    pub fn activate(&self, id: &str) -> Option<Dispatch> {
        let record = self.store.sorted().iter().find(|r| r.id == id)?;
        if lifecycle::state_of(record.expires_at, self.clock.now()) == Lifecycle::Expired {
            return None;
        }
        Some(nav::dispatch(&record.short_url, &self.origin))
    }
}
