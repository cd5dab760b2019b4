use std::cmp::Reverse;

use chrono::DateTime;
use thiserror::Error;
use url::Url;

use crate::model::{LinkRecord, ListPayload};

/// Fetch failure, captured as store state rather than thrown past the
/// boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Request(e.to_string())
    }
}

/// Seam to the external list endpoint.
pub trait LinkSource {
    async fn fetch(&self) -> Result<Vec<LinkRecord>, FetchError>;
}

/// Production source: HTTP GET against the list endpoint.
pub struct HttpSource {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpSource {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

impl LinkSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<LinkRecord>, FetchError> {
        let resp = self.client.get(self.endpoint.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }
        let body = resp.bytes().await?;
        let payload: ListPayload =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(payload.into_records())
    }
}

/// Handle for one refresh round; commits are accepted only from the latest
/// ticket, so a stale, slower response can never overwrite a newer one.
#[derive(Debug, Clone, Copy)]
pub struct RefreshTicket {
    generation: u64,
}

/// In-memory collection of link records. Readers never observe a partial
/// collection: a refresh replaces it wholesale on success and leaves it
/// untouched on failure.
pub struct LinkStore<S> {
    source: S,
    links: Vec<LinkRecord>,
    error: Option<FetchError>,
    generation: u64,
    in_flight: Option<u64>,
    loaded_once: bool,
}

impl<S: LinkSource> LinkStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            links: Vec::new(),
            error: None,
            generation: 0,
            in_flight: None,
            loaded_once: false,
        }
    }

    /// Start a refresh round. Bumps the request generation; any round begun
    /// earlier becomes stale from this point on.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        RefreshTicket {
            generation: self.generation,
        }
    }

    /// Apply a fetch result. Returns false (and changes nothing) when the
    /// ticket is not from the latest round.
    pub fn commit(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<LinkRecord>, FetchError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "dropping stale refresh result"
            );
            return false;
        }
        self.in_flight = None;
        match result {
            Ok(mut links) => {
                // Stable sort: same-timestamp records keep their fetch order
                // across refreshes. Missing created_at sorts as oldest.
                links.sort_by_key(|r| Reverse(r.created_at.unwrap_or(DateTime::UNIX_EPOCH)));
                self.links = links;
                self.error = None;
                self.loaded_once = true;
            }
            Err(e) => {
                tracing::error!("refresh failed: {e}");
                self.error = Some(e);
            }
        }
        true
    }

    pub async fn refresh(&mut self) {
        let ticket = self.begin_refresh();
        let result = self.source.fetch().await;
        self.commit(ticket, result);
    }

    /// Collection ordered by created_at descending.
    pub fn sorted(&self) -> &[LinkRecord] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Initial load in flight (nothing fetched successfully yet).
    pub fn loading(&self) -> bool {
        self.in_flight.is_some() && !self.loaded_once
    }

    /// Background refresh in flight while data is already shown.
    pub fn reloading(&self) -> bool {
        self.in_flight.is_some() && self.loaded_once
    }

    pub fn loaded(&self) -> bool {
        self.loaded_once
    }
}
