//! The time-boxed bidirectional timeline walk.
//!
//! The remote serves the device timeline in fixed 7-day slices and
//! links adjacent pages through opaque cursors. Those cursor chains
//! are unbounded, so the walk decodes each link's embedded window and
//! stops once it falls strictly outside the requested range.

use chrono::TimeDelta;
use mdt_core::cursor::{self, PARAM_FROM_DATE, PARAM_TO_DATE};
use mdt_core::{CursorError, MachineId, TimeWindow, timestamp};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::Error;
use crate::client::Client;

/// Feature flags pinned on the initial request, matching what the
/// portal's own UI sends.
const FIXED_QUERY_FLAGS: [(&str, &str); 6] = [
    ("generateIdentityEvents", "true"),
    ("includeIdentityEvents", "true"),
    ("supportMdiOnlyEvents", "true"),
    ("includeSentinelEvents", "false"),
    ("doNotUseCache", "false"),
    ("forceUseCache", "false"),
];

/// Page-size hint on the initial request.
const PAGE_SIZE: &str = "1000";

/// A live stream of timeline events.
///
/// Events arrive in discovery order: the initial page first, then the
/// backward pages, then the forward pages, each page in response
/// order. An `Err` item is terminal; it arrives after every event
/// fetched before the failure and the stream closes right after it.
/// Dropping the stream stops the walk at its next emission.
pub struct TimelineStream {
    rx: mpsc::Receiver<Result<Value, Error>>,
}

impl TimelineStream {
    /// Waits for the next event; `None` once the walk is over.
    pub async fn next(&mut self) -> Option<Result<Value, Error>> {
        self.rx.recv().await
    }
}

impl Client {
    /// Streams every event overlapping `window` for one device.
    ///
    /// The initial request covers the window's first seven days, the
    /// most the remote serves at once; pagination cursors cover the
    /// rest, walking backward from the initial page and then forward.
    /// The producer runs on its own task and stays at most one item
    /// ahead of the consumer.
    ///
    /// Cancelling `cancel` stops the walk at the next page boundary
    /// and closes the stream cleanly; an in-flight request is left to
    /// finish on its own.
    ///
    /// Must be called within a tokio runtime.
    pub fn timeline(
        &self,
        cancel: CancellationToken,
        window: TimeWindow,
        machine: &MachineId,
    ) -> TimelineStream {
        let (tx, rx) = mpsc::channel(1);
        let client = self.clone();
        let machine = machine.clone();
        tokio::spawn(async move {
            if let Err(err) = client.walk(&cancel, window, &machine, &tx).await {
                // Failed delivery means the consumer is gone.
                let _ = tx.send(Err(err)).await;
            }
        });
        TimelineStream { rx }
    }

    async fn walk(
        &self,
        cancel: &CancellationToken,
        window: TimeWindow,
        machine: &MachineId,
        tx: &mpsc::Sender<Result<Value, Error>>,
    ) -> Result<(), Error> {
        if cancel.is_cancelled() {
            return Ok(());
        }

        let page = self
            .fetch_page(&self.initial_page_url(window, machine)?)
            .await?;
        if !emit(tx, page.items).await {
            return Ok(());
        }
        ensure_complete(page.partial_response_reasons)?;
        let (mut prev, mut next) = (page.prev, page.next);

        // Walk backward through earlier pages
        while let Some(link) = prev {
            if cancel.is_cancelled() {
                return Ok(());
            }
            let range = cursor::decode(&link)?;
            if range.to < window.from {
                break;
            }
            let page = self.fetch_page(&self.cursor_url(&link)?).await?;
            if !emit(tx, page.items).await {
                return Ok(());
            }
            ensure_complete(page.partial_response_reasons)?;
            prev = page.prev;
        }

        // Walk forward through later pages
        while let Some(link) = next {
            if cancel.is_cancelled() {
                return Ok(());
            }
            let range = cursor::decode(&link)?;
            if range.from > window.to {
                break;
            }
            let page = self.fetch_page(&self.cursor_url(&link)?).await?;
            if !emit(tx, page.items).await {
                return Ok(());
            }
            ensure_complete(page.partial_response_reasons)?;
            next = page.next;
        }

        Ok(())
    }

    fn initial_page_url(&self, window: TimeWindow, machine: &MachineId) -> Result<Url, Error> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::BaseUrl {
                reason: "URL cannot serve as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(["machines", machine.as_str(), "events"]);

        // The first slice is capped at the remote's 7-day maximum;
        // anything further is reached through cursors.
        let first_to = window
            .from
            .checked_add_signed(TimeDelta::days(7))
            .map_or(window.to, |end| end.min(window.to));

        url.query_pairs_mut()
            .append_pair(PARAM_FROM_DATE, &timestamp::format(window.from))
            .append_pair(PARAM_TO_DATE, &timestamp::format(first_to))
            .extend_pairs(FIXED_QUERY_FLAGS)
            .append_pair("pageSize", PAGE_SIZE);
        Ok(url)
    }

    /// Pagination links arrive as absolute paths carrying their own
    /// query; they are replayed verbatim onto the base prefix.
    fn cursor_url(&self, cursor: &str) -> Result<Url, Error> {
        Url::parse(&format!("{}{cursor}", self.base))
            .map_err(|err| Error::Cursor(CursorError::Malformed(err)))
    }
}

/// Hands items to the consumer one at a time. A closed channel means
/// the consumer dropped the stream; the walk stops quietly.
async fn emit(tx: &mpsc::Sender<Result<Value, Error>>, items: Vec<Value>) -> bool {
    for item in items {
        if tx.send(Ok(item)).await.is_err() {
            return false;
        }
    }
    true
}

/// A page declaring partial-failure reasons ends the walk; its items
/// were already delivered.
fn ensure_complete(reasons: Vec<Value>) -> Result<(), Error> {
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(Error::PartialData(reasons))
    }
}
