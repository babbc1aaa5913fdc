// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typeahead search box controller with request coalescing.
//!
//! At most one completion request is outstanding at a time. Query edits that
//! arrive while a request is in flight are dropped, not queued; the in-flight
//! request is never aborted. The response is applied without a staleness
//! check against the current query, so a burst of edits can briefly show
//! choices for an older query.
//!
//! Controllers must run inside a tokio runtime; requests are spawned as
//! tasks and folded back in by [`SearchBox::resolve`].

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::{CompleteResponse, Hit, ListingClient};
use crate::errors::ClientError;
use crate::links;

/// Default number of completion hits requested per query.
pub const DEFAULT_COMPLETE_LIMIT: usize = 8;

/// A projected completion hit, ready for display and navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// Position in response order.
    pub index: usize,
    pub display: String,
    /// Project name joined with the in-project path.
    pub path: String,
    pub url: String,
}

impl Choice {
    fn project(index: usize, hit: &Hit) -> Self {
        Self {
            index,
            display: hit.query_hint.clone(),
            path: format!("{}{}", hit.project, hit.path),
            url: links::source_at(hit.jump_target.file_id, hit.jump_target.span.from.line),
        }
    }
}

/// Where the search box is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    /// The last request failed; a later edit may retry.
    Failed,
}

/// Controller for the typeahead input.
pub struct SearchBox<C> {
    client: Arc<C>,
    limit: usize,
    query: String,
    choices: Vec<Choice>,
    selection: isize,
    visible: bool,
    phase: SearchPhase,
    last_error: Option<String>,
    in_flight: Option<JoinHandle<Result<CompleteResponse, ClientError>>>,
}

impl<C: ListingClient + 'static> SearchBox<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            limit: DEFAULT_COMPLETE_LIMIT,
            query: String::new(),
            choices: Vec::new(),
            selection: -1,
            visible: true,
            phase: SearchPhase::Idle,
            last_error: None,
            in_flight: None,
        }
    }

    /// Override the per-query hit limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Record a query edit and, when no request is outstanding, start one.
    ///
    /// Edits made while a request is in flight are dropped. An empty query
    /// never issues a request and leaves prior choices visible.
    pub fn on_query_changed(&mut self, query: impl Into<String>) {
        self.query = query.into();
        if self.loading() {
            debug!(query = %self.query, "completion in flight, dropping edit");
            return;
        }
        if self.query.is_empty() {
            return;
        }
        self.phase = SearchPhase::Loading;
        self.last_error = None;
        let client = Arc::clone(&self.client);
        let query = self.query.clone();
        let limit = self.limit;
        debug!(query = %query, limit, "issuing completion request");
        self.in_flight = Some(tokio::spawn(
            async move { client.complete(&query, limit).await },
        ));
    }

    /// Await the outstanding completion, if any, and fold it into the state.
    ///
    /// A failed request lands in [`SearchPhase::Failed`] with the error
    /// retained, and clears the in-flight slot so the next edit can retry.
    pub async fn resolve(&mut self) {
        let Some(handle) = self.in_flight.take() else {
            return;
        };
        match handle.await {
            Ok(Ok(resp)) => self.apply(resp),
            Ok(Err(err)) => {
                warn!(error = %err, "completion request failed");
                self.phase = SearchPhase::Failed;
                self.last_error = Some(err.to_string());
            }
            Err(join_err) => {
                warn!(error = %join_err, "completion task aborted");
                self.phase = SearchPhase::Failed;
                self.last_error = Some(join_err.to_string());
            }
        }
    }

    fn apply(&mut self, resp: CompleteResponse) {
        self.choices = resp
            .hits
            .iter()
            .enumerate()
            .map(|(index, hit)| Choice::project(index, hit))
            .collect();
        // A shrunken list resets the selection to the first choice, never to
        // -1, even when the list is empty.
        if self.selection >= self.choices.len() as isize {
            self.selection = 0;
        }
        self.phase = SearchPhase::Idle;
    }

    /// Move the selection up one choice; `-1` (nothing selected) is allowed.
    pub fn move_selection_up(&mut self) {
        if self.selection >= 0 {
            self.selection -= 1;
        }
    }

    /// Move the selection down one choice, stopping at the last.
    pub fn move_selection_down(&mut self) {
        if self.selection + 1 < self.choices.len() as isize {
            self.selection += 1;
        }
    }

    /// URL to navigate to on confirm: the selected choice when one is
    /// selected and the choice list is visible, otherwise a literal
    /// full-text search for the raw query.
    pub fn activation_url(&self) -> String {
        let selected = usize::try_from(self.selection)
            .ok()
            .and_then(|index| self.choices.get(index));
        match selected {
            Some(choice) if self.visible => choice.url.clone(),
            _ => links::full_text_search(&self.query),
        }
    }

    /// Keyboard confirm must not act on a hidden or blurred choice list.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn selection(&self) -> isize {
        self.selection
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
