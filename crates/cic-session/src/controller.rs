//! The search session controller.

use std::sync::Arc;

use cic_gateway::{CancelHandle, CancelSignal, GenerationBackend, SearchError, SearchGateway};
use tokio::sync::watch;

use crate::state::{SessionPhase, SessionState};
use crate::view::SessionView;

/// How a submitted search ended, from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results were applied; the count may be zero.
    Completed(usize),
    /// The failure message was applied.
    Failed(String),
    /// A newer submission replaced this one; state was left untouched.
    Superseded,
    /// The query was blank and nothing was submitted.
    Ignored,
}

/// Owns the state of one search session and dispatches queries to the gateway.
///
/// At most one search is active: [`SearchSession::begin`] cancels the previous
/// in-flight search, and an outcome is applied only if no newer submission
/// happened in the meantime.
pub struct SearchSession<B> {
    gateway: Arc<SearchGateway<B>>,
    state: Arc<watch::Sender<SessionState>>,
    inflight: Option<CancelHandle>,
}

impl<B: GenerationBackend> SearchSession<B> {
    #[must_use]
    pub fn new(gateway: SearchGateway<B>) -> Self {
        Self::with_shared_gateway(Arc::new(gateway))
    }

    /// Start a session over a gateway shared with other sessions.
    #[must_use]
    pub fn with_shared_gateway(gateway: Arc<SearchGateway<B>>) -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self {
            gateway,
            state: Arc::new(tx),
            inflight: None,
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receive every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView::project(&self.state.borrow(), self.fallback_query())
    }

    /// Query suggested when a search comes back empty.
    #[must_use]
    pub fn fallback_query(&self) -> &str {
        &self.gateway.search_config().fallback_query
    }

    /// Enter [`SessionPhase::Searching`] for `query`.
    ///
    /// Cancels any in-flight search and clears previous results and error
    /// before returning. Returns `None` for a blank query.
    pub fn begin(&mut self, query: &str) -> Option<PendingSearch<B>> {
        if query.trim().is_empty() {
            tracing::debug!("ignoring blank query");
            return None;
        }

        if let Some(previous) = self.inflight.take() {
            previous.cancel();
        }
        let handle = CancelHandle::new();
        let cancel = handle.signal();
        self.inflight = Some(handle);

        let mut generation = 0;
        self.state.send_modify(|state| {
            debug_assert!(state.phase.can_transition_to(SessionPhase::Searching));
            state.generation += 1;
            generation = state.generation;
            state.phase = SessionPhase::Searching;
            state.query = Some(query.to_string());
            state.entries.clear();
            state.error = None;
        });
        tracing::debug!(generation, "search submitted");

        Some(PendingSearch {
            gateway: Arc::clone(&self.gateway),
            state: Arc::clone(&self.state),
            query: query.to_string(),
            generation,
            cancel,
        })
    }

    /// Submit `query` and wait for its outcome.
    pub async fn search(&mut self, query: &str) -> SearchOutcome {
        match self.begin(query) {
            Some(pending) => pending.resolve().await,
            None => SearchOutcome::Ignored,
        }
    }

    /// Submit the fallback query offered by the empty state.
    pub async fn retry_with_fallback(&mut self) -> SearchOutcome {
        let query = self.fallback_query().to_string();
        self.search(&query).await
    }
}

/// A submitted search whose outcome has not been applied yet.
#[must_use = "a pending search does nothing until resolved"]
pub struct PendingSearch<B> {
    gateway: Arc<SearchGateway<B>>,
    state: Arc<watch::Sender<SessionState>>,
    query: String,
    generation: u64,
    cancel: CancelSignal,
}

impl<B: GenerationBackend> PendingSearch<B> {
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the gateway call and apply its outcome if this search is still current.
    pub async fn resolve(self) -> SearchOutcome {
        let result = self
            .gateway
            .search_with_cancel(&self.query, &self.cancel)
            .await;

        let generation = self.generation;
        let mut outcome = SearchOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            match result {
                Ok(entries) => {
                    outcome = SearchOutcome::Completed(entries.len());
                    state.phase = SessionPhase::Success;
                    state.entries = entries;
                }
                Err(SearchError::Cancelled) => return false,
                Err(error) => {
                    tracing::warn!(%error, generation, "search failed");
                    let message = error.user_message();
                    outcome = SearchOutcome::Failed(message.clone());
                    state.phase = SessionPhase::Failed;
                    state.error = Some(message);
                }
            }
            true
        });

        if outcome == SearchOutcome::Superseded {
            tracing::debug!(generation, "discarding outcome of superseded search");
        }
        outcome
    }
}
