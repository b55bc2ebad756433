//! Query fan-out and the view state it drives.
//!
//! A search sends one query to the fact-check and news proxies at once. The
//! two calls are awaited together on the caller's task but settle
//! independently: each outcome is written into the view as soon as it
//! arrives, and a failure on one never touches the other.
//!
//! # View states
//!
//! ```text
//! Idle ──search──▶ Searching ──both settled──▶ Searched
//!   ▲                                            │
//!   └──────────────── clear ◀────────────────────┘
//! any ──headlines──▶ LoadingHeadlines ──▶ Headlines
//! ```
//!
//! Search results and headlines are never shown together: starting either
//! one replaces the other.
//!
//! # Stale responses
//!
//! Every search, headlines fetch, and clear takes a new generation number.
//! A response is only applied if its generation is still current, so a slow
//! answer to an old query cannot overwrite a newer one.

use futures::future::join;
use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

use crate::client::VerifierBackend;
use crate::error::FetchError;
use crate::models::{Article, FactCheck};

/// One result set plus the error of the call that last tried to refresh it.
///
/// On failure `items` keeps whatever the set held before the call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultStream<T> {
    pub items: Vec<T>,
    pub error: Option<String>,
}

impl<T> Default for ResultStream<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            error: None,
        }
    }
}

impl<T> ResultStream<T> {
    fn settle(prior: Vec<T>, outcome: Result<Vec<T>, FetchError>) -> Self {
        match outcome {
            Ok(items) => Self { items, error: None },
            Err(e) => Self {
                items: prior,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A stream of a search that is still in flight, or has settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Pending { prior: Vec<T> },
    Settled(ResultStream<T>),
}

impl<T> Slot<T> {
    /// Items currently on display for this stream.
    pub fn items(&self) -> &[T] {
        match self {
            Slot::Pending { prior } => prior,
            Slot::Settled(stream) => &stream.items,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Slot::Settled(stream) if stream.is_error())
    }

    fn settle(&mut self, outcome: Result<Vec<T>, FetchError>) {
        if let Slot::Pending { prior } = self {
            let prior = mem::take(prior);
            *self = Slot::Settled(ResultStream::settle(prior, outcome));
        }
    }

    fn into_stream(self) -> ResultStream<T> {
        match self {
            Slot::Pending { prior } => ResultStream {
                items: prior,
                error: None,
            },
            Slot::Settled(stream) => stream,
        }
    }
}

/// A search whose calls have not all settled yet.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchProgress {
    pub query: String,
    pub facts: Slot<FactCheck>,
    pub news: Slot<Article>,
}

impl SearchProgress {
    fn is_complete(&self) -> bool {
        matches!(
            (&self.facts, &self.news),
            (Slot::Settled(_), Slot::Settled(_))
        )
    }

    fn finish(self) -> SearchResults {
        SearchResults {
            query: self.query,
            facts: self.facts.into_stream(),
            news: self.news.into_stream(),
        }
    }
}

/// A settled search: both streams have an outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub facts: ResultStream<FactCheck>,
    pub news: ResultStream<Article>,
}

/// Everything the presentation needs to draw the page.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    /// Nothing searched, nothing loaded.
    #[default]
    Idle,
    Searching(SearchProgress),
    Searched(SearchResults),
    LoadingHeadlines { prior: Vec<Article> },
    Headlines(ResultStream<Article>),
}

impl View {
    /// Items each search stream holds right now, consumed out of the view.
    fn take_search_items(&mut self) -> (Vec<FactCheck>, Vec<Article>) {
        match mem::take(self) {
            View::Searching(progress) => {
                let facts = progress.facts.into_stream().items;
                let news = progress.news.into_stream().items;
                (facts, news)
            }
            View::Searched(results) => (results.facts.items, results.news.items),
            _ => (Vec::new(), Vec::new()),
        }
    }
}

/// The four booleans the page keys its markup on, derived from [`View`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    pub is_searched: bool,
    pub is_loading: bool,
    pub is_error_facts: bool,
    pub is_error_news: bool,
}

#[derive(Debug, Default)]
struct Session {
    query: String,
    view: View,
    generation: u64,
}

impl Session {
    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

/// Owns the query buffer and the view, and runs searches against a backend.
///
/// All state sits behind one mutex that is never held across an `.await`.
#[derive(Debug)]
pub struct Orchestrator<B> {
    backend: B,
    session: Mutex<Session>,
}

impl<B: VerifierBackend> Orchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: Mutex::new(Session::default()),
        }
    }

    /// Start with a prefilled query, as when the page is opened with `?search=`.
    pub fn with_initial_query(backend: B, query: impl Into<String>) -> Self {
        let orchestrator = Self::new(backend);
        orchestrator.session().query = query.into();
        orchestrator
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the prefilled query, if there is one.
    pub async fn start(&self) {
        if !self.query().is_empty() {
            self.submit().await;
        }
    }

    /// Replace the query buffer (one call per keystroke).
    pub fn set_query(&self, query: impl Into<String>) {
        self.session().query = query.into();
    }

    pub fn query(&self) -> String {
        self.session().query.clone()
    }

    /// Search for whatever is in the query buffer.
    pub async fn submit(&self) {
        let query = self.query();
        self.search(&query).await;
    }

    /// Query both providers and record each outcome as it settles.
    ///
    /// # Arguments
    ///
    /// * `query` - Text to search for; only `""` counts as empty
    ///
    /// # Returns
    ///
    /// Nothing. The outcome lands in [`View::Searched`] once both calls have
    /// settled, and is dropped if a later `search`, `headlines` or `clear`
    /// started meanwhile.
    ///
    /// # Errors
    ///
    /// Failures never propagate. Each stream records its own error and keeps
    /// the items it held before the call. An empty query fails both streams
    /// at once without any network call.
    #[instrument(level = "info", skip(self))]
    pub async fn search(&self, query: &str) {
        let generation = {
            let mut session = self.session();
            let generation = session.next_generation();
            let (facts, news) = session.view.take_search_items();

            if query.is_empty() {
                warn!(generation, "Empty query; marking both streams failed");
                session.view = View::Searched(SearchResults {
                    query: String::new(),
                    facts: ResultStream::settle(facts, Err(FetchError::EmptyQuery)),
                    news: ResultStream::settle(news, Err(FetchError::EmptyQuery)),
                });
                return;
            }

            session.view = View::Searching(SearchProgress {
                query: query.to_string(),
                facts: Slot::Pending { prior: facts },
                news: Slot::Pending { prior: news },
            });
            generation
        };
        info!(generation, "Search started");

        let facts = async {
            let outcome = self.backend.fact_checks(query).await;
            if let Err(e) = &outcome {
                warn!(generation, error = %e, "Fact-check call failed");
            }
            self.settle_search(generation, |progress| progress.facts.settle(outcome));
        };
        let news = async {
            let outcome = self.backend.news(query).await;
            if let Err(e) = &outcome {
                warn!(generation, error = %e, "News call failed");
            }
            self.settle_search(generation, |progress| progress.news.settle(outcome));
        };
        join(facts, news).await;
    }

    fn settle_search(&self, generation: u64, apply: impl FnOnce(&mut SearchProgress)) {
        let mut session = self.session();
        if session.generation != generation {
            debug!(generation, current = session.generation, "Discarding stale search result");
            return;
        }
        let View::Searching(progress) = &mut session.view else {
            return;
        };
        apply(progress);
        if progress.is_complete() {
            if let View::Searching(progress) = mem::take(&mut session.view) {
                info!(generation, "Search settled");
                session.view = View::Searched(progress.finish());
            }
        }
    }

    /// Switch to the latest headlines, dropping any search results.
    #[instrument(level = "info", skip(self))]
    pub async fn headlines(&self) {
        let generation = {
            let mut session = self.session();
            let generation = session.next_generation();
            let prior = match mem::take(&mut session.view) {
                View::Headlines(stream) => stream.items,
                View::LoadingHeadlines { prior } => prior,
                _ => Vec::new(),
            };
            session.view = View::LoadingHeadlines { prior };
            generation
        };

        let outcome = self.backend.headlines().await;
        if let Err(e) = &outcome {
            warn!(generation, error = %e, "Headlines call failed");
        }

        let mut session = self.session();
        if session.generation != generation {
            debug!(generation, current = session.generation, "Discarding stale headlines");
            return;
        }
        if let View::LoadingHeadlines { prior } = mem::take(&mut session.view) {
            session.view = View::Headlines(ResultStream::settle(prior, outcome));
        }
    }

    /// Back to the initial state; anything still in flight is ignored.
    pub fn clear(&self) {
        let mut session = self.session();
        session.next_generation();
        session.query.clear();
        session.view = View::Idle;
    }

    /// A copy of the current view.
    pub fn view(&self) -> View {
        self.session().view.clone()
    }

    pub fn flags(&self) -> Flags {
        match &self.session().view {
            View::Idle | View::Headlines(_) => Flags::default(),
            View::LoadingHeadlines { .. } => Flags {
                is_loading: true,
                ..Flags::default()
            },
            View::Searching(progress) => Flags {
                is_searched: false,
                is_loading: true,
                is_error_facts: progress.facts.is_error(),
                is_error_news: progress.news.is_error(),
            },
            View::Searched(results) => Flags {
                is_searched: true,
                is_loading: false,
                is_error_facts: results.facts.is_error(),
                is_error_news: results.news.is_error(),
            },
        }
    }

    /// Fact checks on display.
    pub fn fact_checks(&self) -> Vec<FactCheck> {
        match &self.session().view {
            View::Searching(progress) => progress.facts.items().to_vec(),
            View::Searched(results) => results.facts.items.clone(),
            _ => Vec::new(),
        }
    }

    /// News articles for the current search on display.
    pub fn articles(&self) -> Vec<Article> {
        match &self.session().view {
            View::Searching(progress) => progress.news.items().to_vec(),
            View::Searched(results) => results.news.items.clone(),
            _ => Vec::new(),
        }
    }

    /// Headlines on display.
    pub fn latest(&self) -> Vec<Article> {
        match &self.session().view {
            View::Headlines(stream) => stream.items.clone(),
            View::LoadingHeadlines { prior } => prior.clone(),
            _ => Vec::new(),
        }
    }
}
