//! Paginated, searchable catalog session.
//!
//! A [`CatalogSession`] owns the item list for one scope at a time, either
//! browsing or searching a term, and advances it one page per
//! [`CatalogSession::request_more`]. Changing scope starts over on page 1
//! and makes any in-flight response for the old scope stale; stale
//! responses are dropped on arrival rather than cancelled.

use super::debounce::Debouncer;
use super::state::SessionState;
use crate::config::{ApiConfig, GalleryConfig, SessionConfig};
use crate::error::SessionError;
use crate::models::{ArtworkSummary, Scope};
use crate::network::CatalogSource;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// What a call to [`CatalogSession::request_more`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No fetch issued: one is pending, the scope is exhausted, or the
    /// trigger did not apply.
    Skipped,
    /// A page was appended.
    Applied { appended: usize },
    /// The response arrived after the scope changed and was dropped.
    Discarded,
    /// The fetch failed; the error is also in `last_error`.
    Failed(SessionError),
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied { .. })
    }
}

struct SessionInner {
    state: SessionState,
    /// Bumped on every reset so responses from before it can be recognised.
    generation: u64,
    /// Last search term actually applied, used to skip repeats.
    applied_term: String,
}

/// Identifies the scope instance a fetch was issued for.
#[derive(Debug, Clone)]
struct FetchTicket {
    scope: Scope,
    page: u32,
    generation: u64,
}

/// Clears `is_loading` if a fetch future is dropped before it resolves.
struct InFlightGuard<'a, C: CatalogSource> {
    session: &'a CatalogSession<C>,
    generation: u64,
    armed: bool,
}

impl<C: CatalogSource> InFlightGuard<'_, C> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<C: CatalogSource> Drop for InFlightGuard<'_, C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.session.lock();
        if inner.generation == self.generation && inner.state.is_loading {
            debug!("Fetch abandoned before completion, clearing loading flag");
            inner.state.is_loading = false;
            self.session.publish(&inner);
        }
    }
}

/// Paginated view over a [`CatalogSource`].
///
/// Published state is observable through [`CatalogSession::subscribe`].
/// Search input goes through a debounce timer, so
/// [`CatalogSession::set_search_term`] needs the session behind an `Arc`
/// and a running tokio runtime.
pub struct CatalogSession<C: CatalogSource> {
    source: Arc<C>,
    page_size: u32,
    inner: Mutex<SessionInner>,
    state_tx: watch::Sender<SessionState>,
    search_debounce: Debouncer,
}

impl<C: CatalogSource> std::fmt::Debug for CatalogSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSession")
            .field("page_size", &self.page_size)
            .field("search_debounce", &self.search_debounce)
            .finish_non_exhaustive()
    }
}

impl<C: CatalogSource> CatalogSession<C> {
    /// Create a browsing session with the default debounce delay.
    pub fn new(source: Arc<C>, page_size: u32) -> Self {
        Self::with_search_debounce(source, page_size, SessionConfig::SEARCH_DEBOUNCE)
    }

    /// Create a browsing session with a custom debounce delay.
    ///
    /// A zero `page_size` falls back to the default page size.
    pub fn with_search_debounce(source: Arc<C>, page_size: u32, debounce: Duration) -> Self {
        let page_size = if page_size == 0 {
            ApiConfig::DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        let state = SessionState::default();
        let (state_tx, _) = watch::channel(state.clone());
        Self {
            source,
            page_size,
            inner: Mutex::new(SessionInner {
                state,
                generation: 0,
                applied_term: String::new(),
            }),
            state_tx,
            search_debounce: Debouncer::new(debounce),
        }
    }

    pub fn from_config(source: Arc<C>, config: &GalleryConfig) -> Self {
        Self::with_search_debounce(source, config.page_size, config.search_debounce)
    }

    /// Items requested per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &SessionInner) {
        self.state_tx.send_replace(inner.state.clone());
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Fetch the next page of the current scope.
    ///
    /// Does nothing while a fetch is pending or once the scope is
    /// exhausted. On failure the cursor stays where it was so calling
    /// again retries the same page.
    pub async fn request_more(&self) -> FetchOutcome {
        let ticket = {
            let mut inner = self.lock();
            if inner.state.is_loading || !inner.state.has_more {
                return FetchOutcome::Skipped;
            }
            inner.state.is_loading = true;
            let ticket = FetchTicket {
                scope: inner.state.scope(),
                page: inner.state.next_page_to_fetch,
                generation: inner.generation,
            };
            self.publish(&inner);
            ticket
        };

        info!("Fetching {} page {}", ticket.scope, ticket.page);
        let mut guard = InFlightGuard {
            session: self,
            generation: ticket.generation,
            armed: true,
        };
        let result = self
            .source
            .fetch_page(&ticket.scope, ticket.page, self.page_size)
            .await;
        guard.disarm();

        let mut inner = self.lock();
        if inner.generation != ticket.generation || inner.state.scope() != ticket.scope {
            debug!(
                "Dropping stale response for {} page {} (now {})",
                ticket.scope,
                ticket.page,
                inner.state.scope()
            );
            return FetchOutcome::Discarded;
        }

        inner.state.is_loading = false;
        let outcome = match result {
            Ok(page) => {
                let appended = page.items.len();
                inner.state.items.extend(page.items);
                inner.state.next_page_to_fetch += 1;
                inner.state.has_more = inner.state.next_page_to_fetch <= page.total_pages;
                inner.state.last_error = None;
                debug!(
                    "Applied {} items for {} page {} of {}",
                    appended, ticket.scope, ticket.page, page.total_pages
                );
                FetchOutcome::Applied { appended }
            }
            Err(err) => {
                warn!("Fetch for {} page {} failed: {}", ticket.scope, ticket.page, err);
                let err = SessionError::from(&err);
                inner.state.last_error = Some(err.clone());
                FetchOutcome::Failed(err)
            }
        };
        self.publish(&inner);
        outcome
    }

    /// Fetch more only when `item` is the last loaded item.
    pub async fn load_more_if_near(&self, item: &ArtworkSummary) -> FetchOutcome {
        let is_last = self
            .lock()
            .state
            .items
            .last()
            .is_some_and(|last| last.id == item.id);
        if !is_last {
            return FetchOutcome::Skipped;
        }
        self.request_more().await
    }

    /// Apply `term` now, bypassing the debounce delay.
    ///
    /// A term equal to the last applied one is ignored. An empty term
    /// switches back to browsing.
    pub async fn apply_search_term(&self, term: impl Into<String>) -> FetchOutcome {
        let term = term.into();
        {
            let mut inner = self.lock();
            if inner.applied_term == term {
                debug!("Search term '{}' unchanged, not refetching", term);
                return FetchOutcome::Skipped;
            }
            inner.applied_term = term.clone();
            inner.state.search_text = term.clone();
            self.reset(&mut inner, &Scope::from_term(&term));
        }
        self.request_more().await
    }

    /// Record search box input and apply it once typing pauses.
    ///
    /// Every call restarts the debounce timer. A fetch already issued for
    /// an earlier term keeps running and is discarded when it returns.
    pub fn set_search_term(self: &Arc<Self>, term: impl Into<String>)
    where
        C: 'static,
    {
        let term = term.into();
        {
            let mut inner = self.lock();
            inner.state.search_text = term.clone();
            self.publish(&inner);
        }

        let session = Arc::downgrade(self);
        self.search_debounce.schedule(async move {
            if let Some(session) = session.upgrade() {
                session.apply_search_term(term).await;
            }
        });
    }

    /// Drop everything and load browse page 1.
    ///
    /// Clears the search term and the year filter and cancels any pending
    /// debounced search. Allowed from any state, including mid-fetch.
    pub async fn refresh(&self) -> FetchOutcome {
        self.search_debounce.cancel();
        {
            let mut inner = self.lock();
            inner.applied_term.clear();
            inner.state.search_text.clear();
            inner.state.year_filter.clear();
            info!("Refreshing catalog from browse page 1");
            self.reset(&mut inner, &Scope::Browse);
        }
        self.request_more().await
    }

    fn reset(&self, inner: &mut SessionInner, scope: &Scope) {
        inner.generation += 1;
        inner.state.reset_to(scope);
        self.publish(inner);
    }

    /// Set the client-side year filter. Never triggers a fetch.
    pub fn set_year_filter(&self, year: impl Into<String>) {
        let mut inner = self.lock();
        inner.state.year_filter = year.into().trim().to_string();
        self.publish(&inner);
    }

    /// Loaded items passing the year filter, in fetch order.
    pub fn filtered_items(&self) -> Vec<ArtworkSummary> {
        self.lock()
            .state
            .filtered_items()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Whether a debounced search is waiting to fire.
    pub fn search_pending(&self) -> bool {
        self.search_debounce.is_pending()
    }
}
