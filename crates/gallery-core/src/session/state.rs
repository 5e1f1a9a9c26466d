//! Published session state.

use crate::error::{ErrorKind, SessionError};
use crate::models::{ArtworkSummary, Mode, Scope};

/// Coarse lifecycle of a session, derived from [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing fetched yet for the current scope.
    Idle,
    Loading,
    Loaded { has_more: bool },
    Errored(ErrorKind),
}

/// Snapshot of a catalog session as observed by the UI.
///
/// `is_loading` is true for the whole span between issuing a fetch and
/// its resolution. Items keep fetch order and are not deduplicated across
/// pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub mode: Mode,
    /// Query of the scope currently loaded; empty while browsing.
    pub query: String,
    /// Latest raw search box text, applied after the debounce delay.
    pub search_text: String,
    pub items: Vec<ArtworkSummary>,
    /// 1-indexed.
    pub next_page_to_fetch: u32,
    pub has_more: bool,
    pub is_loading: bool,
    pub last_error: Option<SessionError>,
    /// Client-side year filter; empty means no filtering.
    pub year_filter: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            mode: Mode::Browsing,
            query: String::new(),
            search_text: String::new(),
            items: Vec::new(),
            next_page_to_fetch: 1,
            has_more: true,
            is_loading: false,
            last_error: None,
            year_filter: String::new(),
        }
    }
}

impl SessionState {
    pub fn scope(&self) -> Scope {
        match self.mode {
            Mode::Browsing => Scope::Browse,
            Mode::Searching => Scope::Search(self.query.clone()),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_loading {
            SessionPhase::Loading
        } else if let Some(err) = &self.last_error {
            SessionPhase::Errored(err.kind)
        } else if self.next_page_to_fetch == 1 {
            SessionPhase::Idle
        } else {
            SessionPhase::Loaded {
                has_more: self.has_more,
            }
        }
    }

    /// Items whose date text contains the year filter, or all items when
    /// no filter is set.
    pub fn filtered_items(&self) -> Vec<&ArtworkSummary> {
        if self.year_filter.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| item.matches_year(&self.year_filter))
            .collect()
    }

    /// Start over on page 1 of `scope`.
    pub(crate) fn reset_to(&mut self, scope: &Scope) {
        self.mode = scope.mode();
        self.query = scope.query().to_string();
        self.items.clear();
        self.next_page_to_fetch = 1;
        self.has_more = true;
        self.is_loading = false;
        self.last_error = None;
    }
}
