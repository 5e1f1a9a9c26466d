//! Loads the full record for one artwork at a time.

use crate::error::SessionError;
use crate::models::ArtworkDetail;
use crate::network::CatalogSource;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Published state of a [`DetailLoader`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailState {
    /// Id most recently asked for.
    pub requested_id: Option<i64>,
    pub artwork: Option<ArtworkDetail>,
    pub is_loading: bool,
    pub last_error: Option<SessionError>,
}

/// Clears `is_loading` if a load future is dropped before it resolves.
struct LoadGuard<'a, C: CatalogSource> {
    loader: &'a DetailLoader<C>,
    id: i64,
    armed: bool,
}

impl<C: CatalogSource> LoadGuard<'_, C> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<C: CatalogSource> Drop for LoadGuard<'_, C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.loader.lock();
        if state.requested_id == Some(self.id) && state.is_loading {
            debug!("Detail load for artwork {} abandoned", self.id);
            state.is_loading = false;
            self.loader.state_tx.send_replace(state.clone());
        }
    }
}

/// Fetches artwork detail records, keeping only the latest request.
///
/// Asking for another id while a fetch is pending does not cancel it; its
/// response is dropped when it arrives.
pub struct DetailLoader<C: CatalogSource> {
    source: Arc<C>,
    state: Mutex<DetailState>,
    state_tx: watch::Sender<DetailState>,
}

impl<C: CatalogSource> DetailLoader<C> {
    pub fn new(source: Arc<C>) -> Self {
        let (state_tx, _) = watch::channel(DetailState::default());
        Self {
            source,
            state: Mutex::new(DetailState::default()),
            state_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, DetailState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> DetailState {
        self.lock().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state_tx.subscribe()
    }

    /// Load `id`, replacing whatever was shown before.
    ///
    /// Returns the record if it was applied.
    pub async fn load(&self, id: i64) -> Option<ArtworkDetail> {
        {
            let mut state = self.lock();
            state.requested_id = Some(id);
            state.artwork = None;
            state.is_loading = true;
            state.last_error = None;
            self.state_tx.send_replace(state.clone());
        }

        let mut guard = LoadGuard {
            loader: self,
            id,
            armed: true,
        };
        let result = self.source.fetch_detail(id).await;
        guard.disarm();

        let mut state = self.lock();
        if state.requested_id != Some(id) {
            debug!("Dropping detail for artwork {}, no longer requested", id);
            return None;
        }
        state.is_loading = false;
        let applied = match result {
            Ok(detail) => {
                state.artwork = Some(detail.clone());
                Some(detail)
            }
            Err(err) => {
                warn!("Failed to load artwork {}: {}", id, err);
                state.last_error = Some(SessionError::from(&err));
                None
            }
        };
        self.state_tx.send_replace(state.clone());
        applied
    }

    /// Forget the current record.
    pub fn clear(&self) {
        let mut state = self.lock();
        *state = DetailState::default();
        self.state_tx.send_replace(state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, GalleryError, Result};
    use crate::models::{ArtworkSummary, Page, Scope};
    use async_trait::async_trait;
    use std::time::Duration;

    /// Detail lookups where id 404 fails and ids over 100 are slow.
    struct DetailSource;

    #[async_trait]
    impl CatalogSource for DetailSource {
        async fn fetch_page(&self, _scope: &Scope, _page: u32, _page_size: u32) -> Result<Page> {
            Err(GalleryError::Validation {
                field: "scope".into(),
                message: "not served here".into(),
            })
        }

        async fn fetch_detail(&self, id: i64) -> Result<ArtworkDetail> {
            if id > 100 {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            if id == 404 {
                return Err(GalleryError::Network {
                    message: "not found".into(),
                    status: Some(404),
                    cause: None,
                });
            }
            Ok(ArtworkDetail::from_summary(ArtworkSummary::new(
                id,
                format!("Artwork {}", id),
            )))
        }
    }

    #[tokio::test]
    async fn test_load_applies_detail() {
        let loader = DetailLoader::new(Arc::new(DetailSource));
        let detail = loader.load(7).await.unwrap();
        assert_eq!(detail.id(), 7);

        let state = loader.state();
        assert_eq!(state.requested_id, Some(7));
        assert_eq!(state.artwork.map(|a| a.id()), Some(7));
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_recorded() {
        let loader = DetailLoader::new(Arc::new(DetailSource));
        assert!(loader.load(404).await.is_none());

        let state = loader.state();
        assert!(state.artwork.is_none());
        assert_eq!(state.last_error.map(|e| e.kind), Some(ErrorKind::Network));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_request_dropped() {
        let loader = Arc::new(DetailLoader::new(Arc::new(DetailSource)));

        let slow = tokio::spawn({
            let loader = Arc::clone(&loader);
            async move { loader.load(500).await }
        });
        tokio::task::yield_now().await;

        assert!(loader.load(3).await.is_some());
        assert!(slow.await.unwrap().is_none());
        assert_eq!(loader.state().artwork.map(|a| a.id()), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_load_clears_loading() {
        let loader = DetailLoader::new(Arc::new(DetailSource));

        let timed_out = tokio::time::timeout(Duration::from_millis(10), loader.load(500)).await;
        assert!(timed_out.is_err());

        let state = loader.state();
        assert_eq!(state.requested_id, Some(500));
        assert!(!state.is_loading);
        assert!(state.artwork.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let loader = DetailLoader::new(Arc::new(DetailSource));
        loader.load(1).await;
        loader.clear();
        assert_eq!(loader.state(), DetailState::default());
    }
}
