use std::sync::Arc;
use std::time::Duration;

use common::logger::warn_if_slow;
use session::Session;
use tracing::{debug, instrument, warn};

use crate::errors::StoreError;
use crate::model::{Bookmark, BookmarkDraft, BookmarkId};
use crate::repository::BookmarkRepository;

/// Controller-facing bookmark client.
///
/// Validates input before anything reaches the repository and folds
/// repository failures into `StoreError::Fetch` / `StoreError::Write`.
#[derive(Clone)]
pub struct BookmarkStore {
    repo: Arc<dyn BookmarkRepository>,
}

impl BookmarkStore {
    pub fn new(repo: Arc<dyn BookmarkRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip_all, target = "store", fields(user_id = %session.user_id()))]
    pub async fn list(&self, session: &Session) -> Result<Vec<Bookmark>, StoreError> {
        let mut rows = warn_if_slow("bookmarks_list", Duration::from_millis(200), async {
            self.repo.list_for_owner(session).await
        })
        .await
        .map_err(|e| {
            warn!(error = %format!("{e:#}"), "bookmark listing failed");
            StoreError::Fetch(format!("{e:#}"))
        })?;

        // Newest first, whatever order the backend answered in.
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!(count = rows.len(), "bookmarks listed");
        Ok(rows)
    }

    /// Validates and inserts. Nothing is returned; callers re-fetch to see
    /// the authoritative row.
    #[instrument(skip_all, target = "store", fields(user_id = %session.user_id()))]
    pub async fn create(&self, session: &Session, title: &str, url: &str) -> Result<(), StoreError> {
        let new = BookmarkDraft::parse(title, url)?.owned_by(session.user_id().clone());

        warn_if_slow("bookmarks_insert", Duration::from_millis(200), async {
            self.repo.insert(session, &new).await
        })
        .await
        .map_err(|e| {
            warn!(error = %format!("{e:#}"), "bookmark insert failed");
            StoreError::Write(format!("{e:#}"))
        })?;

        debug!("bookmark created");
        Ok(())
    }

    #[instrument(skip_all, target = "store", fields(user_id = %session.user_id(), bookmark_id = %id))]
    pub async fn delete(&self, session: &Session, id: &BookmarkId) -> Result<(), StoreError> {
        warn_if_slow("bookmarks_delete", Duration::from_millis(200), async {
            self.repo.delete(session, id).await
        })
        .await
        .map_err(|e| {
            warn!(error = %format!("{e:#}"), "bookmark delete failed");
            StoreError::Write(format!("{e:#}"))
        })?;

        debug!("bookmark deleted");
        Ok(())
    }
}
