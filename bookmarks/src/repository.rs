use anyhow::Result;
use async_trait::async_trait;
use session::Session;

use crate::model::{Bookmark, BookmarkId, NewBookmark};

/// Persistence boundary for the `bookmarks` collection.
///
/// Every operation is scoped to the owner of `session`. Implementations
/// enforce that scoping themselves; callers are not the authorization
/// boundary.
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Rows owned by the session's user, newest first.
    async fn list_for_owner(&self, session: &Session) -> Result<Vec<Bookmark>>;

    async fn insert(&self, session: &Session, bookmark: &NewBookmark) -> Result<()>;

    /// Deleting an id that does not exist (or belongs to someone else) is a no-op.
    async fn delete(&self, session: &Session, id: &BookmarkId) -> Result<()>;
}
