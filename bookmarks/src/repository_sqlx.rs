use anyhow::{Context, anyhow, bail};
use async_trait::async_trait;
use parking_lot::Mutex;
use session::{Session, UserId};
use sqlx::{AnyPool, Row};
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::model::{Bookmark, BookmarkId, NewBookmark};
use crate::repository::BookmarkRepository;

// `$N` placeholders: accepted by both the Postgres and the SQLite driver.
const SELECT_OWNED: &str = r#"
SELECT id, user_id, title, url, created_at_ms
FROM bookmarks
WHERE user_id = $1
ORDER BY created_at_ms DESC;
"#;

const INSERT: &str = r#"
INSERT INTO bookmarks (id, user_id, title, url, created_at_ms)
VALUES ($1, $2, $3, $4, $5);
"#;

const DELETE_OWNED: &str = "DELETE FROM bookmarks WHERE id = $1 AND user_id = $2;";

/// SQLx-backed implementation of BookmarkRepository for self-hosted setups.
///
/// There is no row-level policy in front of this store, so every statement
/// carries the owner predicate itself.
pub struct SqlxBookmarkRepository {
    pool: AnyPool,
    last_created_ms: Mutex<i64>,
}

impl SqlxBookmarkRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self {
            pool,
            last_created_ms: Mutex::new(0),
        }
    }

    /// Strictly increasing per repository so insertion order survives
    /// several inserts within one millisecond.
    fn next_created_ms(&self) -> i64 {
        let mut last = self.last_created_ms.lock();
        let next = common::time::now_ms().max(*last + 1);
        *last = next;
        next
    }
}

#[async_trait]
impl BookmarkRepository for SqlxBookmarkRepository {
    async fn list_for_owner(&self, session: &Session) -> anyhow::Result<Vec<Bookmark>> {
        let rows = sqlx::query(SELECT_OWNED)
            .bind(session.user_id().as_str())
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            match row_to_bookmark(&r) {
                Ok(b) => out.push(b),
                Err(e) => {
                    // poison-row resilience: skip but don't fail the listing
                    warn!(error = %e, "skipping malformed bookmark row");
                }
            }
        }

        Ok(out)
    }

    async fn insert(&self, session: &Session, bookmark: &NewBookmark) -> anyhow::Result<()> {
        if bookmark.user_id() != session.user_id() {
            bail!(
                "bookmark owner {} does not match session user {}",
                bookmark.user_id(),
                session.user_id()
            );
        }

        let id = Uuid::new_v4();
        sqlx::query(INSERT)
            .bind(id.to_string())
            .bind(bookmark.user_id().as_str())
            .bind(bookmark.title())
            .bind(bookmark.url())
            .bind(self.next_created_ms())
            .execute(&self.pool)
            .await?;

        debug!(bookmark_id = %id, "bookmark row inserted");
        Ok(())
    }

    async fn delete(&self, session: &Session, id: &BookmarkId) -> anyhow::Result<()> {
        let result = sqlx::query(DELETE_OWNED)
            .bind(id.as_str())
            .bind(session.user_id().as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!(bookmark_id = %id, "delete matched no owned row");
        }

        Ok(())
    }
}

/* =========================
Row mapping
========================= */

fn row_to_bookmark(r: &sqlx::any::AnyRow) -> anyhow::Result<Bookmark> {
    let title: String = r.try_get("title")?;
    let url: String = r.try_get("url")?;

    if title.trim().is_empty() {
        return Err(anyhow!("empty title"));
    }
    let parsed = Url::parse(&url).with_context(|| format!("invalid url {url:?}"))?;
    if !parsed.has_host() {
        return Err(anyhow!("url without host: {url}"));
    }

    let created_at_ms: i64 = r.try_get("created_at_ms")?;
    if created_at_ms < 0 {
        return Err(anyhow!("negative created_at_ms: {created_at_ms}"));
    }

    Ok(Bookmark {
        id: BookmarkId::new(r.try_get::<String, _>("id")?),
        title,
        url,
        user_id: UserId::new(r.try_get::<String, _>("user_id")?),
        created_at: common::time::from_ms(created_at_ms),
    })
}
