use sqlx::AnyPool;

/// Creates the self-hosted `bookmarks` table when it does not exist yet.
pub async fn migrate(pool: &AnyPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS bookmarks (
  id TEXT PRIMARY KEY,
  user_id TEXT NOT NULL,
  title TEXT NOT NULL,
  url TEXT NOT NULL,
  created_at_ms BIGINT NOT NULL
);
"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE INDEX IF NOT EXISTS idx_bookmarks_owner_created ON bookmarks(user_id, created_at_ms);"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
