use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use session::Session;
use tracing::{debug, instrument};
use url::Url;

use crate::model::{Bookmark, BookmarkId, NewBookmark};
use crate::repository::BookmarkRepository;

/// `bookmarks` collection behind a PostgREST endpoint (`/rest/v1/bookmarks`).
///
/// Requests carry the session's bearer token, so the server's row-level
/// policy sees the caller's identity. The owner filter is also sent
/// explicitly on reads and deletes.
#[derive(Clone)]
pub struct PostgrestBookmarkRepository {
    http: Client,
    collection: Url,
    api_key: String,
}

impl PostgrestBookmarkRepository {
    /// `request_timeout` bounds each request end to end.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        request_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let collection = base_url
            .join("rest/v1/bookmarks")
            .context("invalid store base url")?;

        Ok(Self {
            http,
            collection,
            api_key: api_key.into(),
        })
    }

    fn request(&self, method: reqwest::Method, url: Url, session: &Session) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(session.access_token())
    }
}

#[async_trait]
impl BookmarkRepository for PostgrestBookmarkRepository {
    #[instrument(skip_all, fields(user_id = %session.user_id()), level = "debug")]
    async fn list_for_owner(&self, session: &Session) -> anyhow::Result<Vec<Bookmark>> {
        let mut url = self.collection.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &format!("eq.{}", session.user_id()))
            .append_pair("order", "created_at.desc");

        let rows: Vec<Bookmark> = self
            .request(reqwest::Method::GET, url, session)
            .send()
            .await
            .context("bookmark select request failed")?
            .error_for_status()
            .context("bookmark select rejected")?
            .json()
            .await
            .context("invalid bookmark rows")?;

        debug!(count = rows.len(), "bookmarks fetched");
        Ok(rows)
    }

    #[instrument(skip_all, fields(user_id = %session.user_id()), level = "debug")]
    async fn insert(&self, session: &Session, bookmark: &NewBookmark) -> anyhow::Result<()> {
        self.request(reqwest::Method::POST, self.collection.clone(), session)
            .header("Prefer", "return=minimal")
            .json(&[bookmark])
            .send()
            .await
            .context("bookmark insert request failed")?
            .error_for_status()
            .context("bookmark insert rejected")?;

        debug!("bookmark inserted");
        Ok(())
    }

    #[instrument(skip_all, fields(user_id = %session.user_id(), bookmark_id = %id), level = "debug")]
    async fn delete(&self, session: &Session, id: &BookmarkId) -> anyhow::Result<()> {
        let mut url = self.collection.clone();
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id))
            .append_pair("user_id", &format!("eq.{}", session.user_id()));

        self.request(reqwest::Method::DELETE, url, session)
            .send()
            .await
            .context("bookmark delete request failed")?
            .error_for_status()
            .context("bookmark delete rejected")?;

        debug!("bookmark deleted");
        Ok(())
    }
}
