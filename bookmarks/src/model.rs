use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use session::UserId;
use url::Url;

use crate::errors::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(String);

impl BookmarkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored bookmark, as returned by the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub title: String,
    pub url: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// User input that passed local validation, not yet tied to an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkDraft {
    title: String,
    url: String,
}

impl BookmarkDraft {
    /// Trims both fields and checks that `url` is absolute (scheme and host).
    pub fn parse(title: &str, url: &str) -> Result<Self, ValidationError> {
        let title = title.trim();
        let url = url.trim();

        if title.is_empty() || url.is_empty() {
            return Err(ValidationError::MissingField);
        }

        let parsed = Url::parse(url).map_err(|_| ValidationError::InvalidUrl(url.to_string()))?;
        if !parsed.has_host() {
            return Err(ValidationError::InvalidUrl(url.to_string()));
        }

        Ok(Self {
            title: title.to_string(),
            url: url.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn owned_by(self, user_id: UserId) -> NewBookmark {
        NewBookmark {
            title: self.title,
            url: self.url,
            user_id,
        }
    }
}

/// Insert payload for the `bookmarks` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBookmark {
    title: String,
    url: String,
    user_id: UserId,
}

impl NewBookmark {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}
