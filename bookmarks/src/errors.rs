use thiserror::Error;

/// Local input failures. Never reach the remote store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title and url are required")]
    MissingField,

    #[error("not an absolute url: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to load bookmarks: {0}")]
    Fetch(String),

    #[error("failed to write bookmark: {0}")]
    Write(String),
}
