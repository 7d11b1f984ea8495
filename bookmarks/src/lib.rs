pub mod db;
pub mod errors;
pub mod model;
pub mod repository;
pub mod repository_postgrest;
pub mod repository_sqlx;
pub mod store;

pub use errors::{StoreError, ValidationError};
pub use model::{Bookmark, BookmarkDraft, BookmarkId, NewBookmark};
pub use repository::BookmarkRepository;
pub use store::BookmarkStore;
