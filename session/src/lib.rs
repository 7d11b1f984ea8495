pub mod auth;
pub mod errors;
pub mod model;

pub use auth::{AuthClient, GoTrueAuthClient};
pub use errors::AuthError;
pub use model::{OAuthProvider, Session, User, UserId};
