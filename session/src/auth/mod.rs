pub mod gotrue;

pub use gotrue::GoTrueAuthClient;

use url::Url;

use crate::errors::AuthError;
use crate::model::{OAuthProvider, Session};

/// Boundary to the external identity provider.
#[async_trait::async_trait]
pub trait AuthClient: Send + Sync {
    /// The currently authenticated session, if any.
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;

    /// Starts a redirect-based OAuth flow and returns the URL the user agent
    /// must be sent to.
    async fn begin_oauth_redirect(&self, provider: OAuthProvider) -> Result<Url, AuthError>;

    /// Ends the current session. Succeeds when no session exists.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
