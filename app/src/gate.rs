use std::sync::Arc;

use session::{AuthClient, Session};
use tracing::{debug, warn};

use crate::lifecycle::CallLifecycle;
use crate::navigation::{Navigator, Route};

/// Decides which screen a visitor may stay on.
///
/// A failed or unfinished session check counts as "signed out"; the failure
/// is logged, never shown.
pub struct SessionGate {
    auth: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
}

impl SessionGate {
    pub fn new(auth: Arc<dyn AuthClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self { auth, navigator }
    }

    /// Session for a protected screen. Without one the visitor is sent to
    /// sign-in and `None` is returned; callers must stop there.
    pub async fn require_session(&self, calls: &CallLifecycle) -> Option<Session> {
        let session = self.check(calls).await;
        if session.is_none() && !calls.is_unmounted() {
            self.navigator.replace(Route::SignIn);
        }
        session
    }

    /// Landing side of the gate: signed-in visitors go to the dashboard.
    /// Returns whether a redirect happened.
    pub async fn redirect_if_signed_in(&self, calls: &CallLifecycle) -> bool {
        match self.check(calls).await {
            Some(_) if !calls.is_unmounted() => {
                self.navigator.replace(Route::Dashboard);
                true
            }
            _ => false,
        }
    }

    async fn check(&self, calls: &CallLifecycle) -> Option<Session> {
        match calls.run("session_check", self.auth.current_session()).await {
            Ok(Ok(Some(session))) => {
                debug!(user_id = %session.user_id(), "session present");
                Some(session)
            }
            Ok(Ok(None)) => {
                debug!("no session");
                None
            }
            Ok(Err(e)) => {
                warn!(error = %e, "session check failed; treating as signed out");
                None
            }
            Err(e) => {
                warn!(error = %e, "session check did not complete; treating as signed out");
                None
            }
        }
    }
}
