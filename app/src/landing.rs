//! Landing screen: bounces signed-in visitors to the dashboard and starts
//! the OAuth redirect for everyone else.
use std::sync::Arc;
use std::time::Duration;

use common::logger::{TraceId, root_span};
use parking_lot::Mutex;
use session::{AuthClient, OAuthProvider};
use tracing::{Instrument, debug, info, warn};
use url::Url;

use crate::gate::SessionGate;
use crate::lifecycle::CallLifecycle;
use crate::navigation::Navigator;

pub const SIGN_IN_FAILED: &str = "Failed to start sign-in.";

/// The one provider this application signs in with.
pub const PROVIDER: OAuthProvider = OAuthProvider::Google;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingState {
    pub loading: bool,
    pub signing_in: bool,
    pub error: Option<String>,
}

impl Default for LandingState {
    fn default() -> Self {
        Self {
            loading: true,
            signing_in: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignIn {
    /// The user agent was sent to the provider.
    Redirecting(Url),
    /// A sign-in was already in progress.
    Ignored,
    Failed,
}

pub struct LandingController {
    auth: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
    gate: SessionGate,
    calls: CallLifecycle,
    state: Mutex<LandingState>,
}

impl LandingController {
    pub fn new(
        auth: Arc<dyn AuthClient>,
        navigator: Arc<dyn Navigator>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            gate: SessionGate::new(Arc::clone(&auth), Arc::clone(&navigator)),
            auth,
            navigator,
            calls: CallLifecycle::new(request_timeout),
            state: Mutex::new(LandingState::default()),
        }
    }

    pub fn state(&self) -> LandingState {
        self.state.lock().clone()
    }

    /// Returns true when the visitor was redirected to the dashboard; the
    /// screen then stays in its loading state.
    pub async fn mount(&self) -> bool {
        let span = root_span("landing_mount", &TraceId::new());
        async {
            if self.gate.redirect_if_signed_in(&self.calls).await {
                return true;
            }
            self.state.lock().loading = false;
            debug!("showing sign-in");
            false
        }
        .instrument(span)
        .await
    }

    /// Starts the OAuth redirect. The in-progress flag stays set once the
    /// user agent has been sent away; on failure it is released and
    /// `SIGN_IN_FAILED` is shown so the user can retry.
    pub async fn begin_sign_in(&self) -> SignIn {
        {
            let mut state = self.state.lock();
            if state.signing_in {
                debug!("sign-in already in progress");
                return SignIn::Ignored;
            }
            state.signing_in = true;
            state.error = None;
        }

        let span = root_span("begin_sign_in", &TraceId::new());
        async {
            let failure = match self
                .calls
                .run("oauth_redirect", self.auth.begin_oauth_redirect(PROVIDER))
                .await
            {
                Ok(Ok(url)) => {
                    info!(provider = %PROVIDER, "redirecting to identity provider");
                    self.navigator.open_external(&url);
                    return SignIn::Redirecting(url);
                }
                Ok(Err(e)) => e.to_string(),
                Err(e) => e.to_string(),
            };

            warn!(error = %failure, "could not start sign-in");
            let mut state = self.state.lock();
            state.signing_in = false;
            state.error = Some(SIGN_IN_FAILED.to_string());
            SignIn::Failed
        }
        .instrument(span)
        .await
    }

    pub fn unmount(&self) {
        self.calls.unmount();
    }
}
