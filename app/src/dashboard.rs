//! Dashboard screen: lists the signed-in user's bookmarks and handles the
//! add, delete and sign-out actions.
//!
//! All state lives behind one mutex that is never held across a remote call.
//! `submitting` is claimed in the same critical section that checks it, so
//! overlapping add/delete requests cannot both reach the store.
use std::sync::Arc;
use std::time::Duration;

use bookmarks::{Bookmark, BookmarkDraft, BookmarkId, BookmarkStore, ValidationError};
use common::logger::{TraceId, child_span, root_span};
use parking_lot::Mutex;
use session::{AuthClient, Session};
use tracing::{Instrument, Span, debug, info, warn};

use crate::gate::SessionGate;
use crate::lifecycle::CallLifecycle;
use crate::navigation::{Navigator, Route};

pub const LOAD_FAILED: &str = "Failed to load bookmarks.";
pub const FIELDS_REQUIRED: &str = "Title and URL are required.";
pub const INVALID_URL: &str = "Please enter a valid URL (include https://).";
pub const ADD_FAILED: &str = "Failed to add bookmark.";
pub const DELETE_FAILED: &str = "Failed to delete bookmark.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    pub bookmarks: Vec<Bookmark>,
    pub title: String,
    pub url: String,
    pub loading: bool,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            bookmarks: vec![],
            title: String::new(),
            url: String::new(),
            loading: true,
            submitting: false,
            error: None,
        }
    }
}

/// What became of an add or delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Completed,
    /// Another add/delete was in flight.
    Ignored,
    /// Rejected by local validation; nothing was sent.
    Invalid,
    Failed,
    /// The session was gone; the visitor was sent to sign-in.
    SignedOut,
}

pub struct DashboardController {
    auth: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
    gate: SessionGate,
    store: BookmarkStore,
    calls: CallLifecycle,
    state: Mutex<DashboardState>,
    session: Mutex<Option<Session>>,
}

/// Releases `submitting` on every exit path of a mutation.
struct SubmitGuard<'a> {
    state: &'a Mutex<DashboardState>,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().submitting = false;
    }
}

impl DashboardController {
    pub fn new(
        auth: Arc<dyn AuthClient>,
        store: BookmarkStore,
        navigator: Arc<dyn Navigator>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            gate: SessionGate::new(Arc::clone(&auth), Arc::clone(&navigator)),
            auth,
            navigator,
            store,
            calls: CallLifecycle::new(request_timeout),
            state: Mutex::new(DashboardState::default()),
            session: Mutex::new(None),
        }
    }

    pub fn state(&self) -> DashboardState {
        self.state.lock().clone()
    }

    /// Form input. Ignored while a mutation is in flight.
    pub fn set_title(&self, title: impl Into<String>) -> bool {
        let mut state = self.state.lock();
        if state.submitting {
            return false;
        }
        state.title = title.into();
        true
    }

    /// Form input. Ignored while a mutation is in flight.
    pub fn set_url(&self, url: impl Into<String>) -> bool {
        let mut state = self.state.lock();
        if state.submitting {
            return false;
        }
        state.url = url.into();
        true
    }

    /// Verifies the session, then loads the list. Returns false when the
    /// visitor was redirected to sign-in (the list is never requested then).
    pub async fn mount(&self) -> bool {
        let span = root_span("dashboard_mount", &TraceId::new());
        async {
            let Some(session) = self.gate.require_session(&self.calls).await else {
                return false;
            };
            Span::current().record("user_id", tracing::field::display(session.user_id()));
            *self.session.lock() = Some(session.clone());

            self.refresh(&session).await;
            self.state.lock().loading = false;
            info!("dashboard ready");
            true
        }
        .instrument(span)
        .await
    }

    pub async fn add_bookmark(&self) -> Mutation {
        let span = root_span("add_bookmark", &TraceId::new());
        async {
            let (draft, _guard) = {
                let mut state = self.state.lock();
                if state.submitting {
                    debug!("mutation in flight; add ignored");
                    return Mutation::Ignored;
                }
                state.error = None;

                match BookmarkDraft::parse(&state.title, &state.url) {
                    Ok(draft) => {
                        state.submitting = true;
                        (draft, SubmitGuard { state: &self.state })
                    }
                    Err(e) => {
                        debug!(error = %e, "bookmark input rejected");
                        state.error = Some(validation_message(&e).to_string());
                        return Mutation::Invalid;
                    }
                }
            };

            let Some(session) = self.gate.require_session(&self.calls).await else {
                return Mutation::SignedOut;
            };
            Span::current().record("user_id", tracing::field::display(session.user_id()));
            *self.session.lock() = Some(session.clone());

            let failure = match self
                .calls
                .run(
                    "bookmark_insert",
                    self.store.create(&session, draft.title(), draft.url()),
                )
                .await
            {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(e) => Some(e.to_string()),
            };

            if let Some(failure) = failure {
                warn!(error = %failure, "bookmark not added");
                self.state.lock().error = Some(ADD_FAILED.to_string());
                return Mutation::Failed;
            }

            {
                let mut state = self.state.lock();
                state.title.clear();
                state.url.clear();
            }

            self.refresh(&session).await;
            info!("bookmark added");
            Mutation::Completed
        }
        .instrument(span)
        .await
    }

    /// Deletes remotely, then drops the entry locally without a re-fetch.
    /// On failure the local list is left as it was.
    pub async fn delete_bookmark(&self, id: &BookmarkId) -> Mutation {
        let span = root_span("delete_bookmark", &TraceId::new());
        async {
            let _guard = {
                let mut state = self.state.lock();
                if state.submitting {
                    debug!("mutation in flight; delete ignored");
                    return Mutation::Ignored;
                }
                state.submitting = true;
                SubmitGuard { state: &self.state }
            };

            let cached = self.session.lock().clone();
            let session = match cached {
                Some(session) => session,
                None => match self.gate.require_session(&self.calls).await {
                    Some(session) => session,
                    None => return Mutation::SignedOut,
                },
            };

            let failure = match self
                .calls
                .run("bookmark_delete", self.store.delete(&session, id))
                .await
            {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(e) => Some(e.to_string()),
            };

            let mut state = self.state.lock();
            if let Some(failure) = failure {
                warn!(error = %failure, bookmark_id = %id, "bookmark not deleted");
                state.error = Some(DELETE_FAILED.to_string());
                return Mutation::Failed;
            }

            state.bookmarks.retain(|b| &b.id != id);
            state.error = None;
            info!(bookmark_id = %id, "bookmark deleted");
            Mutation::Completed
        }
        .instrument(span)
        .await
    }

    /// Ends the session and returns to sign-in. The redirect happens even if
    /// the provider could not be reached.
    pub async fn sign_out(&self) {
        let span = root_span("sign_out", &TraceId::new());
        async {
            match self.calls.run("sign_out", self.auth.sign_out()).await {
                Ok(Ok(())) => info!("signed out"),
                Ok(Err(e)) => warn!(error = %e, "sign-out failed at the provider"),
                Err(e) => warn!(error = %e, "sign-out did not complete"),
            }

            *self.session.lock() = None;
            self.navigator.replace(Route::SignIn);
        }
        .instrument(span)
        .await
    }

    /// Abandons in-flight calls; the controller issues no further requests.
    pub fn unmount(&self) {
        self.calls.unmount();
    }

    /// Re-fetches the list. A failure keeps the current list and shows
    /// `LOAD_FAILED`.
    async fn refresh(&self, session: &Session) {
        let result = self
            .calls
            .run("bookmark_list", self.store.list(session))
            .instrument(child_span("refresh"))
            .await;

        let mut state = self.state.lock();
        match result {
            Ok(Ok(rows)) => {
                debug!(count = rows.len(), "bookmark list refreshed");
                state.bookmarks = rows;
            }
            Ok(Err(e)) => {
                warn!(error = %e, "bookmark list not refreshed");
                state.error = Some(LOAD_FAILED.to_string());
            }
            Err(e) => {
                warn!(error = %e, "bookmark list not refreshed");
                state.error = Some(LOAD_FAILED.to_string());
            }
        }
    }
}

fn validation_message(e: &ValidationError) -> &'static str {
    match e {
        ValidationError::MissingField => FIELDS_REQUIRED,
        ValidationError::InvalidUrl(_) => INVALID_URL,
    }
}
