use std::fmt;

use parking_lot::Mutex;
use tracing::info;
use url::Url;

/// Addressable screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::SignIn => "/",
            Route::Dashboard => "/dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Replace(Route),
    External(Url),
}

/// Navigation surface the controllers drive.
pub trait Navigator: Send + Sync {
    /// Client-side redirect; replaces the current history entry.
    fn replace(&self, route: Route);

    /// Leaves the application, e.g. for an OAuth consent page.
    fn open_external(&self, url: &Url);
}

/// Navigator that only remembers where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Navigation> {
        self.history.lock().clone()
    }

    pub fn last(&self) -> Option<Navigation> {
        self.history.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, route: Route) {
        info!(route = %route, "navigating");
        self.history.lock().push(Navigation::Replace(route));
    }

    fn open_external(&self, url: &Url) {
        info!(host = url.host_str().unwrap_or_default(), "leaving for external page");
        self.history.lock().push(Navigation::External(url.clone()));
    }
}
