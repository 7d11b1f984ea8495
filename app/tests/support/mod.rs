#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use url::Url;

use app::dashboard::DashboardController;
use app::landing::LandingController;
use app::navigation::RecordingNavigator;
use bookmarks::{Bookmark, BookmarkId, BookmarkRepository, BookmarkStore, NewBookmark};
use session::{AuthClient, AuthError, OAuthProvider, Session, User, UserId};

pub const TIMEOUT: Duration = Duration::from_secs(1);

pub fn session_for(user: &str) -> Session {
    Session::new(
        User {
            id: UserId::new(user),
            email: Some(format!("{user}@example.com")),
        },
        format!("token-{user}"),
    )
}

/// Identity provider double. Holds at most one session.
pub struct FakeAuth {
    pub session: Mutex<Option<Session>>,
    pub fail_check: AtomicBool,
    pub hang_check: AtomicBool,
    pub fail_redirect: AtomicBool,
    pub checks: AtomicUsize,
    pub redirects: AtomicUsize,
    pub sign_outs: AtomicUsize,
}

impl FakeAuth {
    pub fn signed_in(user: &str) -> Arc<Self> {
        Arc::new(Self::with(Some(session_for(user))))
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self::with(None))
    }

    fn with(session: Option<Session>) -> Self {
        Self {
            session: Mutex::new(session),
            fail_check: AtomicBool::new(false),
            hang_check: AtomicBool::new(false),
            fail_redirect: AtomicBool::new(false),
            checks: AtomicUsize::new(0),
            redirects: AtomicUsize::new(0),
            sign_outs: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AuthClient for FakeAuth {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        if self.hang_check.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_check.load(Ordering::SeqCst) {
            return Err(AuthError::InvalidResponse("provider unavailable".into()));
        }
        Ok(self.session.lock().clone())
    }

    async fn begin_oauth_redirect(&self, provider: OAuthProvider) -> Result<Url, AuthError> {
        self.redirects.fetch_add(1, Ordering::SeqCst);
        if self.fail_redirect.load(Ordering::SeqCst) {
            return Err(AuthError::InvalidResponse("provider unavailable".into()));
        }
        Ok(Url::parse(&format!(
            "https://auth.example.test/auth/v1/authorize?provider={provider}"
        ))?)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        self.session.lock().take();
        Ok(())
    }
}

/// Owner-filtering bookmark store double with counters, failure switches
/// and an optional write latency.
pub struct FakeRepository {
    pub rows: Mutex<Vec<Bookmark>>,
    pub lists: AtomicUsize,
    pub inserts: AtomicUsize,
    pub deletes: AtomicUsize,
    pub fail_list: AtomicBool,
    pub fail_writes: AtomicBool,
    pub hang_writes: AtomicBool,
    pub write_delay: Mutex<Duration>,
    clock_ms: AtomicI64,
    next_id: AtomicUsize,
}

impl Default for FakeRepository {
    fn default() -> Self {
        Self {
            rows: Mutex::new(vec![]),
            lists: AtomicUsize::new(0),
            inserts: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            fail_list: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            hang_writes: AtomicBool::new(false),
            write_delay: Mutex::new(Duration::ZERO),
            clock_ms: AtomicI64::new(1_700_000_000_000),
            next_id: AtomicUsize::new(1),
        }
    }
}

impl FakeRepository {
    pub fn seed(&self, owner: &str, title: &str, url: &str) -> BookmarkId {
        let created = self.clock_ms.fetch_add(1_000, Ordering::SeqCst);
        let id = BookmarkId::new(format!("bm-{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        self.rows.lock().push(Bookmark {
            id: id.clone(),
            title: title.into(),
            url: url.into(),
            user_id: UserId::new(owner),
            created_at: common::time::from_ms(created),
        });
        id
    }

    async fn before_write(&self) -> anyhow::Result<()> {
        if self.hang_writes.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let delay = *self.write_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("write rejected");
        }
        Ok(())
    }
}

#[async_trait]
impl BookmarkRepository for FakeRepository {
    async fn list_for_owner(&self, session: &Session) -> anyhow::Result<Vec<Bookmark>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            anyhow::bail!("store offline");
        }
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|b| &b.user_id == session.user_id())
            .cloned()
            .collect())
    }

    async fn insert(&self, _session: &Session, bookmark: &NewBookmark) -> anyhow::Result<()> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.before_write().await?;
        self.seed(bookmark.user_id().as_str(), bookmark.title(), bookmark.url());
        Ok(())
    }

    async fn delete(&self, session: &Session, id: &BookmarkId) -> anyhow::Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.before_write().await?;
        self.rows
            .lock()
            .retain(|b| !(&b.id == id && &b.user_id == session.user_id()));
        Ok(())
    }
}

pub struct Dashboard {
    pub controller: DashboardController,
    pub auth: Arc<FakeAuth>,
    pub repo: Arc<FakeRepository>,
    pub nav: Arc<RecordingNavigator>,
}

pub fn dashboard(auth: Arc<FakeAuth>) -> Dashboard {
    let repo = Arc::new(FakeRepository::default());
    let nav = Arc::new(RecordingNavigator::new());
    let controller = DashboardController::new(
        auth.clone(),
        BookmarkStore::new(repo.clone()),
        nav.clone(),
        TIMEOUT,
    );

    Dashboard {
        controller,
        auth,
        repo,
        nav,
    }
}

pub fn landing(auth: Arc<FakeAuth>) -> (LandingController, Arc<RecordingNavigator>) {
    let nav = Arc::new(RecordingNavigator::new());
    (LandingController::new(auth, nav.clone(), TIMEOUT), nav)
}
