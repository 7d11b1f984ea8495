pub mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::info;

use app::config::AppConfig;
use app::dashboard::{DashboardController, Mutation};
use app::landing::{LandingController, SignIn};
use app::navigation::RecordingNavigator;
use bookmarks::db::Db;
use bookmarks::repository_postgrest::PostgrestBookmarkRepository;
use bookmarks::repository_sqlx::SqlxBookmarkRepository;
use bookmarks::{BookmarkId, BookmarkRepository, BookmarkStore};
use cli::{Cli, Command, DashboardCommand};
use common::logger::init_logger;
use session::GoTrueAuthClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::from_env()?;
    init_logger("smartmark", cfg.json_logs);

    let timeout = cli
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or(cfg.request_timeout);

    let mut auth = GoTrueAuthClient::new(
        cfg.supabase_url.clone(),
        cfg.supabase_anon_key.clone(),
        timeout,
    )?;
    if let Some(redirect) = cfg.redirect_url.clone() {
        auth = auth.with_redirect(redirect);
    }
    auth.set_access_token(cfg.access_token.clone());
    let auth = Arc::new(auth);

    let nav = Arc::new(RecordingNavigator::new());

    let command = match cli.command {
        Command::Signin => return sign_in(auth, nav, timeout).await,
        Command::Dashboard(command) => command,
    };

    let store = BookmarkStore::new(repository(&cfg, timeout).await?);
    let dashboard = DashboardController::new(auth, store, nav, timeout);

    if !dashboard.mount().await {
        bail!("Not signed in. Run `smartmark signin` first.");
    }

    match command {
        DashboardCommand::List => print_list(&dashboard)?,
        DashboardCommand::Add { title, url } => {
            dashboard.set_title(title);
            dashboard.set_url(url);
            report(&dashboard, dashboard.add_bookmark().await)?;
            print_list(&dashboard)?;
        }
        DashboardCommand::Delete { id } => {
            report(&dashboard, dashboard.delete_bookmark(&BookmarkId::new(id)).await)?;
            print_list(&dashboard)?;
        }
        DashboardCommand::Signout => {
            dashboard.sign_out().await;
            println!("Signed out.");
        }
    }

    dashboard.unmount();
    Ok(())
}

async fn sign_in(
    auth: Arc<GoTrueAuthClient>,
    nav: Arc<RecordingNavigator>,
    timeout: Duration,
) -> anyhow::Result<()> {
    let landing = LandingController::new(auth, nav, timeout);
    if landing.mount().await {
        println!("Already signed in.");
        return Ok(());
    }

    match landing.begin_sign_in().await {
        SignIn::Redirecting(url) => {
            println!("Open this URL to sign in:\n{url}");
            Ok(())
        }
        SignIn::Ignored | SignIn::Failed => bail!(landing.state().error.unwrap_or_default()),
    }
}

async fn repository(
    cfg: &AppConfig,
    timeout: Duration,
) -> anyhow::Result<Arc<dyn BookmarkRepository>> {
    match &cfg.database_url {
        Some(database_url) => {
            let db = Db::connect(database_url)
                .await
                .context("connecting to DATABASE_URL")?;
            db.migrate().await?;
            info!("using sql bookmark store");
            Ok(Arc::new(SqlxBookmarkRepository::new(db.pool)))
        }
        None => Ok(Arc::new(PostgrestBookmarkRepository::new(
            cfg.supabase_url.clone(),
            cfg.supabase_anon_key.clone(),
            timeout,
        )?)),
    }
}

fn report(dashboard: &DashboardController, outcome: Mutation) -> anyhow::Result<()> {
    match outcome {
        Mutation::Completed => Ok(()),
        Mutation::SignedOut => bail!("Session expired. Run `smartmark signin` again."),
        Mutation::Ignored | Mutation::Invalid | Mutation::Failed => {
            bail!(dashboard.state().error.unwrap_or_default())
        }
    }
}

fn print_list(dashboard: &DashboardController) -> anyhow::Result<()> {
    let state = dashboard.state();
    if let Some(error) = state.error {
        bail!(error);
    }

    if state.bookmarks.is_empty() {
        println!("You haven't added any bookmarks yet.");
        return Ok(());
    }

    for b in &state.bookmarks {
        println!(
            "{}  {}  {}  ({})",
            b.id,
            b.title,
            b.url,
            b.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}
