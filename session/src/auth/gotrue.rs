//! GoTrueAuthClient
//! ----------------
//! HTTP client for a GoTrue-compatible identity service (the auth API of a
//! hosted Supabase project). It holds the bearer token of the current
//! session in memory only; obtaining that token after the OAuth redirect is
//! the caller's concern.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::AuthClient;
use crate::errors::AuthError;
use crate::model::{OAuthProvider, Session, User};

#[derive(Clone)]
pub struct GoTrueAuthClient {
    http: Client,
    base_url: Url,
    api_key: String,
    redirect_to: Option<Url>,
    access_token: Arc<RwLock<Option<String>>>,
}

impl GoTrueAuthClient {
    /// `request_timeout` bounds each request end to end.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, AuthError> {
        let http = Client::builder()
            .timeout(request_timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url),
            api_key: api_key.into(),
            redirect_to: None,
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Where the provider should send the user agent after consent.
    pub fn with_redirect(mut self, redirect_to: Url) -> Self {
        self.redirect_to = Some(redirect_to);
        self
    }

    /// Installs (or clears) the bearer token of the current session.
    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write() = token;
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        Ok(self.base_url.join(path)?)
    }
}

#[async_trait]
impl AuthClient for GoTrueAuthClient {
    #[instrument(skip(self), level = "debug")]
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(token) = self.access_token.read().clone() else {
            debug!("no access token held; treating as signed out");
            return Ok(None);
        };

        let url = self.endpoint("auth/v1/user")?;
        let resp = self
            .http
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&token)
            .send()
            .await?;

        if matches!(
            resp.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            warn!(status = %resp.status(), "access token rejected by identity provider");
            return Ok(None);
        }

        let user: User = resp.error_for_status()?.json().await?;
        if user.id.as_str().is_empty() {
            return Err(AuthError::InvalidResponse("user object without id".into()));
        }

        debug!(user_id = %user.id, "session resolved");
        Ok(Some(Session::new(user, token)))
    }

    #[instrument(skip(self), fields(provider = %provider), level = "debug")]
    async fn begin_oauth_redirect(&self, provider: OAuthProvider) -> Result<Url, AuthError> {
        let mut url = self.endpoint("auth/v1/authorize")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("provider", &provider.to_string());
            if let Some(redirect_to) = &self.redirect_to {
                query.append_pair("redirect_to", redirect_to.as_str());
            }
        }

        info!("oauth redirect prepared");
        Ok(url)
    }

    #[instrument(skip(self), level = "debug")]
    async fn sign_out(&self) -> Result<(), AuthError> {
        // The local session ends even if the provider call below fails.
        let Some(token) = self.access_token.write().take() else {
            return Ok(());
        };

        let url = self.endpoint("auth/v1/logout")?;
        let resp = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&token)
            .send()
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            debug!("token already invalid at sign-out");
            return Ok(());
        }

        resp.error_for_status()?;
        info!("signed out");
        Ok(())
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
