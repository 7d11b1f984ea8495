use std::time::Duration;

use anyhow::{Context, anyhow};
use url::Url;

#[derive(Clone)]
pub struct AppConfig {
    /// Base URL of the hosted backend; auth lives under `/auth/v1`, the
    /// bookmark collection under `/rest/v1`.
    pub supabase_url: Url,

    /// Public project key, sent as the `apikey` header on every request.
    pub supabase_anon_key: String,

    /// Bearer token of the current session, obtained from the OAuth
    /// redirect. Absent means signed out.
    pub access_token: Option<String>,

    /// Where the identity provider sends the user agent after consent.
    pub redirect_url: Option<Url>,

    /// When set, bookmarks are kept in this SQL database instead of the
    /// hosted collection.
    pub database_url: Option<String>,

    /// Upper bound for each remote call a controller makes.
    pub request_timeout: Duration,

    /// JSON log lines (production) instead of the pretty formatter.
    pub json_logs: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let supabase_url = get("SUPABASE_URL").ok_or_else(|| anyhow!("SUPABASE_URL is not set"))?;
        let supabase_url = Url::parse(&supabase_url).context("SUPABASE_URL is not a valid url")?;

        let supabase_anon_key =
            get("SUPABASE_ANON_KEY").ok_or_else(|| anyhow!("SUPABASE_ANON_KEY is not set"))?;

        let redirect_url = get("SMARTMARK_REDIRECT_URL")
            .map(|v| Url::parse(&v))
            .transpose()
            .context("SMARTMARK_REDIRECT_URL is not a valid url")?;

        let request_timeout = match get("SMARTMARK_REQUEST_TIMEOUT_MS") {
            Some(v) => Duration::from_millis(
                v.parse()
                    .context("SMARTMARK_REQUEST_TIMEOUT_MS must be milliseconds")?,
            ),
            None => Duration::from_secs(10),
        };

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            access_token: get("SMARTMARK_ACCESS_TOKEN"),
            redirect_url,
            database_url: get("DATABASE_URL"),
            request_timeout,
            json_logs: get("APP_ENV").as_deref() == Some("production"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://proj.example.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(cfg.supabase_url.as_str(), "https://proj.example.co/");
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert!(cfg.access_token.is_none());
        assert!(cfg.database_url.is_none());
        assert!(!cfg.json_logs);
    }

    #[test]
    fn optional_keys_are_read() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://proj.example.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("SMARTMARK_ACCESS_TOKEN", "jwt"),
            ("SMARTMARK_REDIRECT_URL", "http://localhost:3000/dashboard"),
            ("SMARTMARK_REQUEST_TIMEOUT_MS", "2500"),
            ("DATABASE_URL", "sqlite://bookmarks.db"),
            ("APP_ENV", "production"),
        ]))
        .unwrap();

        assert_eq!(cfg.access_token.as_deref(), Some("jwt"));
        assert_eq!(
            cfg.redirect_url.unwrap().as_str(),
            "http://localhost:3000/dashboard"
        );
        assert_eq!(cfg.request_timeout, Duration::from_millis(2500));
        assert_eq!(cfg.database_url.as_deref(), Some("sqlite://bookmarks.db"));
        assert!(cfg.json_logs);
    }

    #[test]
    fn missing_or_malformed_required_keys_fail() {
        assert!(AppConfig::from_lookup(lookup(&[("SUPABASE_ANON_KEY", "anon")])).is_err());
        assert!(
            AppConfig::from_lookup(lookup(&[
                ("SUPABASE_URL", "not a url"),
                ("SUPABASE_ANON_KEY", "anon"),
            ]))
            .is_err()
        );
        assert!(
            AppConfig::from_lookup(lookup(&[
                ("SUPABASE_URL", "https://proj.example.co"),
                ("SUPABASE_ANON_KEY", "  "),
            ]))
            .is_err()
        );
    }
}
