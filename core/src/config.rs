//! Client configuration.

use std::env;
use std::fmt;

/// Base URL of the hosted PushBots API.
pub const PRODUCTION_ENDPOINT: &str = "https://api.pushbots.com";

pub const APP_ID_ENV: &str = "PUSHBOTS_APP_ID";
pub const SECRET_ENV: &str = "PUSHBOTS_SECRET";
pub const DEBUG_ENV: &str = "PUSHBOTS_DEBUG";
pub const ENDPOINT_ENV: &str = "PUSHBOTS_ENDPOINT";

/// Credentials, debug flag and base URL for a `PushBots` client.
///
/// Immutable once handed to a client. The secret is redacted from `Debug`
/// output.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    app_id: String,
    secret: String,
    debug: bool,
    base_url: String,
}

impl ClientConfig {
    /// Configuration targeting the production endpoint.
    pub fn new(app_id: impl Into<String>, secret: impl Into<String>, debug: bool) -> Self {
        Self {
            app_id: app_id.into(),
            secret: secret.into(),
            debug,
            base_url: PRODUCTION_ENDPOINT.to_string(),
        }
    }

    /// Replace the base URL every endpoint is resolved against. An empty
    /// override keeps the production endpoint.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Read `PUSHBOTS_APP_ID`, `PUSHBOTS_SECRET`, `PUSHBOTS_DEBUG` and
    /// `PUSHBOTS_ENDPOINT` from the environment.
    ///
    /// Missing credentials are left empty; the first request then fails with
    /// `ApiError::Unauthenticated`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let debug = lookup(DEBUG_ENV)
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let config = Self::new(
            lookup(APP_ID_ENV).unwrap_or_default(),
            lookup(SECRET_ENV).unwrap_or_default(),
            debug,
        );
        match lookup(ENDPOINT_ENV) {
            Some(endpoint) => config.with_base_url(&endpoint),
            None => config,
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn set_base_url(&mut self, base_url: &str) {
        self.base_url = normalize_base_url(base_url);
    }

    pub(crate) fn has_credentials(&self) -> bool {
        !self.app_id.is_empty() && !self.secret.is_empty()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("app_id", &self.app_id)
            .field("secret", &"<redacted>")
            .field("debug", &self.debug)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        PRODUCTION_ENDPOINT.to_string()
    } else {
        trimmed.to_string()
    }
}
