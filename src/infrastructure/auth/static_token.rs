//! Static token provider
//!
//! The real identity provider lives outside this crate; all it exposes
//! is "get the current session". This adapter resolves that from the
//! environment or the config file, environment taking precedence.

use async_trait::async_trait;

use crate::application::ports::{AuthError, Session, TokenProvider};
use crate::domain::config::AppConfig;

/// Environment variable overriding the configured access token
pub const TOKEN_ENV: &str = "NOTE_SCRIBE_TOKEN";
/// Environment variable overriding the configured account id
pub const ACCOUNT_ENV: &str = "NOTE_SCRIBE_ACCOUNT";

/// Token provider backed by fixed credentials
pub struct StaticTokenProvider {
    session: Option<Session>,
}

impl StaticTokenProvider {
    pub fn new(access_token: Option<String>, account_id: Option<String>) -> Self {
        let session = match (
            access_token.filter(|t| !t.is_empty()),
            account_id.filter(|a| !a.is_empty()),
        ) {
            (Some(access_token), Some(account_id)) => Some(Session {
                access_token,
                account_id,
            }),
            _ => None,
        };
        Self { session }
    }

    /// Resolve credentials from the environment, falling back to config
    pub fn from_config(config: &AppConfig) -> Self {
        let cloud = config.cloud.clone().unwrap_or_default();
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty())
            .or(cloud.access_token);
        let account = std::env::var(ACCOUNT_ENV)
            .ok()
            .filter(|a| !a.is_empty())
            .or(cloud.account_id);
        Self::new(token, account)
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn current_session(&self) -> Result<Session, AuthError> {
        self.session.clone().ok_or(AuthError::NoSession)
    }
}
