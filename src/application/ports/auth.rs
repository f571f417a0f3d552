//! Authentication port interface
//!
//! The identity provider itself is an external collaborator; the only
//! capability this crate consumes is "get the current session".

use async_trait::async_trait;
use thiserror::Error;

/// Authentication errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No active session. Sign in and set an access token and account id")]
    NoSession,
}

/// A resolved session for the cloud service
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub account_id: String,
}

/// Port for resolving the current access credentials
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Resolve the current session, or fail if none is available
    async fn current_session(&self) -> Result<Session, AuthError>;
}
