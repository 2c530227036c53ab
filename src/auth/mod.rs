//! Login and request resolution, composing the directory, the password
//! hasher, and the session store.

pub mod password;
pub mod token;

use crate::directory::{User, UserDirectory};
use crate::error::Error;
use crate::session::{Session, SessionManager};
use chrono::Utc;
use password::PasswordHasher;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// The login / verify-request use cases.
///
/// Holds the two stores by reference only; it never owns their records.
pub struct AuthService {
    directory: Arc<UserDirectory>,
    sessions: Arc<SessionManager>,
    hasher: PasswordHasher,
}

impl AuthService {
    #[must_use]
    pub fn new(directory: Arc<UserDirectory>, sessions: Arc<SessionManager>) -> Self {
        Self {
            directory,
            sessions,
            hasher: PasswordHasher,
        }
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, [`Error::Unauthorized`] for a
    /// credential mismatch, [`Error::Hash`] / [`Error::IdentifierGeneration`]
    /// when derivation fails (no session is recorded then).
    pub async fn login(&self, id: Uuid, password: &str) -> Result<String, Error> {
        let Some(user) = self.directory.find_by_id(id).await else {
            return Err(Error::NotFound);
        };
        if !self.hasher.verify(&user.password_hash, password)? {
            debug!(user_id = %id, "credential mismatch");
            return Err(Error::Unauthorized);
        }
        let session = self.sessions.create(user.id).await?;
        Ok(token::encode(&session.id))
    }

    /// Resolve an optional bearer credential into the requesting user.
    ///
    /// A missing credential is anonymous, not an error; so is a token no
    /// session answers to. A live session is bumped before it is returned. A
    /// stale one is marked expired and left for the sweep, and the request is
    /// treated as anonymous.
    pub async fn resolve_request(&self, bearer: Option<&str>) -> Option<(User, Session)> {
        let token = bearer?;
        let session = self.sessions.find_by_token(token).await?;

        if !session.is_live(Utc::now()) {
            let _ = self.sessions.expire(session.id).await;
            return None;
        }

        if self.sessions.bump(session.id).await.is_err() {
            // Swept between lookup and bump; the caller stays anonymous.
            return None;
        }
        let user = self.directory.find_by_id(session.user_id).await?;
        let session = self.sessions.find_by_id(session.id).await.unwrap_or(session);
        Some((user, session))
    }
}
