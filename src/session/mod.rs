//! Session bookkeeping: creation, lookup, expiry, and the periodic sweep.
//!
//! Sessions reference users by id only; deleting a user never touches this
//! store unless [`SessionManager::remove_by_user`] is called explicitly by
//! whoever composes the two stores.

use crate::auth::token;
use crate::error::Error;
use crate::ids;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// How long a session lasts without activity (one day).
pub const EXPIRATION_SECONDS: i64 = 86_400;

/// An ephemeral authenticated session for one user.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A session is live strictly until its expiry.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Default)]
struct SessionIndex {
    sessions: HashMap<Uuid, Session>,
    by_token: HashMap<String, Uuid>,
}

/// Owns the live session set.
///
/// The token index maps `token::encode(id)` back to the session, so
/// presented bearer tokens resolve without a scan. Whether a resolved
/// session is still live is the caller's policy, not this store's.
#[derive(Debug)]
pub struct SessionManager {
    ttl: Duration,
    index: RwLock<SessionIndex>,
}

impl SessionManager {
    #[must_use]
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_seconds),
            index: RwLock::new(SessionIndex::default()),
        }
    }

    /// Record a new session for a user, expiring one TTL from now.
    ///
    /// # Errors
    ///
    /// Only [`Error::IdentifierGeneration`]; nothing is recorded in that
    /// case.
    pub async fn create(&self, user_id: Uuid) -> Result<Session, Error> {
        let id = ids::generate()?;
        let session = Session {
            id,
            user_id,
            expires_at: Utc::now() + self.ttl,
        };
        let mut index = self.index.write().await;
        index.by_token.insert(token::encode(&id), id);
        index.sessions.insert(id, session.clone());
        Ok(session)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<Session> {
        self.index.read().await.sessions.get(&id).cloned()
    }

    /// Reverse-map a presented token.
    ///
    /// An absent token and an expired session both come back the same way a
    /// lookup would report them; "expired means anonymous" is decided above.
    pub async fn find_by_token(&self, token: &str) -> Option<Session> {
        let index = self.index.read().await;
        let id = index.by_token.get(token)?;
        index.sessions.get(id).cloned()
    }

    /// Reset the expiry to one TTL from now.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when no session has that id.
    pub async fn bump(&self, id: Uuid) -> Result<(), Error> {
        let mut index = self.index.write().await;
        let Some(session) = index.sessions.get_mut(&id) else {
            return Err(Error::NotFound);
        };
        session.expires_at = Utc::now() + self.ttl;
        Ok(())
    }

    /// Force the expiry into the past. The record stays until removed.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when no session has that id.
    pub async fn expire(&self, id: Uuid) -> Result<(), Error> {
        let mut index = self.index.write().await;
        let Some(session) = index.sessions.get_mut(&id) else {
            return Err(Error::NotFound);
        };
        session.expires_at = DateTime::UNIX_EPOCH;
        Ok(())
    }

    /// Delete the record outright.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when no session has that id.
    pub async fn remove(&self, id: Uuid) -> Result<(), Error> {
        let mut index = self.index.write().await;
        if index.sessions.remove(&id).is_none() {
            return Err(Error::NotFound);
        }
        index.by_token.remove(&token::encode(&id));
        Ok(())
    }

    /// Drop every session belonging to a user; returns how many went away.
    pub async fn remove_by_user(&self, user_id: Uuid) -> usize {
        let mut index = self.index.write().await;
        let doomed: Vec<Uuid> = index
            .sessions
            .values()
            .filter(|session| session.user_id == user_id)
            .map(|session| session.id)
            .collect();
        for id in &doomed {
            index.sessions.remove(id);
            index.by_token.remove(&token::encode(id));
        }
        doomed.len()
    }

    /// Remove every session whose expiry has passed. Idempotent; safe to run
    /// while requests are in flight.
    pub async fn clean(&self) -> usize {
        let now = Utc::now();
        let mut index = self.index.write().await;
        let expired: Vec<Uuid> = index
            .sessions
            .values()
            .filter(|session| !session.is_live(now))
            .map(|session| session.id)
            .collect();
        for id in &expired {
            index.sessions.remove(id);
            index.by_token.remove(&token::encode(id));
        }
        expired.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(EXPIRATION_SECONDS)
    }
}
