//! The user directory: the live set of accounts and its operations.
//!
//! All mutation runs under one exclusive lock so the uniqueness invariant
//! (usernames and addresses pairwise distinct across live users) cannot be
//! raced; lookups share a read lock and go through id/username/address
//! indexes instead of scanning.

mod validate;

use crate::auth::password::PasswordHasher;
use crate::email::EmailAddress;
use crate::error::Error;
use crate::ids;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A live user record.
///
/// `password_hash` is the derived value only; plaintext never lands here.
/// `id` is assigned at creation and stable for the record's lifetime.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub address: EmailAddress,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Candidate fields for create and full update.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub username: String,
    pub password: String,
    pub address: EmailAddress,
}

/// Partial update; `None` leaves the field alone.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password: Option<String>,
    pub address: Option<EmailAddress>,
}

#[derive(Debug, Default)]
struct DirectoryIndex {
    users: HashMap<Uuid, User>,
    by_username: HashMap<String, Uuid>,
    by_address: HashMap<String, Uuid>,
}

impl DirectoryIndex {
    fn insert(&mut self, user: User) {
        self.by_username.insert(user.username.clone(), user.id);
        self.by_address
            .insert(user.address.as_str().to_string(), user.id);
        self.users.insert(user.id, user);
    }

    fn unlink(&mut self, user: &User) {
        self.by_username.remove(&user.username);
        self.by_address.remove(user.address.as_str());
    }

    fn username_taken(&self, username: &str, by_other_than: Uuid) -> bool {
        self.by_username
            .get(username)
            .is_some_and(|owner| *owner != by_other_than)
    }

    fn address_taken(&self, address: &EmailAddress, by_other_than: Uuid) -> bool {
        self.by_address
            .get(address.as_str())
            .is_some_and(|owner| *owner != by_other_than)
    }
}

/// Owns the live user set.
#[derive(Debug, Default)]
pub struct UserDirectory {
    hasher: PasswordHasher,
    index: RwLock<DirectoryIndex>,
}

impl UserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All live users, oldest first.
    pub async fn get_all(&self) -> Vec<User> {
        let index = self.index.read().await;
        let mut users: Vec<User> = index.users.values().cloned().collect();
        users.sort_by_key(|user| user.created_at);
        users
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.index.read().await.users.get(&id).cloned()
    }

    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        let index = self.index.read().await;
        let id = index.by_username.get(username)?;
        index.users.get(id).cloned()
    }

    pub async fn find_by_address(&self, address: &EmailAddress) -> Option<User> {
        let index = self.index.read().await;
        let id = index.by_address.get(address.as_str())?;
        index.users.get(id).cloned()
    }

    /// First failing rule for a candidate username/password pair.
    ///
    /// Empty fields are skipped so partial updates validate cleanly.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`crate::error::ValidationError`].
    pub fn validate(username: &str, password: &str) -> Result<(), Error> {
        validate::check(username, password).map_err(Error::from)
    }

    /// Add a user to the live set.
    ///
    /// A fresh id is assigned and the password is hashed before anything is
    /// recorded; on any failure no record is left behind.
    ///
    /// # Errors
    ///
    /// [`Error::UsernameTaken`] / [`Error::AddressTaken`] on a uniqueness
    /// conflict, [`Error::IdentifierGeneration`] or [`Error::Hash`] when the
    /// respective derivation fails.
    pub async fn create(&self, draft: UserDraft) -> Result<User, Error> {
        let mut index = self.index.write().await;
        if index.by_username.contains_key(&draft.username) {
            return Err(Error::UsernameTaken);
        }
        if index.by_address.contains_key(draft.address.as_str()) {
            return Err(Error::AddressTaken);
        }

        let id = ids::generate()?;
        let password_hash = self.hasher.hash(&draft.password)?;
        let user = User {
            id,
            username: draft.username,
            password_hash,
            address: draft.address,
            created_at: Utc::now(),
            updated_at: None,
        };
        index.insert(user.clone());
        Ok(user)
    }

    /// Replace every mutable field of a live user.
    ///
    /// The password is re-hashed unconditionally. A username or address equal
    /// to the user's own current value is not a conflict.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, otherwise as [`Self::create`].
    pub async fn update(&self, id: Uuid, draft: UserDraft) -> Result<User, Error> {
        let mut index = self.index.write().await;
        let Some(current) = index.users.get(&id).cloned() else {
            return Err(Error::NotFound);
        };
        if index.username_taken(&draft.username, id) {
            return Err(Error::UsernameTaken);
        }
        if index.address_taken(&draft.address, id) {
            return Err(Error::AddressTaken);
        }

        let password_hash = self.hasher.hash(&draft.password)?;
        index.unlink(&current);
        let user = User {
            id,
            username: draft.username,
            password_hash,
            address: draft.address,
            created_at: current.created_at,
            updated_at: Some(Utc::now()),
        };
        index.insert(user.clone());
        Ok(user)
    }

    /// Overwrite only the fields present in `changes`.
    ///
    /// The password is re-hashed only when a new one was supplied; the stored
    /// hash is otherwise untouched. `updated_at` is stamped either way.
    ///
    /// # Errors
    ///
    /// As [`Self::update`].
    pub async fn patch(&self, id: Uuid, changes: UserChanges) -> Result<User, Error> {
        let mut index = self.index.write().await;
        let Some(current) = index.users.get(&id).cloned() else {
            return Err(Error::NotFound);
        };
        if let Some(username) = &changes.username {
            if index.username_taken(username, id) {
                return Err(Error::UsernameTaken);
            }
        }
        if let Some(address) = &changes.address {
            if index.address_taken(address, id) {
                return Err(Error::AddressTaken);
            }
        }

        let password_hash = match &changes.password {
            Some(password) => self.hasher.hash(password)?,
            None => current.password_hash.clone(),
        };
        index.unlink(&current);
        let user = User {
            id,
            username: changes.username.unwrap_or(current.username),
            password_hash,
            address: changes.address.unwrap_or(current.address),
            created_at: current.created_at,
            updated_at: Some(Utc::now()),
        };
        index.insert(user.clone());
        Ok(user)
    }

    /// Remove a user from the live set. No tombstone remains; the username
    /// and address become available again immediately.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when no live user has that id.
    pub async fn delete(&self, id: Uuid) -> Result<(), Error> {
        let mut index = self.index.write().await;
        let Some(user) = index.users.remove(&id) else {
            return Err(Error::NotFound);
        };
        index.unlink(&user);
        Ok(())
    }
}
