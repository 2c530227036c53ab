//! # Anagrafe (Identity Directory & Session Authentication)
//!
//! `anagrafe` is a small identity authority: it keeps the live set of user
//! accounts, enforces account validity and uniqueness, derives and verifies
//! password hashes, and issues, bumps, and expires ephemeral session tokens.
//!
//! ## Stores
//!
//! The user directory and the session store are independent in-process
//! collections, each behind its own lock. They are linked only by the
//! `user_id` value a session carries; neither store mutates the other.
//! Deleting a user does not cascade by itself — the transport layer calls
//! [`session::SessionManager::remove_by_user`] when it removes an account.
//!
//! ## Tokens
//!
//! Bearer tokens are a one-way digest of the session identifier. The digest
//! adds no secret of its own: a token is exactly as unguessable as the
//! session id behind it.
//!
//! ## Expiry
//!
//! A session is live while `now < expires_at`. Authenticated activity bumps
//! the expiry forward; logout forces it into the past. Expired records stay
//! in the store until the periodic sweep removes them.

pub mod api;
pub mod auth;
pub mod cli;
pub mod directory;
pub mod email;
pub mod error;
pub mod ids;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
