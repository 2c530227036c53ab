//! Opaque bearer tokens derived from session identifiers.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Digest a session id into the opaque token handed to clients.
///
/// One-way and deterministic. The digest carries no secret of its own, so a
/// token is exactly as unguessable as the session identifier behind it.
/// Reverse mapping happens in the session store, which keeps a token index
/// built with this same function.
#[must_use]
pub fn encode(session_id: &Uuid) -> String {
    let mut hasher = Sha256::new();
    hasher.update(session_id.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
