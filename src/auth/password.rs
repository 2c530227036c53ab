//! Password hashing with scrypt.

use crate::error::Error;
use scrypt::{scrypt, Params};

// Application-wide derivation constants. Derivation is deterministic: one
// fixed salt, fixed cost parameters, so equal passwords map to equal stored
// hashes. Changing any of these invalidates every stored hash.
const SALT: &[u8] = b"!@)#(!@#";
const LOG_N: u8 = 14;
const R: u32 = 8;
const P: u32 = 1;
const HASH_LEN: usize = 32;

/// Derives and checks password hashes.
///
/// Plaintext goes in, a hex-encoded derived value comes out; the plaintext is
/// never stored anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Derive the storage hash for a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hash`] if derivation fails; the caller must abort the
    /// enclosing create/update/login flow rather than fall back to plaintext.
    pub fn hash(&self, password: &str) -> Result<String, Error> {
        let params = Params::new(LOG_N, R, P, HASH_LEN).map_err(|_| Error::Hash)?;
        let mut output = [0u8; HASH_LEN];
        scrypt(password.as_bytes(), SALT, &params, &mut output).map_err(|_| Error::Hash)?;
        Ok(hex::encode(output))
    }

    /// Check a candidate password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hash`] if recomputing the candidate's hash fails.
    pub fn verify(&self, stored_hash: &str, candidate: &str) -> Result<bool, Error> {
        let candidate_hash = self.hash(candidate)?;
        Ok(constant_time_eq(
            stored_hash.as_bytes(),
            candidate_hash.as_bytes(),
        ))
    }
}

// Length leaks; byte contents do not.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
