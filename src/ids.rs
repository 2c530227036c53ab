//! Identifier generation for users and sessions.

use crate::error::Error;
use rand::{rngs::OsRng, RngCore};
use uuid::Uuid;

/// Generate a random identifier from the OS entropy source.
///
/// # Errors
///
/// Returns [`Error::IdentifierGeneration`] if entropy cannot be read, so the
/// enclosing create aborts without recording anything.
pub fn generate() -> Result<Uuid, Error> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| Error::IdentifierGeneration)?;
    Ok(uuid::Builder::from_random_bytes(bytes).into_uuid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let first = generate().expect("id generation failed");
        let second = generate().expect("id generation failed");
        assert_ne!(first, second);
    }

    #[test]
    fn generated_ids_are_not_nil() {
        let id = generate().expect("id generation failed");
        assert!(!id.is_nil());
    }
}
