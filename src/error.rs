//! Typed outcomes for directory, session, and authentication operations.
//!
//! Every variant is a recoverable, caller-visible condition except
//! [`Error::IdentifierGeneration`] and [`Error::Hash`], which are fatal to
//! the single operation: the call aborts and no partial record is left
//! behind. Nothing here is retried internally.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Username already belongs to a different live user.
    #[error("Username is taken.")]
    UsernameTaken,
    /// Address already belongs to a different live user.
    #[error("Address is taken.")]
    AddressTaken,
    #[error("Not found")]
    NotFound,
    /// Credential mismatch during login.
    #[error("Invalid credentials.")]
    Unauthorized,
    #[error("Could not generate identifier.")]
    IdentifierGeneration,
    #[error("Could not derive password hash.")]
    Hash,
}

/// First failing rule when checking a candidate user record.
///
/// Checks stop at the first failure; callers never see an aggregate.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username is invalid.")]
    Username,
    #[error("Unable to parse address.")]
    Address,
    #[error("Password must be 10 characters or longer.")]
    PasswordLength,
    #[error("Password must contain a number.")]
    PasswordDigit,
    #[error("Password must contain a lowercase letter.")]
    PasswordLowercase,
    #[error("Password must contain an uppercase letter.")]
    PasswordUppercase,
    #[error("Password must contain a special character.")]
    PasswordSpecial,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_pass_through_transparently() {
        let err = Error::from(ValidationError::PasswordDigit);
        assert_eq!(err.to_string(), "Password must contain a number.");
        assert_eq!(err, Error::Validation(ValidationError::PasswordDigit));
    }

    #[test]
    fn conflict_messages_name_the_field() {
        assert_eq!(Error::UsernameTaken.to_string(), "Username is taken.");
        assert_eq!(Error::AddressTaken.to_string(), "Address is taken.");
    }

    #[test]
    fn not_found_is_comparable() {
        assert_eq!(Error::NotFound, Error::NotFound);
        assert_ne!(Error::NotFound, Error::Unauthorized);
    }
}
