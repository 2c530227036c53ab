//! Address parsing for the user directory.
//!
//! Transport handlers parse incoming addresses here before anything reaches
//! the directory, so an invalid address never becomes part of a `User`.

use crate::error::{Error, ValidationError};
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// A validated, normalized email address.
///
/// Accepts either a bare `local@domain` or the `Name <local@domain>` form;
/// only the trimmed, lowercased addr-spec is kept. Two addresses compare
/// equal iff their normalized forms do, which is what the directory's
/// uniqueness rule is defined over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse and normalize an address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Address`] when the input is not a
    /// well-formed address.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let trimmed = input.trim();
        let spec = match (trimmed.find('<'), trimmed.rfind('>')) {
            (Some(start), Some(end)) if start < end => &trimmed[start + 1..end],
            (None, None) => trimmed,
            _ => return Err(ValidationError::Address.into()),
        };
        let normalized = spec.trim().to_lowercase();
        if !valid_email(&normalized) {
            return Err(ValidationError::Address.into());
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Basic email format check on already-normalized input.
fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_bare_address() {
        let address = EmailAddress::parse("alex@example.com").expect("address should parse");
        assert_eq!(address.as_str(), "alex@example.com");
    }

    #[test]
    fn parse_accepts_display_name_form() {
        let address = EmailAddress::parse("Alex <alex@example.com>").expect("address should parse");
        assert_eq!(address.as_str(), "alex@example.com");
    }

    #[test]
    fn parse_trims_and_lowercases() {
        let address = EmailAddress::parse("  Alex@Example.COM  ").expect("address should parse");
        assert_eq!(address.as_str(), "alex@example.com");
    }

    #[test]
    fn parse_rejects_missing_parts() {
        assert!(EmailAddress::parse("not-an-email").is_err());
        assert!(EmailAddress::parse("missing-at.example.com").is_err());
        assert!(EmailAddress::parse("missing-domain@").is_err());
        assert!(EmailAddress::parse("").is_err());
    }

    #[test]
    fn parse_rejects_unbalanced_brackets() {
        assert!(EmailAddress::parse("Alex <alex@example.com").is_err());
        assert!(EmailAddress::parse("alex@example.com>").is_err());
    }

    #[test]
    fn normalized_forms_compare_equal() {
        let plain = EmailAddress::parse("zg@zk.gd").expect("address should parse");
        let wrapped = EmailAddress::parse("ZG <ZG@zk.gd>").expect("address should parse");
        assert_eq!(plain, wrapped);
    }
}
