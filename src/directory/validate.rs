//! Candidate checks for usernames and passwords.
//!
//! Rules apply only to non-empty fields, so partial-update payloads with
//! blank values pass through untouched. The first failing rule wins; there
//! is no aggregation.

use crate::error::ValidationError;
use regex::Regex;

/// Symbols that satisfy the special-character rule.
const SPECIAL: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

const MIN_PASSWORD_CHARS: usize = 10;

pub(crate) fn check(username: &str, password: &str) -> Result<(), ValidationError> {
    if !username.is_empty() && !valid_username(username) {
        return Err(ValidationError::Username);
    }

    if !password.is_empty() {
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ValidationError::PasswordLength);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ValidationError::PasswordDigit);
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(ValidationError::PasswordLowercase);
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::PasswordUppercase);
        }
        if !password.chars().any(|c| SPECIAL.contains(c)) {
            return Err(ValidationError::PasswordSpecial);
        }
    }

    Ok(())
}

fn valid_username(username: &str) -> bool {
    Regex::new(r"^[[:alnum:]]+$").is_ok_and(|regex| regex.is_match(username))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_pass_untouched() {
        assert_eq!(check("", ""), Ok(()));
    }

    #[test]
    fn username_must_be_alphanumeric() {
        assert_eq!(check("@@", ""), Err(ValidationError::Username));
        assert_eq!(check("zg 1", ""), Err(ValidationError::Username));
        assert_eq!(check("zg", ""), Ok(()));
    }

    #[test]
    fn username_is_checked_before_password() {
        assert_eq!(check("@@", "short"), Err(ValidationError::Username));
    }

    #[test]
    fn password_rules_fail_in_order() {
        assert_eq!(check("", "123456789"), Err(ValidationError::PasswordLength));
        assert_eq!(check("", "aaaaaaaaaa"), Err(ValidationError::PasswordDigit));
        assert_eq!(
            check("", "0123456789"),
            Err(ValidationError::PasswordLowercase)
        );
        assert_eq!(
            check("", "01234s6789"),
            Err(ValidationError::PasswordUppercase)
        );
        assert_eq!(
            check("", "01z34S6789"),
            Err(ValidationError::PasswordSpecial)
        );
        assert_eq!(check("", "@1z34S6789"), Ok(()));
    }

    #[test]
    fn every_listed_symbol_counts_as_special() {
        for symbol in SPECIAL.chars() {
            let password = format!("01z34S678{symbol}");
            assert_eq!(check("", &password), Ok(()), "symbol {symbol:?} rejected");
        }
    }
}
