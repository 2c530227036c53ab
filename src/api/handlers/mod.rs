//! Route handlers for the identity API.
//!
//! Handlers stay thin: they parse and validate input, call into the stores,
//! and map each typed outcome to its status. The stores own all invariants.

pub mod auth;
pub mod health;
pub mod root;
pub mod users;

use crate::error::Error;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};

/// Map a core outcome to its HTTP status.
pub(crate) fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::UsernameTaken | Error::AddressTaken => StatusCode::CONFLICT,
        Error::NotFound => StatusCode::NOT_FOUND,
        Error::Unauthorized => StatusCode::UNAUTHORIZED,
        Error::IdentifierGeneration | Error::Hash => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Pull the bearer credential from the `Authorization` header.
///
/// Accepts both `Bearer <token>` and a bare token value; a missing or empty
/// header is simply "no credential", never an error.
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))
        .unwrap_or(trimmed)
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use axum::http::HeaderValue;

    #[test]
    fn error_statuses_cover_the_taxonomy() {
        assert_eq!(
            error_status(&Error::Validation(ValidationError::PasswordDigit)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(error_status(&Error::UsernameTaken), StatusCode::CONFLICT);
        assert_eq!(error_status(&Error::AddressTaken), StatusCode::CONFLICT);
        assert_eq!(error_status(&Error::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(error_status(&Error::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            error_status(&Error::IdentifierGeneration),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(error_status(&Error::Hash), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn extract_bearer_token_strips_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(extract_bearer_token(&headers), Some("abc123".to_string()));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc123"));
        assert_eq!(extract_bearer_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn extract_bearer_token_accepts_bare_value() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("abc123"));
        assert_eq!(extract_bearer_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn extract_bearer_token_none_when_missing_or_empty() {
        let headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static(""));
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
