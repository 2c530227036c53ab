use crate::auth::AuthService;
use axum::{extract::Extension, http::HeaderMap, response::IntoResponse};
use std::sync::Arc;

use super::extract_bearer_token;

// axum handler for the root greeting; personalizes for a live session and
// quietly bumps its expiry along the way.
pub async fn root(headers: HeaderMap, auth: Extension<Arc<AuthService>>) -> impl IntoResponse {
    let bearer = extract_bearer_token(&headers);
    match auth.resolve_request(bearer.as_deref()).await {
        Some((user, _session)) => format!("Welcome, {}!\n", user.username),
        None => "Welcome!\n".to_string(),
    }
}
