//! Login, logout, and session resolution endpoints.

use crate::{auth::AuthService, session::SessionManager};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{error_status, extract_bearer_token};

#[derive(ToSchema, Deserialize, Debug)]
pub struct LoginRequest {
    /// The id assigned when the user was created.
    pub id: String,
    #[schema(value_type = String)]
    pub password: SecretString,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub user_id: String,
    pub username: String,
    pub expires_at: String,
}

#[utoipa::path(
    post,
    path = "/v1/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 400, description = "Missing payload"),
        (status = 401, description = "Credential mismatch"),
        (status = 404, description = "Unknown user id"),
    ),
    tag = "auth"
)]
#[instrument(skip(auth, payload))]
pub async fn login(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(payload)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    // An unparseable id cannot belong to any live user.
    let Ok(id) = Uuid::parse_str(payload.id.trim()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match auth.login(id, payload.password.expose_secret()).await {
        Ok(token) => (StatusCode::OK, Json(LoginResponse { token })).into_response(),
        Err(err) => error_status(&err).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 204, description = "Session expired")
    ),
    tag = "auth"
)]
pub async fn logout(headers: HeaderMap, sessions: Extension<Arc<SessionManager>>) -> Response {
    if let Some(token) = extract_bearer_token(&headers) {
        if let Some(session) = sessions.find_by_token(&token).await {
            // Logout is idempotent; a session swept in between is fine. The
            // record stays marked until the sweeper reaps it.
            let _ = sessions.expire(session.id).await;
        }
    }
    StatusCode::NO_CONTENT.into_response()
}

#[utoipa::path(
    get,
    path = "/v1/auth/session",
    responses(
        (status = 200, description = "Session is active", body = SessionResponse),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap, auth: Extension<Arc<AuthService>>) -> Response {
    // A missing credential is anonymous, never an error.
    let bearer = extract_bearer_token(&headers);
    match auth.resolve_request(bearer.as_deref()).await {
        Some((user, session)) => {
            let response = SessionResponse {
                user_id: user.id.to_string(),
                username: user.username,
                expires_at: session.expires_at.to_rfc3339(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_redacts_password_in_debug() {
        let request: LoginRequest = serde_json::from_value(serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "password": "@1z34S6789",
        }))
        .expect("payload should deserialize");

        let printed = format!("{request:?}");
        assert!(!printed.contains("@1z34S6789"));
        assert_eq!(request.password.expose_secret(), "@1z34S6789");
    }

    #[test]
    fn login_response_round_trips() {
        let response = LoginResponse {
            token: "deadbeef".to_string(),
        };
        let value = serde_json::to_value(&response).expect("response should serialize");
        assert_eq!(value.get("token").and_then(|t| t.as_str()), Some("deadbeef"));
    }
}
