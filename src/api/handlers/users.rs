//! User directory endpoints.
//!
//! Validation and address parsing happen here before anything reaches the
//! directory; uniqueness is enforced by the directory itself under its write
//! lock. Responses never expose password hashes.

use crate::{
    directory::{User, UserChanges, UserDirectory, UserDraft},
    email::EmailAddress,
    session::SessionManager,
};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use super::error_status;

/// Incoming user fields; empty strings mean "not provided" for PATCH.
#[derive(ToSchema, Deserialize, Debug)]
pub struct UserPayload {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    #[schema(value_type = String)]
    pub password: SecretString,
    #[serde(default)]
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: user.address.as_str().to_string(),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.map(|at| at.to_rfc3339()),
        }
    }
}

#[utoipa::path(
    get,
    path = "/v1/users",
    responses(
        (status = 200, description = "All live users, oldest first.", body = [UserResponse]),
    ),
    tag = "users"
)]
pub async fn list_users(directory: Extension<Arc<UserDirectory>>) -> Response {
    let users: Vec<UserResponse> = directory
        .get_all()
        .await
        .into_iter()
        .map(UserResponse::from)
        .collect();
    (StatusCode::OK, Json(users)).into_response()
}

#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    params(
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User found.", body = UserResponse),
        (status = 400, description = "Invalid user id."),
        (status = 404, description = "User not found."),
    ),
    tag = "users"
)]
pub async fn get_user(Path(id): Path<String>, directory: Extension<Arc<UserDirectory>>) -> Response {
    let Ok(user_id) = Uuid::parse_str(id.trim()) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    match directory.find_by_id(user_id).await {
        Some(user) => (StatusCode::OK, Json(UserResponse::from(user))).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created.", body = UserResponse),
        (status = 400, description = "Invalid username, password, or address."),
        (status = 409, description = "Username or address already taken."),
    ),
    tag = "users"
)]
#[instrument(skip(directory, payload))]
pub async fn create_user(
    directory: Extension<Arc<UserDirectory>>,
    payload: Option<Json<UserPayload>>,
) -> Response {
    let Some(Json(payload)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let address = match EmailAddress::parse(&payload.email) {
        Ok(address) => address,
        Err(err) => return (error_status(&err), err.to_string()).into_response(),
    };
    let password = payload.password.expose_secret().to_string();
    if let Err(err) = UserDirectory::validate(&payload.username, &password) {
        return (error_status(&err), err.to_string()).into_response();
    }

    let draft = UserDraft {
        username: payload.username,
        password,
        address,
    };
    match directory.create(draft).await {
        Ok(user) => {
            debug!(user_id = %user.id, "user created");
            (StatusCode::CREATED, Json(UserResponse::from(user))).into_response()
        }
        Err(err) => (error_status(&err), err.to_string()).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/v1/users/{id}",
    request_body = UserPayload,
    responses(
        (status = 200, description = "User replaced.", body = UserResponse),
        (status = 400, description = "Invalid username, password, or address."),
        (status = 404, description = "User not found."),
        (status = 409, description = "Username or address already taken."),
    ),
    tag = "users"
)]
#[instrument(skip(directory, payload))]
pub async fn update_user(
    Path(id): Path<String>,
    directory: Extension<Arc<UserDirectory>>,
    payload: Option<Json<UserPayload>>,
) -> Response {
    let Ok(user_id) = Uuid::parse_str(id.trim()) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Some(Json(payload)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let address = match EmailAddress::parse(&payload.email) {
        Ok(address) => address,
        Err(err) => return (error_status(&err), err.to_string()).into_response(),
    };
    let password = payload.password.expose_secret().to_string();
    if let Err(err) = UserDirectory::validate(&payload.username, &password) {
        return (error_status(&err), err.to_string()).into_response();
    }

    let draft = UserDraft {
        username: payload.username,
        password,
        address,
    };
    match directory.update(user_id, draft).await {
        Ok(user) => (StatusCode::OK, Json(UserResponse::from(user))).into_response(),
        Err(err) => (error_status(&err), err.to_string()).into_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/v1/users/{id}",
    request_body = UserPayload,
    responses(
        (status = 200, description = "User patched; only non-empty fields overwrite.", body = UserResponse),
        (status = 400, description = "Invalid username, password, or address."),
        (status = 404, description = "User not found."),
        (status = 409, description = "Username or address already taken."),
    ),
    tag = "users"
)]
#[instrument(skip(directory, payload))]
pub async fn patch_user(
    Path(id): Path<String>,
    directory: Extension<Arc<UserDirectory>>,
    payload: Option<Json<UserPayload>>,
) -> Response {
    let Ok(user_id) = Uuid::parse_str(id.trim()) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Some(Json(payload)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let username = Some(payload.username).filter(|value| !value.is_empty());
    let password =
        Some(payload.password.expose_secret().to_string()).filter(|value| !value.is_empty());
    let address = if payload.email.is_empty() {
        None
    } else {
        match EmailAddress::parse(&payload.email) {
            Ok(address) => Some(address),
            Err(err) => return (error_status(&err), err.to_string()).into_response(),
        }
    };

    if let Err(err) = UserDirectory::validate(
        username.as_deref().unwrap_or(""),
        password.as_deref().unwrap_or(""),
    ) {
        return (error_status(&err), err.to_string()).into_response();
    }

    let changes = UserChanges {
        username,
        password,
        address,
    };
    match directory.patch(user_id, changes).await {
        Ok(user) => (StatusCode::OK, Json(UserResponse::from(user))).into_response(),
        Err(err) => (error_status(&err), err.to_string()).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    params(
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 204, description = "User deleted; their sessions are reconciled away."),
        (status = 400, description = "Invalid user id."),
        (status = 404, description = "User not found."),
    ),
    tag = "users"
)]
#[instrument(skip(directory, sessions))]
pub async fn delete_user(
    Path(id): Path<String>,
    directory: Extension<Arc<UserDirectory>>,
    sessions: Extension<Arc<SessionManager>>,
) -> Response {
    let Ok(user_id) = Uuid::parse_str(id.trim()) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    match directory.delete(user_id).await {
        Ok(()) => {
            // The stores are linked by id only; reconcile here so a deleted
            // account cannot keep authenticating through a leftover session.
            let removed = sessions.remove_by_user(user_id).await;
            if removed > 0 {
                debug!(removed, "removed sessions for deleted user");
            }
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => (error_status(&err), err.to_string()).into_response(),
    }
}
