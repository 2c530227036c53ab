use crate::{auth::AuthService, directory::UserDirectory, session::SessionManager};
use anyhow::Result;
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, MatchedPath},
    http::{HeaderName, HeaderValue, Method, Request},
    routing::get,
    Extension,
};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug, info, info_span, Span};
use ulid::Ulid;
use utoipa_axum::router::OpenApiRouter;

pub(crate) mod handlers;
// OpenAPI router wiring and route registration live in openapi.rs.
mod openapi;

pub use openapi::openapi;

/// Request bodies beyond this size are rejected before parsing.
const MAX_BODY_BYTES: usize = 1_048_576;

/// Build the API router with all documented routes registered.
#[must_use]
pub fn router() -> OpenApiRouter {
    openapi::api_router()
}

/// Start the server
///
/// # Errors
///
/// Return error if failed to start the server
pub async fn new(port: u16, session_ttl_seconds: i64, sweep_interval_seconds: u64) -> Result<()> {
    // One directory, one session store; both injectable and shared by every
    // handler through its own Extension.
    let directory = Arc::new(UserDirectory::new());
    let sessions = Arc::new(SessionManager::new(session_ttl_seconds));
    let auth = Arc::new(AuthService::new(directory.clone(), sessions.clone()));

    spawn_expiry_sweeper(
        sessions.clone(),
        Duration::from_secs(sweep_interval_seconds),
    );

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_origin(Any);

    // Build the router from OpenAPI-wired routes, then extend it with the
    // undocumented `/` greeting. The spec stays in openapi.rs for the
    // `openapi` binary.
    let (router, _openapi) = router().split_for_parts();
    let app = router.route("/", get(handlers::root::root)).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(cors)
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(Extension(directory))
            .layer(Extension(sessions))
            .layer(Extension(auth)),
    );

    let listener = match TcpListener::bind(format!("::0:{port}")).await {
        Ok(listener) => listener,
        // IPv6 may be disabled on minimal hosts; fall back to IPv4.
        Err(_) => TcpListener::bind(format!("0.0.0.0:{port}")).await?,
    };

    info!("Listening on port {}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Periodically reap sessions whose expiry has passed.
///
/// The sweeper runs for the life of the process and tolerates requests in
/// flight; each pass takes the store's write lock only briefly.
fn spawn_expiry_sweeper(sessions: Arc<SessionManager>, every: Duration) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(every).await;
            let removed = sessions.clean().await;
            if removed > 0 {
                debug!(removed, "swept expired sessions");
            }
        }
    });
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Gracefully shutdown");
}
