use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client.
/// There are deliberately only two: the liveness probe and the entry point of
/// the passwordless sign-in flow. Everything else in the application requires
/// a validated session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/link
        // Requests a one-time sign-in link for an email address. The link itself
        // is composed and delivered by the external auth service; this endpoint
        // only validates and forwards the request.
        .route("/auth/link", post(handlers::request_sign_in_link))
}
