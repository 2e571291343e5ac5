use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Admin Router Module
///
/// Defines the routes exclusively accessible to accounts with the admin flag.
/// These endpoints cover the three admin panels: account approval, subject
/// management, and content (note/video) management, plus the dashboard stats.
///
/// Access Control:
/// The authentication layer above this router guarantees a validated session;
/// the admin requirement itself is enforced by the authorization check inside
/// every repository method these handlers call (and again before side effects
/// such as file uploads). A non-admin session reaching any of these routes
/// receives 403 with a reason.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/stats
        // Retrieves core dashboard metrics (accounts, pending approvals, content counts).
        .route("/stats", get(handlers::get_admin_stats))
        // GET /admin/accounts
        // Lists every account with its privilege flags, newest first. This is
        // the approval queue.
        .route("/accounts", get(handlers::list_accounts))
        // PUT /admin/accounts/{id}/flags
        // Grants or removes access/admin rights. Partial update; omitted flags
        // are untouched.
        .route("/accounts/{id}/flags", put(handlers::update_account_flags))
        // --- Subject Management ---
        .route("/subjects", post(handlers::create_subject))
        .route(
            "/subjects/{id}",
            put(handlers::update_subject).delete(handlers::delete_subject),
        )
        // --- Content Management ---
        // POST /admin/notes
        // Multipart upload: the PDF goes to object storage, the public URL onto
        // the note row.
        .route("/notes", post(handlers::create_note))
        .route("/notes/{id}", delete(handlers::delete_note))
        // POST /admin/videos
        // JSON body; the video URL points at an external host.
        .route("/videos", post(handlers::create_video))
        .route("/videos/{id}", delete(handlers::delete_video))
}
