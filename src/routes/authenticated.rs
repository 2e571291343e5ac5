use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Defines the routes accessible to any account that has successfully passed the
/// authentication layer. This is the read side of the application: the caller's
/// own profile, the subjects list, and the note/video content.
///
/// Access Control Strategy:
/// Every handler in this module relies on the `AuthUser` extractor middleware being
/// present on the router layer above this module. This guarantees that all handlers
/// receive a validated `AuthUser` struct containing the account's flags. Content
/// visibility is then decided per request at the Repository boundary: subjects are
/// open to every session, while notes and videos collapse to an empty set for
/// accounts that have not been granted access.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        // Retrieves the currently authenticated account, including its approval
        // state. Reading one's own record is always permitted.
        .route("/me", get(handlers::get_me))
        // GET /subjects
        // Lists all subjects. Not access-gated: the subject catalogue doubles as
        // the navigation skeleton shown to accounts awaiting approval.
        .route("/subjects", get(handlers::list_subjects))
        // GET /subjects/{id}
        // Retrieves a single subject.
        .route("/subjects/{id}", get(handlers::get_subject))
        // GET /notes?subject_id=...
        // Lists notes joined with their subject name. Empty for accounts without
        // the access flag; the gate lives in the repository, not here.
        .route("/notes", get(handlers::list_notes))
        // GET /videos?subject_id=...
        // Lists videos. Same visibility contract as /notes.
        .route("/videos", get(handlers::list_videos))
}
