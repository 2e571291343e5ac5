use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// Account
///
/// Represents a person's canonical identity record stored in the `accounts` table.
/// Rows are provisioned automatically on first authentication with both flags off;
/// only an administrator may grant access or admin rights afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Account {
    // Primary Key, also the subject (`sub`) of the auth service's JWTs.
    pub id: Uuid,
    // The account's primary identifier. Unique.
    pub email: String,
    // Gates visibility of note/video content.
    pub has_access: bool,
    // Gates all subject/note/video/account mutations.
    pub is_admin: bool,
    // Stamped when an admin removes access; cleared when access is re-granted.
    // Consulted by the auth extractor when session revocation is enabled.
    #[ts(type = "string | null")]
    pub access_revoked_at: Option<DateTime<Utc>>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Subject
///
/// A study subject (e.g., "Mathematics") from the `subjects` table. Subjects
/// group notes and videos; deleting one cascades to its content.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Note
///
/// A note record from the `notes` table: a title plus the public URL of the
/// uploaded PDF document, owned by exactly one subject.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Note {
    pub id: Uuid,
    // FK to subjects.id; ON DELETE CASCADE.
    pub subject_id: Uuid,
    pub title: String,
    // Public URL of the stored PDF, as returned by the storage layer.
    pub file_url: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Video
///
/// A video record from the `videos` table: a title plus an external video URL
/// (typically YouTube), owned by exactly one subject.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Video {
    pub id: Uuid,
    // FK to subjects.id; ON DELETE CASCADE.
    pub subject_id: Uuid,
    pub title: String,
    pub video_url: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Joined Read Models (Output) ---

/// NoteWithSubject
///
/// A note row augmented with its subject's name (a join operation). This is
/// the shape the dashboard renders, so the listing endpoints return it directly.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct NoteWithSubject {
    pub id: Uuid,
    pub subject_id: Uuid,
    // Loaded via a JOIN with `subjects` in the repository query.
    pub subject_name: String,
    pub title: String,
    pub file_url: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// VideoWithSubject
///
/// A video row augmented with its subject's name. Same contract as
/// `NoteWithSubject`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct VideoWithSubject {
    pub id: Uuid,
    pub subject_id: Uuid,
    // Loaded via a JOIN with `subjects` in the repository query.
    pub subject_name: String,
    pub title: String,
    pub video_url: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// SignInLinkRequest
///
/// Input payload for requesting a passwordless sign-in link (POST /auth/link).
/// The email is forwarded to the external auth service; no password ever
/// passes through or is stored by this application.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SignInLinkRequest {
    #[schema(example = "student@example.com")]
    pub email: String,
}

/// CreateSubjectRequest
///
/// Input payload for creating a subject (POST /admin/subjects).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub description: Option<String>,
}

/// UpdateSubjectRequest
///
/// Partial update payload for modifying an existing subject (PUT /admin/subjects/{id}).
///
/// Uses `Option<T>` for all fields and `#[serde(skip_serializing_if = "Option::is_none")]`
/// to efficiently handle partial updates, ensuring only provided fields are included in the JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateSubjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// CreateVideoRequest
///
/// Input payload for registering a video under a subject (POST /admin/videos).
/// The URL points at an external host; nothing is downloaded or stored locally.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateVideoRequest {
    pub subject_id: Uuid,
    pub title: String,
    #[schema(example = "https://www.youtube.com/watch?v=dQw4w9WgXcQ")]
    pub video_url: String,
}

/// UpdateAccountFlagsRequest
///
/// Partial update payload for an account's privilege flags
/// (PUT /admin/accounts/{id}/flags). Omitted fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateAccountFlagsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_access: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

// --- Dashboard Schemas (Output) ---

/// AdminDashboardStats
///
/// Output schema for the administrative statistics endpoint (GET /admin/stats).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_accounts: i64,
    /// The number of accounts still waiting for approval (`has_access` is false).
    pub pending_accounts: i64,
    pub total_subjects: i64,
    pub total_notes: i64,
    pub total_videos: i64,
}
