use crate::{
    AppState,
    auth::AuthUser,
    authz::{self, Permission},
    error::{ApiError, ErrorBody},
    models::{
        Account, AdminDashboardStats, CreateSubjectRequest, CreateVideoRequest, Note,
        NoteWithSubject, SignInLinkRequest, Subject, UpdateAccountFlagsRequest,
        UpdateSubjectRequest, Video, VideoWithSubject,
    },
};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

// --- Filter Structs ---

/// ContentFilter
///
/// Defines the accepted query parameters for the note/video listing endpoints.
/// Used by Axum's Query extractor to safely bind HTTP query parameters.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ContentFilter {
    /// Optional filter restricting the listing to a single subject.
    pub subject_id: Option<Uuid>,
}

// --- Public Handlers ---

/// request_sign_in_link
///
/// [Public Route] Requests a passwordless sign-in link for the given email.
///
/// *Flow*: Validates the address, then forwards it to the external auth
/// service's OTP endpoint, which sends the one-time link out of band. No
/// credential is ever handled or stored by this application. The account row
/// itself is provisioned later, on the first authenticated request.
#[utoipa::path(
    post,
    path = "/auth/link",
    request_body = SignInLinkRequest,
    responses(
        (status = 202, description = "Sign-in link requested"),
        (status = 400, description = "Invalid email", body = ErrorBody),
        (status = 502, description = "Auth service unavailable", body = ErrorBody)
    )
)]
pub async fn request_sign_in_link(
    State(state): State<AppState>,
    Json(payload): Json<SignInLinkRequest>,
) -> Result<StatusCode, ApiError> {
    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::Validation(
            "a valid email address is required".to_string(),
        ));
    }

    let client = reqwest::Client::new();
    let otp_url = format!("{}/auth/v1/otp", state.config.auth_url);

    let response = client
        .post(otp_url)
        .header("apikey", &state.config.auth_api_key)
        .header("Content-Type", "application/json")
        .json(&serde_json::json!({ "email": email, "create_user": true }))
        .send()
        .await
        .map_err(|e| ApiError::Upstream(format!("auth service unreachable: {e}")))?;

    if !response.status().is_success() {
        // The auth service rejects e.g. malformed or rate-limited addresses.
        return Err(ApiError::Upstream(
            "auth service rejected the sign-in request".to_string(),
        ));
    }

    Ok(StatusCode::ACCEPTED)
}

// --- Authenticated Handlers ---

/// get_me
///
/// [Authenticated Route] Returns the caller's own account row, including the
/// approval state the dashboard uses to decide what to render.
///
/// *Note*: Reading one's own record is always permitted; the check is still
/// issued so every data access goes through the same decision function.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Own account", body = Account))
)]
pub async fn get_me(
    actor: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Account>, ApiError> {
    authz::check(&actor, Permission::ReadAccount(actor.id))?;
    let account = state
        .repo
        .get_account(actor.id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(account))
}

/// list_subjects
///
/// [Authenticated Route] Lists all subjects. Subjects are the navigation
/// skeleton of the app and are visible to every signed-in account, whether
/// or not it has been approved for content access.
#[utoipa::path(
    get,
    path = "/subjects",
    responses((status = 200, description = "All subjects", body = [Subject]))
)]
pub async fn list_subjects(
    actor: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Subject>>, ApiError> {
    Ok(Json(state.repo.list_subjects(&actor).await?))
}

/// get_subject
///
/// [Authenticated Route] Retrieves a single subject by ID.
#[utoipa::path(
    get,
    path = "/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Found", body = Subject),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_subject(
    actor: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Subject>, ApiError> {
    Ok(Json(state.repo.get_subject(&actor, id).await?))
}

/// list_notes
///
/// [Authenticated Route] Lists notes joined with their subject name,
/// optionally filtered to one subject.
///
/// *Visibility*: Accounts without the access flag receive an empty list —
/// the rows do not exist for them. The filtering happens at the repository
/// boundary, so the rule holds for any client, not just this handler.
#[utoipa::path(
    get,
    path = "/notes",
    params(ContentFilter),
    responses((status = 200, description = "Visible notes", body = [NoteWithSubject]))
)]
pub async fn list_notes(
    actor: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<ContentFilter>,
) -> Result<Json<Vec<NoteWithSubject>>, ApiError> {
    Ok(Json(state.repo.list_notes(&actor, filter.subject_id).await?))
}

/// list_videos
///
/// [Authenticated Route] Lists videos joined with their subject name. Same
/// visibility contract as `list_notes`.
#[utoipa::path(
    get,
    path = "/videos",
    params(ContentFilter),
    responses((status = 200, description = "Visible videos", body = [VideoWithSubject]))
)]
pub async fn list_videos(
    actor: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<ContentFilter>,
) -> Result<Json<Vec<VideoWithSubject>>, ApiError> {
    Ok(Json(
        state.repo.list_videos(&actor, filter.subject_id).await?,
    ))
}

// --- Admin Handlers ---

/// list_accounts
///
/// [Admin Route] Lists every account with its privilege flags. The approval
/// queue in the admin panel is this list filtered client-side.
#[utoipa::path(
    get,
    path = "/admin/accounts",
    responses(
        (status = 200, description = "All accounts", body = [Account]),
        (status = 403, description = "Not an admin", body = ErrorBody)
    )
)]
pub async fn list_accounts(
    actor: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(state.repo.list_accounts(&actor).await?))
}

/// update_account_flags
///
/// [Admin Route] Grants or removes an account's access/admin flags. Omitted
/// fields are left untouched; removing access stamps the revocation time the
/// session-revocation policy consults.
#[utoipa::path(
    put,
    path = "/admin/accounts/{id}/flags",
    params(("id" = Uuid, Path, description = "Account ID")),
    request_body = UpdateAccountFlagsRequest,
    responses(
        (status = 200, description = "Updated", body = Account),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_account_flags(
    actor: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountFlagsRequest>,
) -> Result<Json<Account>, ApiError> {
    if payload.has_access.is_none() && payload.is_admin.is_none() {
        return Err(ApiError::Validation(
            "at least one flag must be provided".to_string(),
        ));
    }
    Ok(Json(
        state.repo.set_account_flags(&actor, id, payload).await?,
    ))
}

/// create_subject
///
/// [Admin Route] Creates a new subject.
#[utoipa::path(
    post,
    path = "/admin/subjects",
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, description = "Created", body = Subject),
        (status = 400, description = "Missing name", body = ErrorBody)
    )
)]
pub async fn create_subject(
    actor: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<Subject>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "subject name must not be empty".to_string(),
        ));
    }
    let subject = state.repo.create_subject(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

/// update_subject
///
/// [Admin Route] Partially updates a subject's name/description.
#[utoipa::path(
    put,
    path = "/admin/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    request_body = UpdateSubjectRequest,
    responses(
        (status = 200, description = "Updated", body = Subject),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_subject(
    actor: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubjectRequest>,
) -> Result<Json<Subject>, ApiError> {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation(
                "subject name must not be empty".to_string(),
            ));
        }
    }
    Ok(Json(state.repo.update_subject(&actor, id, payload).await?))
}

/// delete_subject
///
/// [Admin Route] Deletes a subject. All notes and videos owned by the
/// subject are cascade-deleted in the same operation; no orphans remain.
#[utoipa::path(
    delete,
    path = "/admin/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_subject(
    actor: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repo.delete_subject(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// create_note
///
/// [Admin Route] Creates a note from a multipart form: `subject_id`, `title`,
/// and the PDF under `file`. The document is uploaded to object storage first
/// and the returned public URL is what gets persisted on the note row.
///
/// *Authorization*: The admin check runs before the upload so an unauthorized
/// caller cannot place bytes in the bucket; the repository repeats the check
/// at the insert.
#[utoipa::path(
    post,
    path = "/admin/notes",
    responses(
        (status = 201, description = "Created", body = Note),
        (status = 400, description = "Missing field or file", body = ErrorBody),
        (status = 502, description = "Storage unavailable", body = ErrorBody)
    )
)]
pub async fn create_note(
    actor: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    authz::check(&actor, Permission::ManageContent)?;

    let mut subject_id: Option<Uuid> = None;
    let mut title: Option<String> = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed upload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "subject_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("malformed upload: {e}")))?;
                subject_id = Some(Uuid::parse_str(text.trim()).map_err(|_| {
                    ApiError::Validation("subject_id must be a valid UUID".to_string())
                })?);
            }
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::Validation(format!("malformed upload: {e}")))?,
                );
            }
            "file" => {
                let filename = field.file_name().unwrap_or("document.pdf").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/pdf")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("malformed upload: {e}")))?;
                file = Some((filename, content_type, bytes.to_vec()));
            }
            // Unknown fields are ignored rather than rejected.
            _ => {}
        }
    }

    let subject_id =
        subject_id.ok_or_else(|| ApiError::Validation("subject_id is required".to_string()))?;
    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation("note title must not be empty".to_string()))?;
    let (filename, content_type, bytes) =
        file.ok_or_else(|| ApiError::Validation("a PDF file is required".to_string()))?;
    if bytes.is_empty() {
        return Err(ApiError::Validation("a PDF file is required".to_string()));
    }

    // Unique, structured object key (e.g., 'notes/UUID.pdf'); the extension is
    // derived from the uploaded filename.
    let extension = std::path::Path::new(&filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("pdf");
    let object_key = format!("notes/{}.{}", Uuid::new_v4(), extension);

    let file_url = state
        .storage
        .upload(&object_key, bytes, &content_type)
        .await
        .map_err(|e| {
            tracing::error!("storage upload failed: {}", e);
            ApiError::Upstream("file upload failed".to_string())
        })?;

    let note = state
        .repo
        .create_note(&actor, subject_id, title, file_url)
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// delete_note
///
/// [Admin Route] Removes a note row. The stored PDF stays in the bucket;
/// content URLs are immutable and cheap to keep.
#[utoipa::path(
    delete,
    path = "/admin/notes/{id}",
    params(("id" = Uuid, Path, description = "Note ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_note(
    actor: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repo.delete_note(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// create_video
///
/// [Admin Route] Registers a video under a subject. The URL points at an
/// external host (typically YouTube); nothing is downloaded or stored.
#[utoipa::path(
    post,
    path = "/admin/videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Created", body = Video),
        (status = 400, description = "Missing title or URL", body = ErrorBody)
    )
)]
pub async fn create_video(
    actor: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateVideoRequest>,
) -> Result<(StatusCode, Json<Video>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation(
            "video title must not be empty".to_string(),
        ));
    }
    if !payload.video_url.starts_with("http") {
        return Err(ApiError::Validation(
            "video_url must be an http(s) URL".to_string(),
        ));
    }
    let video = state.repo.create_video(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

/// delete_video
///
/// [Admin Route] Removes a video row.
#[utoipa::path(
    delete,
    path = "/admin/videos/{id}",
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_video(
    actor: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.repo.delete_video(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// get_admin_stats
///
/// [Admin Route] Retrieves core application statistics for the dashboard.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Stats", body = AdminDashboardStats),
        (status = 403, description = "Not an admin", body = ErrorBody)
    )
)]
pub async fn get_admin_stats(
    actor: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardStats>, ApiError> {
    Ok(Json(state.repo.get_stats(&actor).await?))
}
