use crate::auth::AuthUser;
use crate::authz::{self, Permission};
use crate::error::ApiError;
use crate::models::{
    Account, AdminDashboardStats, CreateSubjectRequest, CreateVideoRequest, Note, NoteWithSubject,
    Subject, UpdateAccountFlagsRequest, UpdateSubjectRequest, Video, VideoWithSubject,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (Postgres, Memory, etc.).
///
/// Every gated method takes the request-scoped `AuthUser` and runs the
/// authorization check before touching any rows, so the visibility and
/// mutation rules hold for every caller of the data layer, not just the
/// HTTP handlers.
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable and usable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Accounts ---
    // Pre-authentication lookup used by the auth extractor; no actor exists yet.
    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, ApiError>;
    // Idempotent provisioning: first sight of an identity creates its row with
    // zero privilege; repeated calls return the existing row unchanged.
    async fn ensure_account(&self, id: Uuid, email: &str) -> Result<Account, ApiError>;
    // Admin access: every account, newest first.
    async fn list_accounts(&self, actor: &AuthUser) -> Result<Vec<Account>, ApiError>;
    // Admin action: partial update of the privilege flags. Removing access
    // stamps `access_revoked_at`; re-granting clears it.
    async fn set_account_flags(
        &self,
        actor: &AuthUser,
        id: Uuid,
        req: UpdateAccountFlagsRequest,
    ) -> Result<Account, ApiError>;

    // --- Subjects ---
    async fn list_subjects(&self, actor: &AuthUser) -> Result<Vec<Subject>, ApiError>;
    async fn get_subject(&self, actor: &AuthUser, id: Uuid) -> Result<Subject, ApiError>;
    async fn create_subject(
        &self,
        actor: &AuthUser,
        req: CreateSubjectRequest,
    ) -> Result<Subject, ApiError>;
    async fn update_subject(
        &self,
        actor: &AuthUser,
        id: Uuid,
        req: UpdateSubjectRequest,
    ) -> Result<Subject, ApiError>;
    // Deleting a subject cascades to all of its notes and videos.
    async fn delete_subject(&self, actor: &AuthUser, id: Uuid) -> Result<(), ApiError>;

    // --- Notes ---
    // Joined with the subject name. Accounts without the access flag see an
    // empty list, never an error (row-visibility semantics).
    async fn list_notes(
        &self,
        actor: &AuthUser,
        subject_id: Option<Uuid>,
    ) -> Result<Vec<NoteWithSubject>, ApiError>;
    async fn create_note(
        &self,
        actor: &AuthUser,
        subject_id: Uuid,
        title: String,
        file_url: String,
    ) -> Result<Note, ApiError>;
    async fn delete_note(&self, actor: &AuthUser, id: Uuid) -> Result<(), ApiError>;

    // --- Videos ---
    async fn list_videos(
        &self,
        actor: &AuthUser,
        subject_id: Option<Uuid>,
    ) -> Result<Vec<VideoWithSubject>, ApiError>;
    async fn create_video(
        &self,
        actor: &AuthUser,
        req: CreateVideoRequest,
    ) -> Result<Video, ApiError>;
    async fn delete_video(&self, actor: &AuthUser, id: Uuid) -> Result<(), ApiError>;

    // --- Dashboard ---
    async fn get_stats(&self, actor: &AuthUser) -> Result<AdminDashboardStats, ApiError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACCOUNT_COLUMNS: &str = "id, email, has_access, is_admin, access_revoked_at, created_at";

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, ApiError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    /// ensure_account
    ///
    /// Single round-trip provisioning. The `ON CONFLICT .. DO UPDATE SET email =
    /// EXCLUDED.email` clause makes the statement return the row in both the
    /// first-sight and the already-provisioned case, so repeated authentication
    /// can never create a duplicate.
    async fn ensure_account(&self, id: Uuid, email: &str) -> Result<Account, ApiError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO accounts (id, email, has_access, is_admin, created_at)
            VALUES ($1, $2, false, false, NOW())
            ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(account)
    }

    async fn list_accounts(&self, actor: &AuthUser) -> Result<Vec<Account>, ApiError> {
        authz::check(actor, Permission::ManageAccounts)?;

        let accounts = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts)
    }

    /// set_account_flags
    ///
    /// Uses the PostgreSQL `COALESCE` function to efficiently handle `Option<T>`
    /// fields, only updating a column if the corresponding field in `req` is `Some`.
    /// The CASE arm stamps `access_revoked_at` exactly when access transitions
    /// from granted to removed, and clears it on re-grant.
    async fn set_account_flags(
        &self,
        actor: &AuthUser,
        id: Uuid,
        req: UpdateAccountFlagsRequest,
    ) -> Result<Account, ApiError> {
        authz::check(actor, Permission::ManageAccounts)?;

        sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE accounts
            SET has_access = COALESCE($2, has_access),
                is_admin = COALESCE($3, is_admin),
                access_revoked_at = CASE
                    WHEN $2 = false AND has_access = true THEN NOW()
                    WHEN $2 = true THEN NULL
                    ELSE access_revoked_at
                END
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(req.has_access)
        .bind(req.is_admin)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound)
    }

    async fn list_subjects(&self, actor: &AuthUser) -> Result<Vec<Subject>, ApiError> {
        authz::check(actor, Permission::ViewSubjects)?;

        let subjects = sqlx::query_as::<_, Subject>(
            "SELECT id, name, description, created_at FROM subjects ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(subjects)
    }

    async fn get_subject(&self, actor: &AuthUser, id: Uuid) -> Result<Subject, ApiError> {
        authz::check(actor, Permission::ViewSubjects)?;

        sqlx::query_as::<_, Subject>(
            "SELECT id, name, description, created_at FROM subjects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound)
    }

    async fn create_subject(
        &self,
        actor: &AuthUser,
        req: CreateSubjectRequest,
    ) -> Result<Subject, ApiError> {
        authz::check(actor, Permission::ManageContent)?;

        let subject = sqlx::query_as::<_, Subject>(
            r#"
            INSERT INTO subjects (id, name, description, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(subject)
    }

    async fn update_subject(
        &self,
        actor: &AuthUser,
        id: Uuid,
        req: UpdateSubjectRequest,
    ) -> Result<Subject, ApiError> {
        authz::check(actor, Permission::ManageContent)?;

        sqlx::query_as::<_, Subject>(
            r#"
            UPDATE subjects
            SET name = COALESCE($2, name),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(id)
        .bind(req.name)
        .bind(req.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound)
    }

    /// delete_subject
    ///
    /// A single DELETE; the `ON DELETE CASCADE` foreign keys on notes and videos
    /// remove all owned content in the same statement.
    async fn delete_subject(&self, actor: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        authz::check(actor, Permission::ManageContent)?;

        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            Ok(())
        } else {
            Err(ApiError::NotFound)
        }
    }

    /// list_notes
    ///
    /// Implements flexible filtering using QueryBuilder for safe parameterization.
    /// **Visibility**: accounts without the access flag get an empty set before
    /// any SQL runs; the rows simply do not exist for them.
    async fn list_notes(
        &self,
        actor: &AuthUser,
        subject_id: Option<Uuid>,
    ) -> Result<Vec<NoteWithSubject>, ApiError> {
        if !authz::content_visible(actor) {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            r#"
            SELECT n.id, n.subject_id, s.name AS subject_name, n.title, n.file_url, n.created_at
            FROM notes n
            JOIN subjects s ON n.subject_id = s.id
            "#,
        );

        if let Some(subject) = subject_id {
            builder.push(" WHERE n.subject_id = ");
            builder.push_bind(subject);
        }

        builder.push(" ORDER BY n.created_at DESC");

        let notes = builder
            .build_query_as::<NoteWithSubject>()
            .fetch_all(&self.pool)
            .await?;
        Ok(notes)
    }

    async fn create_note(
        &self,
        actor: &AuthUser,
        subject_id: Uuid,
        title: String,
        file_url: String,
    ) -> Result<Note, ApiError> {
        authz::check(actor, Permission::ManageContent)?;

        // A dangling subject_id trips the foreign key, which surfaces as a
        // validation failure via the sqlx error mapping.
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (id, subject_id, title, file_url, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, subject_id, title, file_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(subject_id)
        .bind(title)
        .bind(file_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(note)
    }

    async fn delete_note(&self, actor: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        authz::check(actor, Permission::ManageContent)?;

        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            Ok(())
        } else {
            Err(ApiError::NotFound)
        }
    }

    async fn list_videos(
        &self,
        actor: &AuthUser,
        subject_id: Option<Uuid>,
    ) -> Result<Vec<VideoWithSubject>, ApiError> {
        if !authz::content_visible(actor) {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            r#"
            SELECT v.id, v.subject_id, s.name AS subject_name, v.title, v.video_url, v.created_at
            FROM videos v
            JOIN subjects s ON v.subject_id = s.id
            "#,
        );

        if let Some(subject) = subject_id {
            builder.push(" WHERE v.subject_id = ");
            builder.push_bind(subject);
        }

        builder.push(" ORDER BY v.created_at DESC");

        let videos = builder
            .build_query_as::<VideoWithSubject>()
            .fetch_all(&self.pool)
            .await?;
        Ok(videos)
    }

    async fn create_video(
        &self,
        actor: &AuthUser,
        req: CreateVideoRequest,
    ) -> Result<Video, ApiError> {
        authz::check(actor, Permission::ManageContent)?;

        let video = sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (id, subject_id, title, video_url, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, subject_id, title, video_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.subject_id)
        .bind(req.title)
        .bind(req.video_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(video)
    }

    async fn delete_video(&self, actor: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        authz::check(actor, Permission::ManageContent)?;

        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            Ok(())
        } else {
            Err(ApiError::NotFound)
        }
    }

    /// get_stats
    ///
    /// Compiles all necessary counters for the administrative dashboard in a single call.
    async fn get_stats(&self, actor: &AuthUser) -> Result<AdminDashboardStats, ApiError> {
        authz::check(actor, Permission::ManageAccounts)?;

        let total_accounts = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;
        let pending_accounts = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM accounts WHERE has_access = false",
        )
        .fetch_one(&self.pool)
        .await?;
        let total_subjects = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subjects")
            .fetch_one(&self.pool)
            .await?;
        let total_notes = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notes")
            .fetch_one(&self.pool)
            .await?;
        let total_videos = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM videos")
            .fetch_one(&self.pool)
            .await?;

        Ok(AdminDashboardStats {
            total_accounts,
            pending_accounts,
            total_subjects,
            total_notes,
            total_videos,
        })
    }
}

// --- In-Memory Implementation (For Tests and Local Prototyping) ---

#[derive(Default)]
struct MemoryInner {
    accounts: Vec<Account>,
    subjects: Vec<Subject>,
    notes: Vec<Note>,
    videos: Vec<Video>,
}

/// MemoryRepository
///
/// An in-memory implementation of `Repository` with the same authorization,
/// provisioning, and cascade semantics as the Postgres implementation. Used
/// by the test suites (and handy for running the service without a database).
#[derive(Default)]
pub struct MemoryRepository {
    inner: Mutex<MemoryInner>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account row directly, bypassing provisioning. Test setup helper.
    pub fn seed_account(&self, account: Account) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.accounts.push(account);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>, ApiError> {
        self.inner
            .lock()
            .map_err(|_| ApiError::Database("memory store poisoned".to_string()))
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, ApiError> {
        let inner = self.lock()?;
        Ok(inner.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn ensure_account(&self, id: Uuid, email: &str) -> Result<Account, ApiError> {
        let mut inner = self.lock()?;
        if let Some(existing) = inner.accounts.iter().find(|a| a.id == id) {
            return Ok(existing.clone());
        }
        let account = Account {
            id,
            email: email.to_string(),
            has_access: false,
            is_admin: false,
            access_revoked_at: None,
            created_at: Utc::now(),
        };
        inner.accounts.push(account.clone());
        Ok(account)
    }

    async fn list_accounts(&self, actor: &AuthUser) -> Result<Vec<Account>, ApiError> {
        authz::check(actor, Permission::ManageAccounts)?;
        let inner = self.lock()?;
        let mut accounts = inner.accounts.clone();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    async fn set_account_flags(
        &self,
        actor: &AuthUser,
        id: Uuid,
        req: UpdateAccountFlagsRequest,
    ) -> Result<Account, ApiError> {
        authz::check(actor, Permission::ManageAccounts)?;
        let mut inner = self.lock()?;
        let account = inner
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ApiError::NotFound)?;

        if let Some(has_access) = req.has_access {
            // Same stamping rule as the SQL CASE arm.
            if !has_access && account.has_access {
                account.access_revoked_at = Some(Utc::now());
            } else if has_access {
                account.access_revoked_at = None;
            }
            account.has_access = has_access;
        }
        if let Some(is_admin) = req.is_admin {
            account.is_admin = is_admin;
        }
        Ok(account.clone())
    }

    async fn list_subjects(&self, actor: &AuthUser) -> Result<Vec<Subject>, ApiError> {
        authz::check(actor, Permission::ViewSubjects)?;
        let inner = self.lock()?;
        let mut subjects = inner.subjects.clone();
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subjects)
    }

    async fn get_subject(&self, actor: &AuthUser, id: Uuid) -> Result<Subject, ApiError> {
        authz::check(actor, Permission::ViewSubjects)?;
        let inner = self.lock()?;
        inner
            .subjects
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn create_subject(
        &self,
        actor: &AuthUser,
        req: CreateSubjectRequest,
    ) -> Result<Subject, ApiError> {
        authz::check(actor, Permission::ManageContent)?;
        let mut inner = self.lock()?;
        let subject = Subject {
            id: Uuid::new_v4(),
            name: req.name,
            description: req.description,
            created_at: Utc::now(),
        };
        inner.subjects.push(subject.clone());
        Ok(subject)
    }

    async fn update_subject(
        &self,
        actor: &AuthUser,
        id: Uuid,
        req: UpdateSubjectRequest,
    ) -> Result<Subject, ApiError> {
        authz::check(actor, Permission::ManageContent)?;
        let mut inner = self.lock()?;
        let subject = inner
            .subjects
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ApiError::NotFound)?;
        if let Some(name) = req.name {
            subject.name = name;
        }
        if let Some(description) = req.description {
            subject.description = Some(description);
        }
        Ok(subject.clone())
    }

    async fn delete_subject(&self, actor: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        authz::check(actor, Permission::ManageContent)?;
        let mut inner = self.lock()?;
        let before = inner.subjects.len();
        inner.subjects.retain(|s| s.id != id);
        if inner.subjects.len() == before {
            return Err(ApiError::NotFound);
        }
        // Cascade: owned content goes with the subject.
        inner.notes.retain(|n| n.subject_id != id);
        inner.videos.retain(|v| v.subject_id != id);
        Ok(())
    }

    async fn list_notes(
        &self,
        actor: &AuthUser,
        subject_id: Option<Uuid>,
    ) -> Result<Vec<NoteWithSubject>, ApiError> {
        if !authz::content_visible(actor) {
            return Ok(Vec::new());
        }
        let inner = self.lock()?;
        let mut notes: Vec<NoteWithSubject> = inner
            .notes
            .iter()
            .filter(|n| subject_id.is_none_or(|s| n.subject_id == s))
            .filter_map(|n| {
                let subject = inner.subjects.iter().find(|s| s.id == n.subject_id)?;
                Some(NoteWithSubject {
                    id: n.id,
                    subject_id: n.subject_id,
                    subject_name: subject.name.clone(),
                    title: n.title.clone(),
                    file_url: n.file_url.clone(),
                    created_at: n.created_at,
                })
            })
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn create_note(
        &self,
        actor: &AuthUser,
        subject_id: Uuid,
        title: String,
        file_url: String,
    ) -> Result<Note, ApiError> {
        authz::check(actor, Permission::ManageContent)?;
        let mut inner = self.lock()?;
        if !inner.subjects.iter().any(|s| s.id == subject_id) {
            return Err(ApiError::Validation(
                "referenced subject does not exist".to_string(),
            ));
        }
        let note = Note {
            id: Uuid::new_v4(),
            subject_id,
            title,
            file_url,
            created_at: Utc::now(),
        };
        inner.notes.push(note.clone());
        Ok(note)
    }

    async fn delete_note(&self, actor: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        authz::check(actor, Permission::ManageContent)?;
        let mut inner = self.lock()?;
        let before = inner.notes.len();
        inner.notes.retain(|n| n.id != id);
        if inner.notes.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn list_videos(
        &self,
        actor: &AuthUser,
        subject_id: Option<Uuid>,
    ) -> Result<Vec<VideoWithSubject>, ApiError> {
        if !authz::content_visible(actor) {
            return Ok(Vec::new());
        }
        let inner = self.lock()?;
        let mut videos: Vec<VideoWithSubject> = inner
            .videos
            .iter()
            .filter(|v| subject_id.is_none_or(|s| v.subject_id == s))
            .filter_map(|v| {
                let subject = inner.subjects.iter().find(|s| s.id == v.subject_id)?;
                Some(VideoWithSubject {
                    id: v.id,
                    subject_id: v.subject_id,
                    subject_name: subject.name.clone(),
                    title: v.title.clone(),
                    video_url: v.video_url.clone(),
                    created_at: v.created_at,
                })
            })
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }

    async fn create_video(
        &self,
        actor: &AuthUser,
        req: CreateVideoRequest,
    ) -> Result<Video, ApiError> {
        authz::check(actor, Permission::ManageContent)?;
        let mut inner = self.lock()?;
        if !inner.subjects.iter().any(|s| s.id == req.subject_id) {
            return Err(ApiError::Validation(
                "referenced subject does not exist".to_string(),
            ));
        }
        let video = Video {
            id: Uuid::new_v4(),
            subject_id: req.subject_id,
            title: req.title,
            video_url: req.video_url,
            created_at: Utc::now(),
        };
        inner.videos.push(video.clone());
        Ok(video)
    }

    async fn delete_video(&self, actor: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        authz::check(actor, Permission::ManageContent)?;
        let mut inner = self.lock()?;
        let before = inner.videos.len();
        inner.videos.retain(|v| v.id != id);
        if inner.videos.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn get_stats(&self, actor: &AuthUser) -> Result<AdminDashboardStats, ApiError> {
        authz::check(actor, Permission::ManageAccounts)?;
        let inner = self.lock()?;
        Ok(AdminDashboardStats {
            total_accounts: inner.accounts.len() as i64,
            pending_accounts: inner.accounts.iter().filter(|a| !a.has_access).count() as i64,
            total_subjects: inner.subjects.len() as i64,
            total_notes: inner.notes.len() as i64,
            total_videos: inner.videos.len() as i64,
        })
    }
}
