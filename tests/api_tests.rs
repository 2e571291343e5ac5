use chrono::Utc;
use std::sync::Arc;
use study_portal::{
    AppConfig, AppState, MockStorageService, create_router,
    models::{Account, NoteWithSubject, Subject, Video, VideoWithSubject},
    repository::{MemoryRepository, RepositoryState},
    storage::StorageState,
};
use tokio::net::TcpListener;
use uuid::Uuid;

#[derive(Debug)]
pub struct TestApp {
    pub address: String,
    pub admin_id: Uuid,
    pub student_id: Uuid,
}

/// Boots the full router (middleware stack included) on an ephemeral port,
/// backed by the in-memory repository and mock storage. Authentication uses
/// the Env::Local 'x-user-id' bypass against two seeded accounts: an admin
/// and an unapproved student.
async fn spawn_app(storage: MockStorageService) -> TestApp {
    let repo = Arc::new(MemoryRepository::new());

    let admin_id = Uuid::new_v4();
    repo.seed_account(Account {
        id: admin_id,
        email: "admin@test.com".to_string(),
        has_access: true,
        is_admin: true,
        access_revoked_at: None,
        created_at: Utc::now(),
    });

    let student_id = Uuid::new_v4();
    repo.seed_account(Account {
        id: student_id,
        email: "student@test.com".to_string(),
        has_access: false,
        is_admin: false,
        access_revoked_at: None,
        created_at: Utc::now(),
    });

    let state = AppState {
        repo: repo as RepositoryState,
        storage: Arc::new(storage) as StorageState,
        config: AppConfig::default(),
    };
    let router = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp {
        address,
        admin_id,
        student_id,
    }
}

fn multipart_note_body(boundary: &str, subject_id: Uuid, title: &str) -> String {
    format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"subject_id\"\r\n\r\n\
         {subject_id}\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"title\"\r\n\r\n\
         {title}\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"document.pdf\"\r\n\
         Content-Type: application/pdf\r\n\r\n\
         %PDF-1.4 test payload\r\n\
         --{b}--\r\n",
        b = boundary
    )
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app(MockStorageService::new()).await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("req fail");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_unauthenticated_requests_are_rejected() {
    let app = spawn_app(MockStorageService::new()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/subjects", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("{}/admin/accounts", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_non_admin_writes_are_forbidden() {
    let app = spawn_app(MockStorageService::new()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/admin/subjects", app.address))
        .header("x-user-id", app.student_id.to_string())
        .json(&serde_json::json!({ "name": "Chemistry" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_content_lifecycle_with_access_approval() {
    let app = spawn_app(MockStorageService::new()).await;
    let client = reqwest::Client::new();

    // 1. Admin creates the "Mathematics" subject.
    let response = client
        .post(format!("{}/admin/subjects", app.address))
        .header("x-user-id", app.admin_id.to_string())
        .json(&serde_json::json!({ "name": "Mathematics", "description": "Numbers and proofs" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let subject: Subject = response.json().await.unwrap();

    // 2. Admin uploads the "Calculus Fundamentals" note under it.
    let boundary = "portal-test-boundary";
    let response = client
        .post(format!("{}/admin/notes", app.address))
        .header("x-user-id", app.admin_id.to_string())
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(multipart_note_body(
            boundary,
            subject.id,
            "Calculus Fundamentals",
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    // 3. The unapproved student can see the subject, but the notes list is empty.
    let response = client
        .get(format!("{}/subjects", app.address))
        .header("x-user-id", app.student_id.to_string())
        .send()
        .await
        .unwrap();
    let subjects: Vec<Subject> = response.json().await.unwrap();
    assert_eq!(subjects.len(), 1);

    let response = client
        .get(format!("{}/notes", app.address))
        .header("x-user-id", app.student_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let notes: Vec<NoteWithSubject> = response.json().await.unwrap();
    assert!(notes.is_empty(), "unapproved account must see no notes");

    // 4. Admin approves the student.
    let response = client
        .put(format!(
            "{}/admin/accounts/{}/flags",
            app.address, app.student_id
        ))
        .header("x-user-id", app.admin_id.to_string())
        .json(&serde_json::json!({ "has_access": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // 5. The very next query returns the note, joined with its subject name.
    let response = client
        .get(format!("{}/notes", app.address))
        .header("x-user-id", app.student_id.to_string())
        .send()
        .await
        .unwrap();
    let notes: Vec<NoteWithSubject> = response.json().await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "Calculus Fundamentals");
    assert_eq!(notes[0].subject_name, "Mathematics");
    assert!(notes[0].file_url.contains("mock-bucket"));

    // 6. Deleting the subject cascades; the notes list is empty again.
    let response = client
        .delete(format!("{}/admin/subjects/{}", app.address, subject.id))
        .header("x-user-id", app.admin_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/notes", app.address))
        .header("x-user-id", app.student_id.to_string())
        .send()
        .await
        .unwrap();
    let notes: Vec<NoteWithSubject> = response.json().await.unwrap();
    assert!(notes.is_empty(), "cascade delete must leave no orphans");
}

#[tokio::test]
async fn test_video_lifecycle() {
    let app = spawn_app(MockStorageService::new()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/admin/subjects", app.address))
        .header("x-user-id", app.admin_id.to_string())
        .json(&serde_json::json!({ "name": "Physics" }))
        .send()
        .await
        .unwrap();
    let subject: Subject = response.json().await.unwrap();

    let response = client
        .post(format!("{}/admin/videos", app.address))
        .header("x-user-id", app.admin_id.to_string())
        .json(&serde_json::json!({
            "subject_id": subject.id,
            "title": "Optics Lecture",
            "video_url": "https://www.youtube.com/watch?v=optics"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let video: Video = response.json().await.unwrap();

    // The admin has the access flag in the seed, so the listing shows it.
    let response = client
        .get(format!("{}/videos?subject_id={}", app.address, subject.id))
        .header("x-user-id", app.admin_id.to_string())
        .send()
        .await
        .unwrap();
    let videos: Vec<VideoWithSubject> = response.json().await.unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].subject_name, "Physics");

    let response = client
        .delete(format!("{}/admin/videos/{}", app.address, video.id))
        .header("x-user-id", app.admin_id.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn test_note_upload_requires_a_file() {
    let app = spawn_app(MockStorageService::new()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/admin/subjects", app.address))
        .header("x-user-id", app.admin_id.to_string())
        .json(&serde_json::json!({ "name": "Mathematics" }))
        .send()
        .await
        .unwrap();
    let subject: Subject = response.json().await.unwrap();

    // Multipart body with no file field.
    let boundary = "portal-test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"subject_id\"\r\n\r\n\
         {}\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"title\"\r\n\r\n\
         No Document\r\n\
         --{b}--\r\n",
        subject.id,
        b = boundary
    );
    let response = client
        .post(format!("{}/admin/notes", app.address))
        .header("x-user-id", app.admin_id.to_string())
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_note_upload_surfaces_storage_failure() {
    let app = spawn_app(MockStorageService::new_failing()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/admin/subjects", app.address))
        .header("x-user-id", app.admin_id.to_string())
        .json(&serde_json::json!({ "name": "Mathematics" }))
        .send()
        .await
        .unwrap();
    let subject: Subject = response.json().await.unwrap();

    let boundary = "portal-test-boundary";
    let response = client
        .post(format!("{}/admin/notes", app.address))
        .header("x-user-id", app.admin_id.to_string())
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(multipart_note_body(boundary, subject.id, "Doomed Upload"))
        .send()
        .await
        .unwrap();

    // The storage failure is reported, not swallowed; and the service stays up.
    assert_eq!(response.status(), 502);
    let health = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .unwrap();
    assert!(health.status().is_success());
}
