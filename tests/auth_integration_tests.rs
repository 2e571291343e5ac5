use axum::{
    extract::FromRequestParts,
    http::{Request, StatusCode, header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{sync::Arc, time::SystemTime};
use study_portal::{
    AppState,
    auth::{AuthUser, Claims},
    config::{AppConfig, Env},
    models::Account,
    repository::{MemoryRepository, Repository},
    storage::MockStorageService,
};
use uuid::Uuid;

// --- Test Utilities ---

fn test_state(repo: Arc<MemoryRepository>, config: AppConfig) -> AppState {
    AppState {
        repo,
        storage: Arc::new(MockStorageService::new()),
        config,
    }
}

fn now_secs() -> usize {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_secs() as usize
}

fn make_token(sub: Uuid, email: Option<&str>, iat: usize, exp: usize, secret: &str) -> String {
    let claims = Claims {
        sub,
        email: email.map(|e| e.to_string()),
        exp,
        iat,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token encoding failed")
}

fn parts_with_bearer(token: &str) -> Parts {
    let (parts, _) = Request::builder()
        .uri("/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(())
        .expect("request build failed")
        .into_parts();
    parts
}

fn bare_parts() -> Parts {
    let (parts, _) = Request::builder()
        .uri("/me")
        .body(())
        .expect("request build failed")
        .into_parts();
    parts
}

// --- Tests ---

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let state = test_state(Arc::new(MemoryRepository::new()), AppConfig::default());
    let mut parts = bare_parts();

    let result = AuthUser::from_request_parts(&mut parts, &state).await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_first_authentication_provisions_a_zero_privilege_account() {
    let repo = Arc::new(MemoryRepository::new());
    let config = AppConfig::default();
    let secret = config.jwt_secret.clone();
    let state = test_state(repo.clone(), config);

    let identity = Uuid::new_v4();
    let now = now_secs();
    let token = make_token(
        identity,
        Some("fresh@student.test"),
        now,
        now + 3600,
        &secret,
    );

    let mut parts = parts_with_bearer(&token);
    let user = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .expect("valid token must authenticate");

    // The account row now exists with both flags off.
    assert_eq!(user.id, identity);
    assert!(!user.has_access);
    assert!(!user.is_admin);

    let account = repo.get_account(identity).await.unwrap().unwrap();
    assert_eq!(account.email, "fresh@student.test");
    assert!(!account.has_access);

    // A second authentication resolves to the same single row.
    let mut parts = parts_with_bearer(&token);
    AuthUser::from_request_parts(&mut parts, &state)
        .await
        .expect("repeat authentication must succeed");

    let admin_probe = AuthUser {
        id: Uuid::new_v4(),
        email: "probe@test.com".to_string(),
        has_access: true,
        is_admin: true,
    };
    assert_eq!(repo.list_accounts(&admin_probe).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let config = AppConfig::default();
    let secret = config.jwt_secret.clone();
    let state = test_state(Arc::new(MemoryRepository::new()), config);

    let now = now_secs();
    // Well past the default validation leeway.
    let token = make_token(
        Uuid::new_v4(),
        Some("late@student.test"),
        now - 7200,
        now - 3600,
        &secret,
    );

    let mut parts = parts_with_bearer(&token);
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_wrong_secret_is_rejected() {
    let state = test_state(Arc::new(MemoryRepository::new()), AppConfig::default());

    let now = now_secs();
    let token = make_token(
        Uuid::new_v4(),
        Some("forged@student.test"),
        now,
        now + 3600,
        "some-other-secret",
    );

    let mut parts = parts_with_bearer(&token);
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_without_email_claim_cannot_provision() {
    let config = AppConfig::default();
    let secret = config.jwt_secret.clone();
    let state = test_state(Arc::new(MemoryRepository::new()), config);

    let now = now_secs();
    let token = make_token(Uuid::new_v4(), None, now, now + 3600, &secret);

    let mut parts = parts_with_bearer(&token);
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_local_bypass_header_resolves_seeded_account() {
    let repo = Arc::new(MemoryRepository::new());
    let id = Uuid::new_v4();
    repo.seed_account(Account {
        id,
        email: "dev@local.test".to_string(),
        has_access: true,
        is_admin: true,
        access_revoked_at: None,
        created_at: Utc::now(),
    });
    let state = test_state(repo, AppConfig::default());

    let (mut parts, _) = Request::builder()
        .uri("/me")
        .header("x-user-id", id.to_string())
        .body(())
        .expect("request build failed")
        .into_parts();

    let user = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .expect("local bypass must resolve the account");
    assert_eq!(user.id, id);
    assert!(user.is_admin);
}

#[tokio::test]
async fn test_bypass_header_is_inert_in_production() {
    let repo = Arc::new(MemoryRepository::new());
    let id = Uuid::new_v4();
    repo.seed_account(Account {
        id,
        email: "dev@local.test".to_string(),
        has_access: true,
        is_admin: true,
        access_revoked_at: None,
        created_at: Utc::now(),
    });
    let config = AppConfig {
        env: Env::Production,
        ..AppConfig::default()
    };
    let state = test_state(repo, config);

    let (mut parts, _) = Request::builder()
        .uri("/me")
        .header("x-user-id", id.to_string())
        .body(())
        .expect("request build failed")
        .into_parts();

    // Without a bearer token the request must fail, header or not.
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_access_removal_invalidates_old_sessions_when_enabled() {
    let repo = Arc::new(MemoryRepository::new());
    let id = Uuid::new_v4();
    // Access was removed after this token was issued.
    repo.seed_account(Account {
        id,
        email: "revoked@student.test".to_string(),
        has_access: false,
        is_admin: false,
        access_revoked_at: Some(Utc::now()),
        created_at: Utc::now(),
    });

    let config = AppConfig {
        revoke_sessions_on_access_removal: true,
        ..AppConfig::default()
    };
    let secret = config.jwt_secret.clone();
    let state = test_state(repo.clone(), config);

    let now = now_secs();
    let token = make_token(
        id,
        Some("revoked@student.test"),
        now - 600,
        now + 3600,
        &secret,
    );

    let mut parts = parts_with_bearer(&token);
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

    // With the policy disabled the same session stays signed in; it merely
    // has no content visibility.
    let state = test_state(repo, AppConfig::default());
    let mut parts = parts_with_bearer(&token);
    let user = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .expect("session must survive when the policy is off");
    assert!(!user.has_access);
}
