use study_portal::auth::AuthUser;
use study_portal::authz::{Permission, check, content_visible};
use uuid::Uuid;

// --- Test Identities ---

fn account(has_access: bool, is_admin: bool) -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        email: "someone@example.com".to_string(),
        has_access,
        is_admin,
    }
}

// --- Permission Matrix ---

#[test]
fn subjects_are_visible_to_every_authenticated_account() {
    // Even a freshly provisioned, unapproved account may browse subjects.
    assert!(check(&account(false, false), Permission::ViewSubjects).is_ok());
    assert!(check(&account(true, false), Permission::ViewSubjects).is_ok());
    assert!(check(&account(true, true), Permission::ViewSubjects).is_ok());
}

#[test]
fn content_requires_the_access_flag() {
    assert!(check(&account(false, false), Permission::ViewContent).is_err());
    assert!(check(&account(true, false), Permission::ViewContent).is_ok());
    // Admin status alone does not imply the access flag.
    assert!(check(&account(false, true), Permission::ViewContent).is_err());
}

#[test]
fn content_management_requires_the_admin_flag() {
    assert!(check(&account(true, false), Permission::ManageContent).is_err());
    assert!(check(&account(false, false), Permission::ManageContent).is_err());
    assert!(check(&account(false, true), Permission::ManageContent).is_ok());
}

#[test]
fn account_management_requires_the_admin_flag() {
    assert!(check(&account(true, false), Permission::ManageAccounts).is_err());
    assert!(check(&account(false, true), Permission::ManageAccounts).is_ok());
}

#[test]
fn an_account_may_always_read_its_own_record() {
    let me = account(false, false);
    assert!(check(&me, Permission::ReadAccount(me.id)).is_ok());

    // But not someone else's.
    let other = Uuid::new_v4();
    assert!(check(&me, Permission::ReadAccount(other)).is_err());

    // Admins may read anyone's.
    let admin = account(false, true);
    assert!(check(&admin, Permission::ReadAccount(other)).is_ok());
}

#[test]
fn denials_carry_a_reason() {
    let denied = check(&account(true, false), Permission::ManageContent).unwrap_err();
    assert!(!denied.reason().is_empty());
}

#[test]
fn content_visibility_mirrors_the_view_content_permission() {
    assert!(!content_visible(&account(false, false)));
    assert!(content_visible(&account(true, false)));
    assert!(!content_visible(&account(false, true)));
}
