use uuid::Uuid;

use crate::auth::AuthUser;

/// Permission
///
/// The complete set of rights an operation can require. Every data-access
/// entry point names the permission it needs and asks `check` with the
/// request-scoped identity; there is no ambient "current user" anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Browse the subjects list/detail. Open to any authenticated account.
    ViewSubjects,
    /// Read note/video rows. Requires the access flag.
    ViewContent,
    /// Create, update, or delete subjects, notes, or videos. Admin only.
    ManageContent,
    /// List accounts or change another account's flags. Admin only.
    ManageAccounts,
    /// Read a specific account row. The owner may always read their own.
    ReadAccount(Uuid),
}

/// AccessDenied
///
/// The rejection produced by a failed check. Carries a human-readable reason
/// that ends up verbatim in the error response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDenied(&'static str);

impl AccessDenied {
    pub fn reason(&self) -> &'static str {
        self.0
    }
}

/// check
///
/// The single authorization decision function. The match is exhaustive and
/// every arm computes an explicit allow; anything that does not evaluate to
/// true is denied. Denial never depends on the caller remembering to handle
/// a missing rule.
pub fn check(actor: &AuthUser, permission: Permission) -> Result<(), AccessDenied> {
    let allowed = match permission {
        // Subjects are the navigation skeleton of the app and are visible to
        // every signed-in account, approved or not.
        Permission::ViewSubjects => true,
        Permission::ViewContent => actor.has_access,
        Permission::ManageContent => actor.is_admin,
        Permission::ManageAccounts => actor.is_admin,
        Permission::ReadAccount(id) => actor.is_admin || actor.id == id,
    };

    if allowed {
        Ok(())
    } else {
        Err(AccessDenied(denial_reason(permission)))
    }
}

/// content_visible
///
/// Row-visibility form of the `ViewContent` check. Listing endpoints use this
/// to collapse unauthorized reads into an empty result set instead of an
/// error, mirroring row-level-security semantics: rows the caller may not
/// see simply do not exist for them.
pub fn content_visible(actor: &AuthUser) -> bool {
    check(actor, Permission::ViewContent).is_ok()
}

fn denial_reason(permission: Permission) -> &'static str {
    match permission {
        Permission::ViewSubjects => "account may not browse subjects",
        Permission::ViewContent => "account has not been granted access",
        Permission::ManageContent => "only administrators may manage content",
        Permission::ManageAccounts => "only administrators may manage accounts",
        Permission::ReadAccount(_) => "account records are private",
    }
}
