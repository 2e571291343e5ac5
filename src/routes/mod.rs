/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules,
/// enforcing a Defense-in-Depth strategy. This structure ensures that
/// access control is applied explicitly at the module level (via Axum layers),
/// preventing accidental exposure of protected endpoints.
///
/// The three modules map directly to the defined access roles.

/// Routes accessible to all clients (anonymous): liveness and the sign-in
/// link request.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a validated session; content visibility is enforced at the
/// Repository level via the access flag.
pub mod authenticated;

/// Routes restricted exclusively to accounts with the admin flag.
/// Implements mandatory authorization checks.
pub mod admin;
