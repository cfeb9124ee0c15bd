/// Router Module Index
///
/// Organizes routing into access-tier modules. Reads are anonymous, writes are
/// admin-only, and the tiers share paths (GET /about is public, PUT /about is
/// not), so enforcement lives in the `AuthUser` extractor plus the
/// `require_admin` gate inside each write handler rather than in a path-scoped
/// middleware layer.

/// Routes accessible to all users (anonymous, read-only) plus login.
pub mod public;

/// Routes requiring a validated session of any role.
pub mod authenticated;

/// Write routes restricted to the 'admin' role.
pub mod admin;
