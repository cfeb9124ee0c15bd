use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Routes requiring a valid session of any role. With a single-admin system
/// this tier is small: just the token introspection endpoint the admin UI
/// calls on load to decide whether its stored token is still good.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        // GET /auth/me
        // Returns the identity resolved from the bearer token.
        .route("/auth/me", get(handlers::get_me))
}
