use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{post, put},
};

/// Admin Router Module
///
/// The write side of every resource. Each handler here extracts `AuthUser`
/// (401 on missing/invalid token) and then calls `require_admin` (401 on any
/// other role), implementing the protect/authorize gate from the API contract.
///
/// Paths deliberately mirror the public read routes: the method, not the path,
/// separates the tiers.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // PUT /about
        // Upsert of the single About document (find-or-create).
        .route("/about", put(handlers::update_about))
        // POST /education, PUT/DELETE /education/{id}
        .route("/education", post(handlers::create_education))
        .route(
            "/education/{id}",
            put(handlers::update_education).delete(handlers::delete_education),
        )
        // POST /projects, PUT/DELETE /projects/{slug}
        // Creation enforces slug uniqueness (duplicate -> 400 "already exists").
        .route("/projects", post(handlers::create_project))
        .route(
            "/projects/{slug}",
            put(handlers::update_project).delete(handlers::delete_project),
        )
        // POST /skills, PUT/DELETE /skills/{id}
        .route("/skills", post(handlers::create_skill))
        .route(
            "/skills/{id}",
            put(handlers::update_skill).delete(handlers::delete_skill),
        )
        // POST /upload/presigned
        // Issues a short-lived direct-to-bucket upload URL for portfolio media.
        .route("/upload/presigned", post(handlers::get_upload_url))
}
