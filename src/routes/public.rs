use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints accessible to any client, anonymous or logged-in: the read side
/// of every resource plus the login gateway. List endpoints accept an
/// `?active=true` filter so the public site only renders live records while
/// the admin UI sees everything.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness probe for monitors and load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/login
        // Exchanges admin credentials for a bearer token.
        .route("/auth/login", post(handlers::login))
        // GET /about
        // The single profile document (or data: null on a fresh deployment).
        .route("/about", get(handlers::get_about))
        // GET /education?active=true
        // Timeline entries, sorted by sort_order then most recent start year.
        .route("/education", get(handlers::list_education))
        // GET /projects?active=true
        // Showcased projects, sorted by sort_order then recency.
        .route("/projects", get(handlers::list_projects))
        // GET /projects/{slug}
        // Single project detail, addressed by its public slug.
        .route("/projects/{slug}", get(handlers::get_project_details))
        // GET /skills?category=...&active=true
        // Skill chips, optionally narrowed to one category.
        .route("/skills", get(handlers::list_skills))
}
