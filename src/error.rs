use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;

/// ApiError
///
/// The single error taxonomy shared by every endpoint. Each variant carries
/// enough context for the client-facing message, and `IntoResponse` maps it to
/// the standard `{ success: false, error }` envelope with the matching status:
///
/// - validation failure        -> 400
/// - duplicate key             -> 400 ("already exists")
/// - missing/invalid auth      -> 401
/// - not found                 -> 404
/// - wrong method              -> 405
/// - storage / database / bug  -> 500
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    AlreadyExists(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Shorthand for the "<resource> not found" message shape used by every
    /// single-record endpoint.
    pub fn not_found(resource: &str) -> Self {
        ApiError::NotFound(format!("{resource} not found"))
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Not authorized to access this route".to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Database(_) | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Maps persistence failures into the API taxonomy. Unique-constraint
/// violations (SQLSTATE 23505) become client errors, everything else is an
/// opaque 500. The constraint name tells us which resource collided.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.code().as_deref() == Some("23505") {
                let msg = match db.constraint() {
                    Some(c) if c.contains("slug") => "Project with this id already exists",
                    Some(c) if c.contains("email") => "User with this email already exists",
                    _ => "Record already exists",
                };
                return ApiError::AlreadyExists(msg.to_string());
            }
        }
        ApiError::Database(err)
    }
}

impl From<crate::storage::StorageError> for ApiError {
    fn from(err: crate::storage::StorageError) -> Self {
        ApiError::Storage(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal failure details go to the logs, never to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "Server error".to_string()
        } else {
            self.to_string()
        };

        let body = serde_json::json!({
            "success": false,
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
