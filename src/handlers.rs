use crate::{
    AppState,
    auth::{self, AuthUser},
    error::ApiError,
    models::{
        About, AboutPayload, ApiResponse, CreateEducationRequest, CreateProjectRequest,
        CreateSkillRequest, Education, LoginRequest, LoginResponse, Project, PublicUser, Skill,
        UpdateEducationRequest, UpdateProjectRequest, UpdateSkillRequest, UploadUrlRequest,
        UploadUrlResponse,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

// --- Filter Structs ---

/// ListFilter
///
/// Query parameters shared by the list endpoints. `active` mirrors the original
/// contract: the literal string "true" restricts to active records, anything
/// else (or absence) returns everything.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ListFilter {
    pub active: Option<String>,
}

impl ListFilter {
    fn active_only(&self) -> bool {
        self.active.as_deref() == Some("true")
    }
}

/// SkillFilter
///
/// Skills additionally filter by category.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct SkillFilter {
    pub category: Option<String>,
    pub active: Option<String>,
}

// --- Auth Handlers ---

/// login
///
/// [Public Route] Exchanges admin credentials for a signed JWT.
/// Bad email, bad password, and inactive account are indistinguishable to the
/// caller: all three reply 401 "Invalid credentials".
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let user = state
        .repo
        .get_user_by_email(&payload.email)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !auth::verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = auth::generate_token(user.id, &state.config)?;

    Ok(Json(ApiResponse::data(LoginResponse {
        token,
        user: user.into(),
    })))
}

/// get_me
///
/// [Authenticated Route] Returns the identity resolved by the `AuthUser`
/// extractor. Lets the admin UI confirm a stored token is still valid.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses((status = 200, description = "Current user", body = PublicUser))
)]
pub async fn get_me(user: AuthUser) -> Json<ApiResponse<PublicUser>> {
    Json(ApiResponse::data(PublicUser {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    }))
}

// --- About Handlers ---

/// get_about
///
/// [Public Route] Returns the single About document, or `data: null` when
/// nothing has been stored yet (a fresh deployment is not an error).
#[utoipa::path(
    get,
    path = "/about",
    responses((status = 200, description = "About information", body = About))
)]
pub async fn get_about(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<About>>, ApiError> {
    let about = state.repo.get_about().await?;
    Ok(Json(ApiResponse::maybe(about)))
}

/// update_about
///
/// [Admin Route] Upserts the About document: updates the existing row when one
/// exists, creates it otherwise. Always replies 200 with the stored document.
#[utoipa::path(
    put,
    path = "/about",
    request_body = AboutPayload,
    responses((status = 200, description = "Stored", body = About))
)]
pub async fn update_about(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<AboutPayload>,
) -> Result<Json<ApiResponse<About>>, ApiError> {
    user.require_admin()?;
    payload.validate()?;
    let about = state.repo.upsert_about(payload).await?;
    Ok(Json(ApiResponse::data(about)))
}

// --- Education Handlers ---

/// list_education
///
/// [Public Route] Timeline entries, sorted by sort_order then most recent
/// start year. `?active=true` hides retired entries.
#[utoipa::path(
    get,
    path = "/education",
    params(ListFilter),
    responses((status = 200, description = "Education entries", body = [Education]))
)]
pub async fn list_education(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<ApiResponse<Vec<Education>>>, ApiError> {
    let entries = state.repo.list_education(filter.active_only()).await?;
    Ok(Json(ApiResponse::list(entries)))
}

/// create_education
///
/// [Admin Route] Adds a timeline entry.
#[utoipa::path(
    post,
    path = "/education",
    request_body = CreateEducationRequest,
    responses((status = 201, description = "Created", body = Education))
)]
pub async fn create_education(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateEducationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Education>>), ApiError> {
    user.require_admin()?;
    payload.validate()?;
    let entry = state.repo.create_education(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(entry))))
}

/// update_education
///
/// [Admin Route] Partial update; absent fields keep their stored values.
#[utoipa::path(
    put,
    path = "/education/{id}",
    params(("id" = Uuid, Path, description = "Education entry ID")),
    request_body = UpdateEducationRequest,
    responses(
        (status = 200, description = "Updated", body = Education),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_education(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEducationRequest>,
) -> Result<Json<ApiResponse<Education>>, ApiError> {
    user.require_admin()?;
    payload.validate()?;
    let entry = state
        .repo
        .update_education(id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Education"))?;
    Ok(Json(ApiResponse::data(entry)))
}

/// delete_education
///
/// [Admin Route] Removes a timeline entry. 200 with an empty data object on
/// success, 404 when the id does not exist.
#[utoipa::path(
    delete,
    path = "/education/{id}",
    params(("id" = Uuid, Path, description = "Education entry ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_education(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    user.require_admin()?;
    if state.repo.delete_education(id).await? {
        Ok(Json(ApiResponse::deleted("Education")))
    } else {
        Err(ApiError::not_found("Education"))
    }
}

// --- Project Handlers ---

/// list_projects
///
/// [Public Route] All showcased projects, sorted by sort_order then recency.
#[utoipa::path(
    get,
    path = "/projects",
    params(ListFilter),
    responses((status = 200, description = "Projects", body = [Project]))
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = state.repo.list_projects(filter.active_only()).await?;
    Ok(Json(ApiResponse::list(projects)))
}

/// get_project_details
///
/// [Public Route] Single project by its public slug.
#[utoipa::path(
    get,
    path = "/projects/{slug}",
    params(("slug" = String, Path, description = "Project slug")),
    responses(
        (status = 200, description = "Found", body = Project),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_project_details(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let project = state
        .repo
        .get_project(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Project"))?;
    Ok(Json(ApiResponse::data(project)))
}

/// create_project
///
/// [Admin Route] Adds a project. The unique index on slug turns a duplicate
/// submission into a 400 "already exists" via the error mapping.
#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Created", body = Project),
        (status = 400, description = "Validation failure or duplicate slug")
    )
)]
pub async fn create_project(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), ApiError> {
    user.require_admin()?;
    payload.validate()?;
    let project = state.repo.create_project(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(project))))
}

/// update_project
///
/// [Admin Route] Partial update addressed by slug; the slug itself is immutable.
#[utoipa::path(
    put,
    path = "/projects/{slug}",
    params(("slug" = String, Path, description = "Project slug")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Updated", body = Project),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    user.require_admin()?;
    payload.validate()?;
    let project = state
        .repo
        .update_project(&slug, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Project"))?;
    Ok(Json(ApiResponse::data(project)))
}

/// delete_project
///
/// [Admin Route] Removes a project by slug.
#[utoipa::path(
    delete,
    path = "/projects/{slug}",
    params(("slug" = String, Path, description = "Project slug")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_project(
    user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    user.require_admin()?;
    if state.repo.delete_project(&slug).await? {
        Ok(Json(ApiResponse::deleted("Project")))
    } else {
        Err(ApiError::not_found("Project"))
    }
}

// --- Skill Handlers ---

/// list_skills
///
/// [Public Route] Skill chips, optionally narrowed to one category.
#[utoipa::path(
    get,
    path = "/skills",
    params(SkillFilter),
    responses((status = 200, description = "Skills", body = [Skill]))
)]
pub async fn list_skills(
    State(state): State<AppState>,
    Query(filter): Query<SkillFilter>,
) -> Result<Json<ApiResponse<Vec<Skill>>>, ApiError> {
    let active_only = filter.active.as_deref() == Some("true");
    let skills = state.repo.list_skills(filter.category, active_only).await?;
    Ok(Json(ApiResponse::list(skills)))
}

/// create_skill
///
/// [Admin Route] Adds a skill; category and level are checked against the
/// closed sets.
#[utoipa::path(
    post,
    path = "/skills",
    request_body = CreateSkillRequest,
    responses((status = 201, description = "Created", body = Skill))
)]
pub async fn create_skill(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateSkillRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Skill>>), ApiError> {
    user.require_admin()?;
    payload.validate()?;
    let skill = state.repo.create_skill(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(skill))))
}

/// update_skill
///
/// [Admin Route] Partial update of a skill.
#[utoipa::path(
    put,
    path = "/skills/{id}",
    params(("id" = Uuid, Path, description = "Skill ID")),
    request_body = UpdateSkillRequest,
    responses(
        (status = 200, description = "Updated", body = Skill),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_skill(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSkillRequest>,
) -> Result<Json<ApiResponse<Skill>>, ApiError> {
    user.require_admin()?;
    payload.validate()?;
    let skill = state
        .repo
        .update_skill(id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Skill"))?;
    Ok(Json(ApiResponse::data(skill)))
}

/// delete_skill
///
/// [Admin Route] Removes a skill.
#[utoipa::path(
    delete,
    path = "/skills/{id}",
    params(("id" = Uuid, Path, description = "Skill ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_skill(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    user.require_admin()?;
    if state.repo.delete_skill(id).await? {
        Ok(Json(ApiResponse::deleted("Skill")))
    } else {
        Err(ApiError::not_found("Skill"))
    }
}

// --- Upload Handlers ---

/// get_upload_url
///
/// [Admin Route] Issues a short-lived presigned URL for a direct
/// client-to-bucket upload (profile image, resume, project screenshots).
/// The key is a fresh UUID under `uploads/`, keeping the original filename out
/// of the bucket; only its extension survives.
#[utoipa::path(
    post,
    path = "/upload/presigned",
    request_body = UploadUrlRequest,
    responses((status = 200, description = "Upload URL", body = UploadUrlResponse))
)]
pub async fn get_upload_url(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UploadUrlRequest>,
) -> Result<Json<ApiResponse<UploadUrlResponse>>, ApiError> {
    user.require_admin()?;

    if payload.filename.trim().is_empty() {
        return Err(ApiError::Validation("Please provide a filename".to_string()));
    }

    let extension = std::path::Path::new(&payload.filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("bin");
    let file_key =
        crate::storage::sanitize_key(&format!("uploads/{}.{}", Uuid::new_v4(), extension));

    let upload_url = state
        .storage
        .presigned_upload_url(&file_key, &payload.content_type)
        .await?;

    Ok(Json(ApiResponse::data(UploadUrlResponse {
        upload_url,
        file_key,
    })))
}

// --- Fallback Handlers ---

/// Unknown path: keep the envelope shape even for routing misses.
pub async fn not_found_fallback() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Known path, wrong method: the contract promises a 405 envelope rather than
/// axum's default empty body.
pub async fn method_not_allowed_fallback() -> ApiError {
    ApiError::MethodNotAllowed
}
