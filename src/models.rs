use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

// --- Response Envelope ---

/// ApiResponse
///
/// The JSON envelope every endpoint speaks: `{ success, data, count?, message? }`
/// on the happy path, `{ success: false, error }` on failure (the error half is
/// produced by `ApiError`). `count` is only present on list responses, `message`
/// only where the original contract included one (deletes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            message: None,
        }
    }

    /// Singleton endpoints (About) may legitimately have nothing stored yet;
    /// the contract sends `data: null` rather than a 404.
    pub fn maybe(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            count: None,
            message: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(items.len()),
            data: Some(items),
            message: None,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// Delete responses: empty data object plus a human-readable message.
    pub fn deleted(resource: &str) -> Self {
        Self {
            success: true,
            data: Some(serde_json::json!({})),
            count: None,
            message: Some(format!("{resource} deleted successfully")),
        }
    }
}

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The admin identity record in the `users` table. The bcrypt hash never
/// leaves the process: it is skipped on serialization, and handlers expose
/// `PublicUser` instead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: String,
    // The RBAC field gating write endpoints: 'admin' is the only write role.
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// PublicUser
///
/// The client-safe projection of `User` returned by /auth/login and /auth/me.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

/// About
///
/// The single profile document presented on the landing page. Social links are
/// flattened into columns rather than nested, keeping the row shape trivial.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct About {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub years_of_experience: i32,
    pub bio: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    // Object-storage keys / URLs for profile media.
    pub profile_image: Option<String>,
    pub resume_url: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Education
///
/// One timeline entry (degree or program). `sort_order` drives display order,
/// `is_active` hides entries without deleting them.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Education {
    pub id: Uuid,
    pub degree: String,
    pub institution: String,
    pub field: Option<String>,
    pub grade: Option<String>,
    pub start_year: i32,
    pub end_year: Option<i32>,
    pub is_current: bool,
    pub description: Option<String>,
    pub certifications: Vec<String>,
    pub awards: Vec<String>,
    pub sort_order: i32,
    pub is_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Project
///
/// A showcased project. `slug` is the client-supplied public identifier (the
/// 3D scene references projects by it); it carries the uniqueness constraint
/// and is how routes address a project. `position` is the card's [x, y, z]
/// placement in the scene.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Project {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub full_description: String,
    pub tech_stack: Vec<String>,
    pub github_url: Option<String>,
    pub metrics: Option<String>,
    pub is_hero: bool,
    pub position: Vec<f64>,
    pub sort_order: i32,
    pub is_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Skill
///
/// One skill chip, grouped by category on the front end.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Skill {
    pub id: Uuid,
    pub category: String,
    pub name: String,
    pub level: String,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Enumerated Field Values ---

/// The closed set of skill categories accepted by validation. Stored as text;
/// membership is enforced here rather than with a database enum so adding a
/// category is a code change, not a migration.
pub const SKILL_CATEGORIES: [&str; 5] = [
    "Languages",
    "Frameworks & Libraries",
    "Tools & Technologies",
    "Databases",
    "Other",
];

pub const SKILL_LEVELS: [&str; 4] = ["Beginner", "Intermediate", "Advanced", "Expert"];

// --- Serde Defaults ---

fn default_true() -> bool {
    true
}

fn default_position() -> Vec<f64> {
    vec![0.0, 0.0, 0.0]
}

fn default_level() -> String {
    "Intermediate".to_string()
}

// --- Validation Helpers ---

/// Minimal email shape check: no whitespace, one '@', and a dot somewhere in
/// the domain part. Same strictness as the original `\S+@\S+\.\S+` rule.
fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let Some(domain) = parts.next() else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// GitHub links only: `https?://(www.)?github.com/...`.
fn is_valid_github_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let rest = rest.strip_prefix("www.").unwrap_or(rest);
            rest.starts_with("github.com/")
        }
        None => false,
    }
}

fn require(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(())
}

fn check_category(category: &str) -> Result<(), ApiError> {
    if !SKILL_CATEGORIES.contains(&category) {
        return Err(ApiError::Validation(format!(
            "'{category}' is not a valid skill category"
        )));
    }
    Ok(())
}

fn check_level(level: &str) -> Result<(), ApiError> {
    if !SKILL_LEVELS.contains(&level) {
        return Err(ApiError::Validation(format!(
            "'{level}' is not a valid skill level"
        )));
    }
    Ok(())
}

fn check_position(position: &[f64]) -> Result<(), ApiError> {
    if position.len() != 3 {
        return Err(ApiError::Validation(
            "Position must be an array of 3 numbers [x, y, z]".to_string(),
        ));
    }
    Ok(())
}

fn check_tech_stack(tech_stack: &[String]) -> Result<(), ApiError> {
    if tech_stack.iter().all(|t| t.trim().is_empty()) {
        return Err(ApiError::Validation("Tech stack cannot be empty".to_string()));
    }
    Ok(())
}

fn check_github_url(url: &str) -> Result<(), ApiError> {
    if !is_valid_github_url(url) {
        return Err(ApiError::Validation(
            "Please provide a valid GitHub URL".to_string(),
        ));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ApiError> {
    if !is_valid_email(email) {
        return Err(ApiError::Validation(
            "Please provide a valid email".to_string(),
        ));
    }
    Ok(())
}

// --- Request Payloads (Input Schemas) ---

/// AboutPayload
///
/// Full payload for PUT /about. The endpoint upserts, so the same shape serves
/// create and update and the required-field rules always apply.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AboutPayload {
    pub name: String,
    pub title: String,
    pub years_of_experience: i32,
    pub bio: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub profile_image: Option<String>,
    pub resume_url: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
}

impl AboutPayload {
    pub fn validate(&self) -> Result<(), ApiError> {
        require(&self.name, "Name is required")?;
        require(&self.title, "Professional title is required")?;
        require(&self.bio, "Bio is required")?;
        require(&self.email, "Email is required")?;
        if self.years_of_experience < 0 {
            return Err(ApiError::Validation(
                "Years of experience cannot be negative".to_string(),
            ));
        }
        check_email(&self.email)
    }
}

/// CreateEducationRequest
///
/// Input payload for POST /education. Optional flags fall back to schema
/// defaults when omitted from the JSON body.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateEducationRequest {
    pub degree: String,
    pub institution: String,
    pub field: Option<String>,
    pub grade: Option<String>,
    pub start_year: i32,
    pub end_year: Option<i32>,
    #[serde(default)]
    pub is_current: bool,
    pub description: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub awards: Vec<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CreateEducationRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require(&self.degree, "Degree is required")?;
        require(&self.institution, "Institution name is required")
    }
}

/// UpdateEducationRequest
///
/// Partial update: only provided fields are validated and written, absent
/// fields keep their stored values (COALESCE at the repository layer).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateEducationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_current: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awards: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateEducationRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(degree) = &self.degree {
            require(degree, "Degree is required")?;
        }
        if let Some(institution) = &self.institution {
            require(institution, "Institution name is required")?;
        }
        Ok(())
    }
}

/// CreateProjectRequest
///
/// Input payload for POST /projects. The slug is chosen by the client (the
/// scene data references it) and must be unique.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateProjectRequest {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub full_description: String,
    pub tech_stack: Vec<String>,
    pub github_url: Option<String>,
    pub metrics: Option<String>,
    #[serde(default)]
    pub is_hero: bool,
    #[serde(default = "default_position")]
    pub position: Vec<f64>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CreateProjectRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require(&self.slug, "Project id is required")?;
        require(&self.title, "Project title is required")?;
        require(&self.description, "Short description is required")?;
        require(&self.full_description, "Full description is required")?;
        if self.tech_stack.is_empty() {
            return Err(ApiError::Validation(
                "At least one technology is required".to_string(),
            ));
        }
        check_tech_stack(&self.tech_stack)?;
        if let Some(url) = self.github_url.as_deref().filter(|u| !u.is_empty()) {
            check_github_url(url)?;
        }
        check_position(&self.position)
    }
}

/// UpdateProjectRequest
///
/// Partial update payload for PUT /projects/{slug}. The slug itself is
/// immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hero: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateProjectRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            require(title, "Project title is required")?;
        }
        if let Some(description) = &self.description {
            require(description, "Short description is required")?;
        }
        if let Some(full_description) = &self.full_description {
            require(full_description, "Full description is required")?;
        }
        if let Some(tech_stack) = &self.tech_stack {
            if tech_stack.is_empty() {
                return Err(ApiError::Validation(
                    "At least one technology is required".to_string(),
                ));
            }
            check_tech_stack(tech_stack)?;
        }
        if let Some(url) = self.github_url.as_deref().filter(|u| !u.is_empty()) {
            check_github_url(url)?;
        }
        if let Some(position) = &self.position {
            check_position(position)?;
        }
        Ok(())
    }
}

/// CreateSkillRequest
///
/// Input payload for POST /skills. Category and level are checked against the
/// closed sets above.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateSkillRequest {
    pub category: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl CreateSkillRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require(&self.name, "Skill name is required")?;
        require(&self.category, "Skill category is required")?;
        check_category(&self.category)?;
        check_level(&self.level)
    }
}

/// UpdateSkillRequest
///
/// Partial update payload for PUT /skills/{id}.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateSkillRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateSkillRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            require(name, "Skill name is required")?;
        }
        if let Some(category) = &self.category {
            check_category(category)?;
        }
        if let Some(level) = &self.level {
            check_level(level)?;
        }
        Ok(())
    }
}

// --- Auth Payloads ---

/// LoginRequest
///
/// Credentials for POST /auth/login. The password is only compared against the
/// stored bcrypt hash and never persisted or logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// LoginResponse
///
/// A signed bearer token plus the client-safe user projection.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

// --- Upload Payloads ---

/// UploadUrlRequest
///
/// Input payload for requesting a short-lived upload URL (POST /upload/presigned).
/// The server uses these fields to derive the object key and constrain the
/// generated URL to the declared content type.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UploadUrlRequest {
    /// The original filename, used to derive the file extension.
    #[schema(example = "resume.pdf")]
    pub filename: String,
    /// The MIME type the upload will be constrained to.
    #[schema(example = "application/pdf")]
    pub content_type: String,
}

/// UploadUrlResponse
///
/// Output schema containing the temporary URL for the client's direct PUT and
/// the object key to store on the referencing record.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UploadUrlResponse {
    pub upload_url: String,
    pub file_key: String,
}
