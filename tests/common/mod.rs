#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use portfolio_api::{
    AppState,
    auth::Claims,
    config::{AppConfig, Env},
    models::{
        About, AboutPayload, CreateEducationRequest, CreateProjectRequest, CreateSkillRequest,
        Education, Project, Skill, UpdateEducationRequest, UpdateProjectRequest,
        UpdateSkillRequest, User,
    },
    repository::Repository,
    storage::MockStorageService,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// --- In-Memory Repository ---

/// A stateful in-memory `Repository` so handler and full-router tests can run
/// create/read/update/delete sequences without a database. Duplicate project
/// slugs reproduce the unique-violation error shape Postgres would raise.
#[derive(Default)]
pub struct MemoryRepo {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    about: Option<About>,
    education: Vec<Education>,
    projects: Vec<Project>,
    skills: Vec<Skill>,
    users: Vec<User>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let repo = Self::default();
        repo.inner.lock().unwrap().users = users;
        repo
    }

    pub fn seed_project(&self, project: Project) {
        self.inner.lock().unwrap().projects.push(project);
    }

    pub fn seed_skill(&self, skill: Skill) {
        self.inner.lock().unwrap().skills.push(skill);
    }

    pub fn seed_education(&self, entry: Education) {
        self.inner.lock().unwrap().education.push(entry);
    }
}

// --- Fake Unique Violation ---

/// Mirrors the error Postgres raises on a duplicate key so the 23505 -> 400
/// mapping is exercised without a live database.
#[derive(Debug)]
pub struct FakeUniqueViolation {
    constraint: &'static str,
}

impl std::fmt::Display for FakeUniqueViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "duplicate key value violates unique constraint \"{}\"",
            self.constraint
        )
    }
}

impl std::error::Error for FakeUniqueViolation {}

impl sqlx::error::DatabaseError for FakeUniqueViolation {
    fn message(&self) -> &str {
        "duplicate key value violates unique constraint"
    }

    fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
        Some("23505".into())
    }

    fn constraint(&self) -> Option<&str> {
        Some(self.constraint)
    }

    fn kind(&self) -> sqlx::error::ErrorKind {
        sqlx::error::ErrorKind::UniqueViolation
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }
}

pub fn unique_violation(constraint: &'static str) -> sqlx::Error {
    sqlx::Error::Database(Box::new(FakeUniqueViolation { constraint }))
}

#[async_trait]
impl Repository for MemoryRepo {
    async fn get_about(&self) -> Result<Option<About>, sqlx::Error> {
        Ok(self.inner.lock().unwrap().about.clone())
    }

    async fn upsert_about(&self, payload: AboutPayload) -> Result<About, sqlx::Error> {
        let mut state = self.inner.lock().unwrap();
        let now = Utc::now();
        let (id, created_at) = match &state.about {
            Some(existing) => (existing.id, existing.created_at),
            None => (Uuid::new_v4(), now),
        };
        let about = About {
            id,
            name: payload.name,
            title: payload.title,
            years_of_experience: payload.years_of_experience,
            bio: payload.bio,
            email: payload.email,
            phone: payload.phone,
            location: payload.location,
            profile_image: payload.profile_image,
            resume_url: payload.resume_url,
            linkedin: payload.linkedin,
            github: payload.github,
            twitter: payload.twitter,
            created_at,
            updated_at: now,
        };
        state.about = Some(about.clone());
        Ok(about)
    }

    async fn list_education(&self, active_only: bool) -> Result<Vec<Education>, sqlx::Error> {
        let mut entries: Vec<Education> = self
            .inner
            .lock()
            .unwrap()
            .education
            .iter()
            .filter(|e| !active_only || e.is_active)
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(b.start_year.cmp(&a.start_year))
        });
        Ok(entries)
    }

    async fn create_education(
        &self,
        req: CreateEducationRequest,
    ) -> Result<Education, sqlx::Error> {
        let now = Utc::now();
        let entry = Education {
            id: Uuid::new_v4(),
            degree: req.degree,
            institution: req.institution,
            field: req.field,
            grade: req.grade,
            start_year: req.start_year,
            end_year: req.end_year,
            is_current: req.is_current,
            description: req.description,
            certifications: req.certifications,
            awards: req.awards,
            sort_order: req.sort_order,
            is_active: req.is_active,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().education.push(entry.clone());
        Ok(entry)
    }

    async fn update_education(
        &self,
        id: Uuid,
        req: UpdateEducationRequest,
    ) -> Result<Option<Education>, sqlx::Error> {
        let mut state = self.inner.lock().unwrap();
        let Some(entry) = state.education.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        if let Some(v) = req.degree {
            entry.degree = v;
        }
        if let Some(v) = req.institution {
            entry.institution = v;
        }
        if let Some(v) = req.field {
            entry.field = Some(v);
        }
        if let Some(v) = req.grade {
            entry.grade = Some(v);
        }
        if let Some(v) = req.start_year {
            entry.start_year = v;
        }
        if let Some(v) = req.end_year {
            entry.end_year = Some(v);
        }
        if let Some(v) = req.is_current {
            entry.is_current = v;
        }
        if let Some(v) = req.description {
            entry.description = Some(v);
        }
        if let Some(v) = req.certifications {
            entry.certifications = v;
        }
        if let Some(v) = req.awards {
            entry.awards = v;
        }
        if let Some(v) = req.sort_order {
            entry.sort_order = v;
        }
        if let Some(v) = req.is_active {
            entry.is_active = v;
        }
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn delete_education(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut state = self.inner.lock().unwrap();
        let before = state.education.len();
        state.education.retain(|e| e.id != id);
        Ok(state.education.len() < before)
    }

    async fn list_projects(&self, active_only: bool) -> Result<Vec<Project>, sqlx::Error> {
        let mut projects: Vec<Project> = self
            .inner
            .lock()
            .unwrap()
            .projects
            .iter()
            .filter(|p| !active_only || p.is_active)
            .cloned()
            .collect();
        // Same ordering as the Postgres queries, down to the recency tiebreak.
        projects.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(projects)
    }

    async fn get_project(&self, slug: &str) -> Result<Option<Project>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .projects
            .iter()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn create_project(&self, req: CreateProjectRequest) -> Result<Project, sqlx::Error> {
        let mut state = self.inner.lock().unwrap();
        if state.projects.iter().any(|p| p.slug == req.slug) {
            return Err(unique_violation("projects_slug_key"));
        }
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            slug: req.slug,
            title: req.title,
            description: req.description,
            full_description: req.full_description,
            tech_stack: req.tech_stack,
            github_url: req.github_url,
            metrics: req.metrics,
            is_hero: req.is_hero,
            position: req.position,
            sort_order: req.sort_order,
            is_active: req.is_active,
            created_at: now,
            updated_at: now,
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        slug: &str,
        req: UpdateProjectRequest,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut state = self.inner.lock().unwrap();
        let Some(project) = state.projects.iter_mut().find(|p| p.slug == slug) else {
            return Ok(None);
        };
        if let Some(v) = req.title {
            project.title = v;
        }
        if let Some(v) = req.description {
            project.description = v;
        }
        if let Some(v) = req.full_description {
            project.full_description = v;
        }
        if let Some(v) = req.tech_stack {
            project.tech_stack = v;
        }
        if let Some(v) = req.github_url {
            project.github_url = Some(v);
        }
        if let Some(v) = req.metrics {
            project.metrics = Some(v);
        }
        if let Some(v) = req.is_hero {
            project.is_hero = v;
        }
        if let Some(v) = req.position {
            project.position = v;
        }
        if let Some(v) = req.sort_order {
            project.sort_order = v;
        }
        if let Some(v) = req.is_active {
            project.is_active = v;
        }
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, slug: &str) -> Result<bool, sqlx::Error> {
        let mut state = self.inner.lock().unwrap();
        let before = state.projects.len();
        state.projects.retain(|p| p.slug != slug);
        Ok(state.projects.len() < before)
    }

    async fn list_skills(
        &self,
        category: Option<String>,
        active_only: bool,
    ) -> Result<Vec<Skill>, sqlx::Error> {
        let mut skills: Vec<Skill> = self
            .inner
            .lock()
            .unwrap()
            .skills
            .iter()
            .filter(|s| category.as_deref().is_none_or(|c| s.category == c))
            .filter(|s| !active_only || s.is_active)
            .cloned()
            .collect();
        skills.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then(a.sort_order.cmp(&b.sort_order))
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(skills)
    }

    async fn create_skill(&self, req: CreateSkillRequest) -> Result<Skill, sqlx::Error> {
        let now = Utc::now();
        let skill = Skill {
            id: Uuid::new_v4(),
            category: req.category,
            name: req.name,
            level: req.level,
            icon: req.icon,
            sort_order: req.sort_order,
            is_active: req.is_active,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().skills.push(skill.clone());
        Ok(skill)
    }

    async fn update_skill(
        &self,
        id: Uuid,
        req: UpdateSkillRequest,
    ) -> Result<Option<Skill>, sqlx::Error> {
        let mut state = self.inner.lock().unwrap();
        let Some(skill) = state.skills.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(v) = req.category {
            skill.category = v;
        }
        if let Some(v) = req.name {
            skill.name = v;
        }
        if let Some(v) = req.level {
            skill.level = v;
        }
        if let Some(v) = req.icon {
            skill.icon = Some(v);
        }
        if let Some(v) = req.sort_order {
            skill.sort_order = v;
        }
        if let Some(v) = req.is_active {
            skill.is_active = v;
        }
        skill.updated_at = Utc::now();
        Ok(Some(skill.clone()))
    }

    async fn delete_skill(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut state = self.inner.lock().unwrap();
        let before = state.skills.len();
        state.skills.retain(|s| s.id != id);
        Ok(state.skills.len() < before)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: &str,
    ) -> Result<User, sqlx::Error> {
        let mut state = self.inner.lock().unwrap();
        if state.users.iter().any(|u| u.email == email) {
            return Err(unique_violation("users_email_key"));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }
}

// --- State / User / Token Helpers ---

pub const TEST_JWT_SECRET: &str = "super-secure-test-secret-value-local";

pub fn test_state(repo: MemoryRepo) -> AppState {
    AppState {
        repo: Arc::new(repo),
        storage: Arc::new(MockStorageService::new()),
        config: AppConfig::default(),
    }
}

pub fn test_state_with(repo: MemoryRepo, storage: MockStorageService, env: Env) -> AppState {
    let mut config = AppConfig::default();
    config.env = env;
    AppState {
        repo: Arc::new(repo),
        storage: Arc::new(storage),
        config,
    }
}

/// Low bcrypt cost keeps the test suite fast; strength is irrelevant here.
pub fn test_user(email: &str, password: &str, role: &str, is_active: bool) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: bcrypt::hash(password, 4).unwrap(),
        name: "Test User".to_string(),
        role: role.to_string(),
        is_active,
        created_at: now,
        updated_at: now,
    }
}

pub fn admin_auth() -> portfolio_api::auth::AuthUser {
    portfolio_api::auth::AuthUser {
        id: Uuid::from_u128(1),
        email: "admin@example.com".to_string(),
        name: "Admin".to_string(),
        role: "admin".to_string(),
    }
}

pub fn viewer_auth() -> portfolio_api::auth::AuthUser {
    portfolio_api::auth::AuthUser {
        id: Uuid::from_u128(2),
        email: "viewer@example.com".to_string(),
        name: "Viewer".to_string(),
        role: "viewer".to_string(),
    }
}

/// Signs a token with the test secret. `exp_offset` is relative to now and may
/// be negative to produce an expired token (jsonwebtoken's default validation
/// allows 60s leeway, so use a generously negative offset).
pub fn create_token(user_id: Uuid, exp_offset: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iat: now as usize,
        exp: (now + exp_offset).max(0) as usize,
    };
    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

pub fn sample_project(slug: &str) -> Project {
    let now = Utc::now();
    Project {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: "Plant Digital Twin".to_string(),
        description: "Interactive P&ID explorer".to_string(),
        full_description: "A browsable piping and instrumentation model".to_string(),
        tech_stack: vec!["Rust".to_string(), "React".to_string()],
        github_url: Some("https://github.com/example/digital-twin".to_string()),
        metrics: None,
        is_hero: false,
        position: vec![0.0, 0.0, 0.0],
        sort_order: 0,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_skill(category: &str, name: &str) -> Skill {
    let now = Utc::now();
    Skill {
        id: Uuid::new_v4(),
        category: category.to_string(),
        name: name.to_string(),
        level: "Advanced".to_string(),
        icon: None,
        sort_order: 0,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_about_payload() -> AboutPayload {
    AboutPayload {
        name: "Jane Doe".to_string(),
        title: "Controls Engineer".to_string(),
        years_of_experience: 6,
        bio: "Builds industrial automation tooling".to_string(),
        email: "jane@example.com".to_string(),
        phone: None,
        location: Some("Pune".to_string()),
        profile_image: None,
        resume_url: None,
        linkedin: None,
        github: Some("https://github.com/janedoe".to_string()),
        twitter: None,
    }
}
