use crate::models::{
    About, AboutPayload, CreateEducationRequest, CreateProjectRequest, CreateSkillRequest,
    Education, Project, Skill, UpdateEducationRequest, UpdateProjectRequest, UpdateSkillRequest,
    User,
};
use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// The abstract contract for all persistence operations. Handlers talk to this
/// trait object only, so the concrete backend (Postgres in production, mocks in
/// tests) is swappable at the state-assembly seam.
///
/// Every method surfaces `sqlx::Error` so the handler layer can map failures
/// into the API taxonomy (unique violations become 400, the rest 500).
/// "Not found" is modeled as `Ok(None)` / `Ok(false)`, never as an error.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- About (singleton) ---
    async fn get_about(&self) -> Result<Option<About>, sqlx::Error>;
    /// Optimistic find-or-create: updates the existing document when one
    /// exists, inserts otherwise.
    async fn upsert_about(&self, payload: AboutPayload) -> Result<About, sqlx::Error>;

    // --- Education ---
    async fn list_education(&self, active_only: bool) -> Result<Vec<Education>, sqlx::Error>;
    async fn create_education(&self, req: CreateEducationRequest)
    -> Result<Education, sqlx::Error>;
    async fn update_education(
        &self,
        id: Uuid,
        req: UpdateEducationRequest,
    ) -> Result<Option<Education>, sqlx::Error>;
    /// Returns true when a row was deleted.
    async fn delete_education(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Projects (addressed by slug) ---
    async fn list_projects(&self, active_only: bool) -> Result<Vec<Project>, sqlx::Error>;
    async fn get_project(&self, slug: &str) -> Result<Option<Project>, sqlx::Error>;
    async fn create_project(&self, req: CreateProjectRequest) -> Result<Project, sqlx::Error>;
    async fn update_project(
        &self,
        slug: &str,
        req: UpdateProjectRequest,
    ) -> Result<Option<Project>, sqlx::Error>;
    async fn delete_project(&self, slug: &str) -> Result<bool, sqlx::Error>;

    // --- Skills ---
    async fn list_skills(
        &self,
        category: Option<String>,
        active_only: bool,
    ) -> Result<Vec<Skill>, sqlx::Error>;
    async fn create_skill(&self, req: CreateSkillRequest) -> Result<Skill, sqlx::Error>;
    async fn update_skill(
        &self,
        id: Uuid,
        req: UpdateSkillRequest,
    ) -> Result<Option<Skill>, sqlx::Error>;
    async fn delete_skill(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Users / Auth ---
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: &str,
    ) -> Result<User, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by Postgres.
/// Queries are runtime-checked (`query_as`) against the migration schema.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ABOUT_COLUMNS: &str = "id, name, title, years_of_experience, bio, email, phone, location, \
     profile_image, resume_url, linkedin, github, twitter, created_at, updated_at";

const EDUCATION_COLUMNS: &str = "id, degree, institution, field, grade, start_year, end_year, \
     is_current, description, certifications, awards, sort_order, is_active, created_at, updated_at";

// "position" is a reserved word in Postgres, hence the quoting.
const PROJECT_COLUMNS: &str = "id, slug, title, description, full_description, tech_stack, \
     github_url, metrics, is_hero, \"position\", sort_order, is_active, created_at, updated_at";

const SKILL_COLUMNS: &str =
    "id, category, name, level, icon, sort_order, is_active, created_at, updated_at";

#[async_trait]
impl Repository for PostgresRepository {
    /// The newest About row wins; older rows are legacy and ignored (the
    /// upsert path never creates a second one).
    async fn get_about(&self) -> Result<Option<About>, sqlx::Error> {
        sqlx::query_as::<_, About>(&format!(
            "SELECT {ABOUT_COLUMNS} FROM about ORDER BY created_at DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await
    }

    async fn upsert_about(&self, payload: AboutPayload) -> Result<About, sqlx::Error> {
        // Find-or-create. Single-admin writes make the lost-update window a
        // non-issue; last write wins either way.
        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM about LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        let sql = match existing {
            Some(_) => format!(
                "UPDATE about SET name = $2, title = $3, years_of_experience = $4, bio = $5, \
                 email = $6, phone = $7, location = $8, profile_image = $9, resume_url = $10, \
                 linkedin = $11, github = $12, twitter = $13, updated_at = NOW() \
                 WHERE id = $1 RETURNING {ABOUT_COLUMNS}"
            ),
            None => format!(
                "INSERT INTO about (id, name, title, years_of_experience, bio, email, phone, \
                 location, profile_image, resume_url, linkedin, github, twitter, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW(), NOW()) \
                 RETURNING {ABOUT_COLUMNS}"
            ),
        };

        let id = existing.map(|(id,)| id).unwrap_or_else(Uuid::new_v4);

        sqlx::query_as::<_, About>(&sql)
            .bind(id)
            .bind(payload.name)
            .bind(payload.title)
            .bind(payload.years_of_experience)
            .bind(payload.bio)
            .bind(payload.email)
            .bind(payload.phone)
            .bind(payload.location)
            .bind(payload.profile_image)
            .bind(payload.resume_url)
            .bind(payload.linkedin)
            .bind(payload.github)
            .bind(payload.twitter)
            .fetch_one(&self.pool)
            .await
    }

    /// Timeline ordering: explicit sort_order first, then most recent start year.
    async fn list_education(&self, active_only: bool) -> Result<Vec<Education>, sqlx::Error> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {EDUCATION_COLUMNS} FROM education"));
        if active_only {
            builder.push(" WHERE is_active = true");
        }
        builder.push(" ORDER BY sort_order ASC, start_year DESC");
        builder
            .build_query_as::<Education>()
            .fetch_all(&self.pool)
            .await
    }

    async fn create_education(
        &self,
        req: CreateEducationRequest,
    ) -> Result<Education, sqlx::Error> {
        sqlx::query_as::<_, Education>(&format!(
            "INSERT INTO education (id, degree, institution, field, grade, start_year, end_year, \
             is_current, description, certifications, awards, sort_order, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW(), NOW()) \
             RETURNING {EDUCATION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(req.degree)
        .bind(req.institution)
        .bind(req.field)
        .bind(req.grade)
        .bind(req.start_year)
        .bind(req.end_year)
        .bind(req.is_current)
        .bind(req.description)
        .bind(req.certifications)
        .bind(req.awards)
        .bind(req.sort_order)
        .bind(req.is_active)
        .fetch_one(&self.pool)
        .await
    }

    /// COALESCE keeps stored values for fields the payload omitted; only
    /// provided fields are written.
    async fn update_education(
        &self,
        id: Uuid,
        req: UpdateEducationRequest,
    ) -> Result<Option<Education>, sqlx::Error> {
        sqlx::query_as::<_, Education>(&format!(
            "UPDATE education SET \
                 degree = COALESCE($2, degree), \
                 institution = COALESCE($3, institution), \
                 field = COALESCE($4, field), \
                 grade = COALESCE($5, grade), \
                 start_year = COALESCE($6, start_year), \
                 end_year = COALESCE($7, end_year), \
                 is_current = COALESCE($8, is_current), \
                 description = COALESCE($9, description), \
                 certifications = COALESCE($10, certifications), \
                 awards = COALESCE($11, awards), \
                 sort_order = COALESCE($12, sort_order), \
                 is_active = COALESCE($13, is_active), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {EDUCATION_COLUMNS}"
        ))
        .bind(id)
        .bind(req.degree)
        .bind(req.institution)
        .bind(req.field)
        .bind(req.grade)
        .bind(req.start_year)
        .bind(req.end_year)
        .bind(req.is_current)
        .bind(req.description)
        .bind(req.certifications)
        .bind(req.awards)
        .bind(req.sort_order)
        .bind(req.is_active)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_education(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM education WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_projects(&self, active_only: bool) -> Result<Vec<Project>, sqlx::Error> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {PROJECT_COLUMNS} FROM projects"));
        if active_only {
            builder.push(" WHERE is_active = true");
        }
        builder.push(" ORDER BY sort_order ASC, created_at DESC");
        builder
            .build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await
    }

    async fn get_project(&self, slug: &str) -> Result<Option<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
    }

    /// The unique index on slug makes duplicate submissions fail with
    /// SQLSTATE 23505, which the error layer maps to 400 "already exists".
    async fn create_project(&self, req: CreateProjectRequest) -> Result<Project, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (id, slug, title, description, full_description, tech_stack, \
             github_url, metrics, is_hero, \"position\", sort_order, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW(), NOW()) \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(req.slug)
        .bind(req.title)
        .bind(req.description)
        .bind(req.full_description)
        .bind(req.tech_stack)
        .bind(req.github_url)
        .bind(req.metrics)
        .bind(req.is_hero)
        .bind(req.position)
        .bind(req.sort_order)
        .bind(req.is_active)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_project(
        &self,
        slug: &str,
        req: UpdateProjectRequest,
    ) -> Result<Option<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 full_description = COALESCE($4, full_description), \
                 tech_stack = COALESCE($5, tech_stack), \
                 github_url = COALESCE($6, github_url), \
                 metrics = COALESCE($7, metrics), \
                 is_hero = COALESCE($8, is_hero), \
                 \"position\" = COALESCE($9, \"position\"), \
                 sort_order = COALESCE($10, sort_order), \
                 is_active = COALESCE($11, is_active), \
                 updated_at = NOW() \
             WHERE slug = $1 RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(slug)
        .bind(req.title)
        .bind(req.description)
        .bind(req.full_description)
        .bind(req.tech_stack)
        .bind(req.github_url)
        .bind(req.metrics)
        .bind(req.is_hero)
        .bind(req.position)
        .bind(req.sort_order)
        .bind(req.is_active)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_project(&self, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Optional category/active filters composed with QueryBuilder for safe
    /// parameterization.
    async fn list_skills(
        &self,
        category: Option<String>,
        active_only: bool,
    ) -> Result<Vec<Skill>, sqlx::Error> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {SKILL_COLUMNS} FROM skills WHERE true"));
        if let Some(category) = category {
            builder.push(" AND category = ");
            builder.push_bind(category);
        }
        if active_only {
            builder.push(" AND is_active = true");
        }
        builder.push(" ORDER BY category ASC, sort_order ASC, created_at DESC");
        builder
            .build_query_as::<Skill>()
            .fetch_all(&self.pool)
            .await
    }

    async fn create_skill(&self, req: CreateSkillRequest) -> Result<Skill, sqlx::Error> {
        sqlx::query_as::<_, Skill>(&format!(
            "INSERT INTO skills (id, category, name, level, icon, sort_order, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW()) \
             RETURNING {SKILL_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(req.category)
        .bind(req.name)
        .bind(req.level)
        .bind(req.icon)
        .bind(req.sort_order)
        .bind(req.is_active)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_skill(
        &self,
        id: Uuid,
        req: UpdateSkillRequest,
    ) -> Result<Option<Skill>, sqlx::Error> {
        sqlx::query_as::<_, Skill>(&format!(
            "UPDATE skills SET \
                 category = COALESCE($2, category), \
                 name = COALESCE($3, name), \
                 level = COALESCE($4, level), \
                 icon = COALESCE($5, icon), \
                 sort_order = COALESCE($6, sort_order), \
                 is_active = COALESCE($7, is_active), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {SKILL_COLUMNS}"
        ))
        .bind(id)
        .bind(req.category)
        .bind(req.name)
        .bind(req.level)
        .bind(req.icon)
        .bind(req.sort_order)
        .bind(req.is_active)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_skill(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, role, is_active, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, role, is_active, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, name, role, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, true, NOW(), NOW()) \
             RETURNING id, email, password_hash, name, role, is_active, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }
}
