// Repository layer for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply embedded migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Users
    // ============================================

    /// Insert a user row for a new identity subject, or return the existing
    /// one (profile rows are created lazily on first write)
    pub async fn upsert_user(&self, input: CreateUser) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, public_name, role)
            VALUES ($1, $2, $3, 'member')
            ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, public_name, email, bio, linkedin, github, profile_image_url, role, created_at, updated_at
            "#,
        )
        .bind(input.id)
        .bind(&input.email)
        .bind(&input.public_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, public_name, email, bio, linkedin, github, profile_image_url, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, public_name, email, bio, linkedin, github, profile_image_url, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_users(&self) -> Result<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, public_name, email, bio, linkedin, github, profile_image_url, role, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                public_name = COALESCE($2, public_name),
                bio = COALESCE($3, bio),
                linkedin = COALESCE($4, linkedin),
                github = COALESCE($5, github),
                profile_image_url = COALESCE($6, profile_image_url),
                updated_at = now()
            WHERE id = $1
            RETURNING id, public_name, email, bio, linkedin, github, profile_image_url, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.public_name)
        .bind(&input.bio)
        .bind(&input.linkedin)
        .bind(&input.github)
        .bind(&input.profile_image_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn set_user_role(&self, id: Uuid, role: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET role = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, public_name, email, bio, linkedin, github, profile_image_url, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEvent) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (
                id, title, description, starts_at, ends_at, location,
                registration_deadline, capacity, status, tags, organizers,
                link, image_urls, questions
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, title, description, starts_at, ends_at, location, registration_deadline,
                      capacity, status, tags, organizers, link, image_urls, questions, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(&input.location)
        .bind(input.registration_deadline)
        .bind(input.capacity)
        .bind(&input.status)
        .bind(&input.tags)
        .bind(&input.organizers)
        .bind(&input.link)
        .bind(&input.image_urls)
        .bind(&input.questions)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, starts_at, ends_at, location, registration_deadline,
                   capacity, status, tags, organizers, link, image_urls, questions, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// List events, newest start first. `public_only` hides hidden/test events.
    pub async fn list_events(&self, public_only: bool) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, starts_at, ends_at, location, registration_deadline,
                   capacity, status, tags, organizers, link, image_urls, questions, created_at, updated_at
            FROM events
            WHERE (NOT $1) OR status = 'published'
            ORDER BY starts_at DESC
            "#,
        )
        .bind(public_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_event(&self, id: Uuid, input: UpdateEvent) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                starts_at = COALESCE($4, starts_at),
                ends_at = COALESCE($5, ends_at),
                location = COALESCE($6, location),
                registration_deadline = COALESCE($7, registration_deadline),
                capacity = COALESCE($8, capacity),
                status = COALESCE($9, status),
                tags = COALESCE($10, tags),
                organizers = COALESCE($11, organizers),
                link = COALESCE($12, link),
                image_urls = COALESCE($13, image_urls),
                questions = COALESCE($14, questions),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, starts_at, ends_at, location, registration_deadline,
                      capacity, status, tags, organizers, link, image_urls, questions, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.starts_at)
        .bind(input.ends_at)
        .bind(&input.location)
        .bind(input.registration_deadline)
        .bind(input.capacity)
        .bind(&input.status)
        .bind(&input.tags)
        .bind(&input.organizers)
        .bind(&input.link)
        .bind(&input.image_urls)
        .bind(&input.questions)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Delete an event. Its registrations are retained as history.
    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Positions
    // ============================================

    pub async fn create_position(&self, input: CreatePosition) -> Result<PositionRow> {
        let row = sqlx::query_as::<_, PositionRow>(
            r#"
            INSERT INTO positions (id, name, description, tags, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, tags, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.tags)
        .bind(&input.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_position(&self, id: Uuid) -> Result<Option<PositionRow>> {
        let row = sqlx::query_as::<_, PositionRow>(
            r#"
            SELECT id, name, description, tags, status, created_at, updated_at
            FROM positions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// List positions, newest first. `active_only` restricts to open ones.
    pub async fn list_positions(&self, active_only: bool) -> Result<Vec<PositionRow>> {
        let rows = sqlx::query_as::<_, PositionRow>(
            r#"
            SELECT id, name, description, tags, status, created_at, updated_at
            FROM positions
            WHERE (NOT $1) OR status = 'active'
            ORDER BY created_at DESC
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_position(
        &self,
        id: Uuid,
        input: UpdatePosition,
    ) -> Result<Option<PositionRow>> {
        let row = sqlx::query_as::<_, PositionRow>(
            r#"
            UPDATE positions
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                tags = COALESCE($4, tags),
                status = COALESCE($5, status),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, tags, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.tags)
        .bind(&input.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Applications
    // ============================================

    /// Submit an application. Returns None when the user already applied to
    /// this position (one application per pair, never deleted).
    pub async fn create_application(
        &self,
        input: CreateApplication,
    ) -> Result<Option<ApplicationRow>> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (id, position_id, user_id, name, email, answers, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            ON CONFLICT (position_id, user_id) DO NOTHING
            RETURNING id, position_id, user_id, name, email, answers, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.position_id)
        .bind(input.user_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.answers)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_application(
        &self,
        position_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ApplicationRow>> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, position_id, user_id, name, email, answers, status, created_at, updated_at
            FROM applications
            WHERE position_id = $1 AND user_id = $2
            "#,
        )
        .bind(position_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_applications(&self, position_id: Uuid) -> Result<Vec<ApplicationRow>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, position_id, user_id, name, email, answers, status, created_at, updated_at
            FROM applications
            WHERE position_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(position_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn set_application_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<Option<ApplicationRow>> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, position_id, user_id, name, email, answers, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Projects
    // ============================================

    pub async fn create_project(&self, input: CreateProject) -> Result<ProjectRow> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (id, title, description, languages, link, color, contributors, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, languages, link, color, contributors, image_url, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.languages)
        .bind(&input.link)
        .bind(&input.color)
        .bind(&input.contributors)
        .bind(&input.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Option<ProjectRow>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, title, description, languages, link, color, contributors, image_url, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectRow>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, title, description, languages, link, color, contributors, image_url, created_at, updated_at
            FROM projects
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_project(&self, id: Uuid, input: UpdateProject) -> Result<Option<ProjectRow>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                languages = COALESCE($4, languages),
                link = COALESCE($5, link),
                color = COALESCE($6, color),
                contributors = COALESCE($7, contributors),
                image_url = COALESCE($8, image_url),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, languages, link, color, contributors, image_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.languages)
        .bind(&input.link)
        .bind(&input.color)
        .bind(&input.contributors)
        .bind(&input.image_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_project(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Team roster
    // ============================================

    pub async fn create_team_member(&self, input: CreateTeamMember) -> Result<TeamMemberRow> {
        let row = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            INSERT INTO team_members (id, user_id, name, role, bio, image_url, linkedin, github, display_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, name, role, bio, image_url, linkedin, github, display_order, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.user_id)
        .bind(&input.name)
        .bind(&input.role)
        .bind(&input.bio)
        .bind(&input.image_url)
        .bind(&input.linkedin)
        .bind(&input.github)
        .bind(input.display_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_team_member(&self, id: Uuid) -> Result<Option<TeamMemberRow>> {
        let row = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            SELECT id, user_id, name, role, bio, image_url, linkedin, github, display_order, created_at, updated_at
            FROM team_members
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Roster in raw insertion order; display ordering (role rank, then
    /// custom order) is applied in the service layer
    pub async fn list_team_members(&self) -> Result<Vec<TeamMemberRow>> {
        let rows = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            SELECT id, user_id, name, role, bio, image_url, linkedin, github, display_order, created_at, updated_at
            FROM team_members
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_team_member(
        &self,
        id: Uuid,
        input: UpdateTeamMember,
    ) -> Result<Option<TeamMemberRow>> {
        let row = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            UPDATE team_members
            SET
                user_id = COALESCE($2, user_id),
                name = COALESCE($3, name),
                role = COALESCE($4, role),
                bio = COALESCE($5, bio),
                image_url = COALESCE($6, image_url),
                linkedin = COALESCE($7, linkedin),
                github = COALESCE($8, github),
                display_order = COALESCE($9, display_order),
                updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, name, role, bio, image_url, linkedin, github, display_order, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(input.user_id)
        .bind(&input.name)
        .bind(&input.role)
        .bind(&input.bio)
        .bind(&input.image_url)
        .bind(&input.linkedin)
        .bind(&input.github)
        .bind(input.display_order)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_team_member(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
