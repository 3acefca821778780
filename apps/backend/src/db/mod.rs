//! PostgreSQL database operations

use sqlx::types::Json;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Subject Repository ===

    /// Create a subject
    pub async fn create_subject(&self, name: &str, description: Option<&str>) -> Result<Subject> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            INSERT INTO subjects (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, is_active, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(subject)
    }

    /// Get subject by id
    pub async fn get_subject(&self, id: Uuid) -> Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, name, description, is_active, created_at, updated_at
            FROM subjects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subject)
    }

    /// Get subject by name, case-insensitive
    pub async fn get_subject_by_name(&self, name: &str) -> Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, name, description, is_active, created_at, updated_at
            FROM subjects
            WHERE name ILIKE $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subject)
    }

    /// List subjects with optional name/description search
    pub async fn list_subjects(
        &self,
        search: Option<&str>,
        include_disabled: bool,
    ) -> Result<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, name, description, is_active, created_at, updated_at
            FROM subjects
            WHERE ($1 OR is_active)
              AND ($2::text IS NULL
                   OR name ILIKE '%' || $2 || '%'
                   OR description ILIKE '%' || $2 || '%')
            ORDER BY name
            "#,
        )
        .bind(include_disabled)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    /// Update subject name and description
    pub async fn update_subject(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            UPDATE subjects
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subject)
    }

    /// Set a subject's active flag and cascade it to the subject's modules
    /// and their submodules. Cascade steps are independent statements; a
    /// failure partway leaves the deeper levels untouched.
    pub async fn set_subject_active(&self, id: Uuid, active: bool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE subjects
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(active)
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            UPDATE modules
            SET is_active = $2, updated_at = NOW()
            WHERE subject_id = $1
            "#,
        )
        .bind(id)
        .bind(active)
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            UPDATE submodules
            SET is_active = $2, updated_at = NOW()
            WHERE module_id IN (SELECT id FROM modules WHERE subject_id = $1)
            "#,
        )
        .bind(id)
        .bind(active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Module Repository ===

    /// Create a module under a subject
    pub async fn create_module(&self, name: &str, subject_id: Uuid) -> Result<Module> {
        let module = sqlx::query_as::<_, Module>(
            r#"
            INSERT INTO modules (subject_id, name)
            VALUES ($1, $2)
            RETURNING id, subject_id, name, is_active, created_at, updated_at
            "#,
        )
        .bind(subject_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(module)
    }

    /// Get module by id
    pub async fn get_module(&self, id: Uuid) -> Result<Option<Module>> {
        let module = sqlx::query_as::<_, Module>(
            r#"
            SELECT id, subject_id, name, is_active, created_at, updated_at
            FROM modules
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(module)
    }

    /// Get module by id, constrained to one subject
    pub async fn get_module_of_subject(
        &self,
        module_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Option<Module>> {
        let module = sqlx::query_as::<_, Module>(
            r#"
            SELECT id, subject_id, name, is_active, created_at, updated_at
            FROM modules
            WHERE id = $1 AND subject_id = $2
            "#,
        )
        .bind(module_id)
        .bind(subject_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(module)
    }

    /// Get all modules of a subject
    pub async fn get_modules_by_subject(
        &self,
        subject_id: Uuid,
        include_disabled: bool,
    ) -> Result<Vec<Module>> {
        let modules = sqlx::query_as::<_, Module>(
            r#"
            SELECT id, subject_id, name, is_active, created_at, updated_at
            FROM modules
            WHERE subject_id = $1 AND ($2 OR is_active)
            ORDER BY created_at
            "#,
        )
        .bind(subject_id)
        .bind(include_disabled)
        .fetch_all(&self.pool)
        .await?;

        Ok(modules)
    }

    /// Set a module's active flag and cascade to its submodules
    pub async fn set_module_active(&self, id: Uuid, active: bool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE modules
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(active)
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            UPDATE submodules
            SET is_active = $2, updated_at = NOW()
            WHERE module_id = $1
            "#,
        )
        .bind(id)
        .bind(active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Submodule Repository ===

    /// Create a submodule under a module
    pub async fn create_submodule(
        &self,
        name: &str,
        module_id: Uuid,
        difficulty: Option<&str>,
        is_pro: bool,
    ) -> Result<Submodule> {
        let submodule = sqlx::query_as::<_, Submodule>(
            r#"
            INSERT INTO submodules (module_id, name, difficulty, is_pro)
            VALUES ($1, $2, $3, $4)
            RETURNING id, module_id, name, difficulty, is_pro, is_active, created_at, updated_at
            "#,
        )
        .bind(module_id)
        .bind(name)
        .bind(difficulty)
        .bind(is_pro)
        .fetch_one(&self.pool)
        .await?;

        Ok(submodule)
    }

    /// Get submodule by id
    pub async fn get_submodule(&self, id: Uuid) -> Result<Option<Submodule>> {
        let submodule = sqlx::query_as::<_, Submodule>(
            r#"
            SELECT id, module_id, name, difficulty, is_pro, is_active, created_at, updated_at
            FROM submodules
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submodule)
    }

    /// Get all submodules of a module
    pub async fn get_submodules_by_module(
        &self,
        module_id: Uuid,
        include_disabled: bool,
    ) -> Result<Vec<Submodule>> {
        let submodules = sqlx::query_as::<_, Submodule>(
            r#"
            SELECT id, module_id, name, difficulty, is_pro, is_active, created_at, updated_at
            FROM submodules
            WHERE module_id = $1 AND ($2 OR is_active)
            ORDER BY created_at
            "#,
        )
        .bind(module_id)
        .bind(include_disabled)
        .fetch_all(&self.pool)
        .await?;

        Ok(submodules)
    }

    /// Set a submodule's active flag (no cascade below submodules)
    pub async fn set_submodule_active(&self, id: Uuid, active: bool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE submodules
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Question Repository ===

    /// Insert a question under a submodule
    pub async fn insert_question(
        &self,
        submodule_id: Uuid,
        q: &QuestionBody,
    ) -> Result<DbQuestion> {
        let question = sqlx::query_as::<_, DbQuestion>(
            r#"
            INSERT INTO questions (submodule_id, question_text, question_type, options,
                                   correct_answer, blanks, left_items, right_items, correct_mappings)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, submodule_id, question_text, question_type, options,
                      correct_answer, blanks, left_items, right_items, correct_mappings, created_at
            "#,
        )
        .bind(submodule_id)
        .bind(q.question_text.trim())
        .bind(q.resolved_type().as_str())
        .bind((!q.options.is_empty()).then(|| Json(&q.options)))
        .bind(q.correct_answer)
        .bind((!q.blanks.is_empty()).then(|| Json(&q.blanks)))
        .bind((!q.left_items.is_empty()).then(|| Json(&q.left_items)))
        .bind((!q.right_items.is_empty()).then(|| Json(&q.right_items)))
        .bind((!q.correct_mappings.is_empty()).then(|| Json(&q.correct_mappings)))
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    /// Update a question's text, type, and payload
    pub async fn update_question(&self, id: i64, q: &QuestionBody) -> Result<Option<DbQuestion>> {
        let question = sqlx::query_as::<_, DbQuestion>(
            r#"
            UPDATE questions
            SET question_text = $2, question_type = $3, options = $4, correct_answer = $5,
                blanks = $6, left_items = $7, right_items = $8, correct_mappings = $9
            WHERE id = $1
            RETURNING id, submodule_id, question_text, question_type, options,
                      correct_answer, blanks, left_items, right_items, correct_mappings, created_at
            "#,
        )
        .bind(id)
        .bind(q.question_text.trim())
        .bind(q.resolved_type().as_str())
        .bind((!q.options.is_empty()).then(|| Json(&q.options)))
        .bind(q.correct_answer)
        .bind((!q.blanks.is_empty()).then(|| Json(&q.blanks)))
        .bind((!q.left_items.is_empty()).then(|| Json(&q.left_items)))
        .bind((!q.right_items.is_empty()).then(|| Json(&q.right_items)))
        .bind((!q.correct_mappings.is_empty()).then(|| Json(&q.correct_mappings)))
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    /// Get all questions of a submodule in id order
    pub async fn get_questions_by_submodule(&self, submodule_id: Uuid) -> Result<Vec<DbQuestion>> {
        let questions = sqlx::query_as::<_, DbQuestion>(
            r#"
            SELECT id, submodule_id, question_text, question_type, options,
                   correct_answer, blanks, left_items, right_items, correct_mappings, created_at
            FROM questions
            WHERE submodule_id = $1
            ORDER BY id
            "#,
        )
        .bind(submodule_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    /// Keyset page of questions: ids strictly greater than `after`,
    /// in id order. Callers pass `limit + 1` to detect more rows.
    pub async fn get_questions_page(
        &self,
        submodule_id: Uuid,
        after: i64,
        limit: i64,
    ) -> Result<Vec<DbQuestion>> {
        let questions = sqlx::query_as::<_, DbQuestion>(
            r#"
            SELECT id, submodule_id, question_text, question_type, options,
                   correct_answer, blanks, left_items, right_items, correct_mappings, created_at
            FROM questions
            WHERE submodule_id = $1 AND id > $2
            ORDER BY id
            LIMIT $3
            "#,
        )
        .bind(submodule_id)
        .bind(after)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    /// Count questions of a submodule
    pub async fn count_questions(&self, submodule_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM questions WHERE submodule_id = $1
            "#,
        )
        .bind(submodule_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // === User Repository ===

    /// Upsert a user keyed by external Google id, refreshing profile fields
    pub async fn upsert_google_user(
        &self,
        google_id: &str,
        name: Option<&str>,
        email: Option<&str>,
        picture: Option<&str>,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (google_id, name, email, picture)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (google_id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                picture = EXCLUDED.picture
            RETURNING id, google_id, name, email, picture, is_subscribed, is_admin, created_at
            "#,
        )
        .bind(google_id)
        .bind(name)
        .bind(email)
        .bind(picture)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by Google id
    pub async fn get_user_by_google_id(&self, google_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, google_id, name, email, picture, is_subscribed, is_admin, created_at
            FROM users
            WHERE google_id = $1
            "#,
        )
        .bind(google_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, google_id, name, email, picture, is_subscribed, is_admin, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Mark a user as subscribed
    pub async fn set_user_subscribed(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET is_subscribed = TRUE WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Analytics Repository ===

    /// Insert one attempt row
    pub async fn insert_attempt(&self, req: &SubmitAnalyticsRequest) -> Result<AttemptRow> {
        let attempt = sqlx::query_as::<_, AttemptRow>(
            r#"
            INSERT INTO analytics (google_id, subject_id, submodule_id, tag_counts,
                                   question_answers, total_time_spent, correct_answers,
                                   incorrect_answers, progress)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, google_id, subject_id, submodule_id, tag_counts, question_answers,
                      total_time_spent, correct_answers, incorrect_answers, progress, updated_at
            "#,
        )
        .bind(&req.google_id)
        .bind(req.subject_id)
        .bind(req.submodule_id)
        .bind(req.tag_counts.as_ref().map(Json))
        .bind(Json(&req.question_answers))
        .bind(req.total_time_spent)
        .bind(req.correct_answers)
        .bind(req.incorrect_answers)
        .bind(req.progress)
        .fetch_one(&self.pool)
        .await?;

        Ok(attempt)
    }

    /// Get a user's attempts, optionally scoped to one submodule,
    /// oldest first
    pub async fn get_attempts(
        &self,
        google_id: &str,
        submodule_id: Option<Uuid>,
    ) -> Result<Vec<AttemptRow>> {
        let attempts = sqlx::query_as::<_, AttemptRow>(
            r#"
            SELECT id, google_id, subject_id, submodule_id, tag_counts, question_answers,
                   total_time_spent, correct_answers, incorrect_answers, progress, updated_at
            FROM analytics
            WHERE google_id = $1 AND ($2::uuid IS NULL OR submodule_id = $2)
            ORDER BY updated_at
            "#,
        )
        .bind(google_id)
        .bind(submodule_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }

    /// Most recent attempt for a (user, submodule) pair
    pub async fn get_latest_attempt(
        &self,
        google_id: &str,
        submodule_id: Uuid,
    ) -> Result<Option<AttemptRow>> {
        let attempt = sqlx::query_as::<_, AttemptRow>(
            r#"
            SELECT id, google_id, subject_id, submodule_id, tag_counts, question_answers,
                   total_time_spent, correct_answers, incorrect_answers, progress, updated_at
            FROM analytics
            WHERE google_id = $1 AND submodule_id = $2
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(google_id)
        .bind(submodule_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attempt)
    }

    /// Replace the stored answer array of one attempt row
    pub async fn update_attempt_answers(
        &self,
        attempt_id: Uuid,
        answers: &[QuestionAnswer],
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE analytics SET question_answers = $2 WHERE id = $1
            "#,
        )
        .bind(attempt_id)
        .bind(Json(answers))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete all attempts for a (user, submodule) pair
    pub async fn delete_attempts(&self, google_id: &str, submodule_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM analytics WHERE google_id = $1 AND submodule_id = $2
            "#,
        )
        .bind(google_id)
        .bind(submodule_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Distinct submodules a user has attempted within a subject
    pub async fn get_attempted_submodules(
        &self,
        google_id: &str,
        subject_id: Uuid,
    ) -> Result<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT submodule_id
            FROM analytics
            WHERE google_id = $1 AND subject_id = $2
            "#,
        )
        .bind(google_id)
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    // === Payment Repository ===

    /// Record a mock payment
    pub async fn insert_payment(
        &self,
        user_id: Uuid,
        email: &str,
        card_last_four: &str,
        amount: f64,
    ) -> Result<Payment> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (user_id, email, card_last_four, amount, payment_status)
            VALUES ($1, $2, $3, $4, 'completed')
            RETURNING id, user_id, email, card_last_four, amount, payment_status, payment_date
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(card_last_four)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(payment)
    }

    // === Contact Repository ===

    /// Store a contact-form message
    pub async fn insert_contact_message(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<ContactMessage> {
        let stored = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, message)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, message, sent_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }
}
