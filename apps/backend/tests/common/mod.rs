//! Common test utilities and fixtures for integration tests.
//!
//! Provides a TestContext wiring the real router to a test database,
//! with the Google verifier replaced by a stub.
//!
//! # Requirements
//! Integration tests require PostgreSQL (set DATABASE_URL env var).

pub mod fixtures;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use uuid::Uuid;

use quizdeck_backend::db::Database;
use quizdeck_backend::error::{ApiError, Result as ApiResult};
use quizdeck_backend::models::{QuestionBody, Subject, Submodule};
use quizdeck_backend::routes;
use quizdeck_backend::services::{GoogleProfile, GoogleTokenVerifier, JwtService};
use quizdeck_backend::AppState;

/// Google verifier stub: accepts tokens of the form `stub-token:<sub>`.
pub struct StubGoogleVerifier;

#[async_trait]
impl GoogleTokenVerifier for StubGoogleVerifier {
    async fn verify(&self, token: &str) -> ApiResult<GoogleProfile> {
        let sub = token
            .strip_prefix("stub-token:")
            .ok_or_else(|| ApiError::Unauthorized("invalid Google token".to_string()))?;

        Ok(GoogleProfile {
            sub: sub.to_string(),
            email: Some(format!("{sub}@example.com")),
            name: Some("Stub User".to_string()),
            picture: None,
        })
    }
}

/// Test context containing database connection and router.
///
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations().await.expect("Failed to run migrations");

        let db = Arc::new(db);

        let state = AppState {
            db: db.clone(),
            google: Arc::new(StubGoogleVerifier),
            jwt: Arc::new(JwtService::new("test-secret")),
        };

        let app = routes::create_router(state);

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a subject with a unique name.
    pub async fn create_subject(&self, name: &str) -> Subject {
        self.db
            .create_subject(name, Some("test subject"))
            .await
            .expect("Failed to create test subject")
    }

    /// Create a module under a subject.
    pub async fn create_module(&self, subject_id: Uuid, name: &str) -> Uuid {
        self.db
            .create_module(name, subject_id)
            .await
            .expect("Failed to create test module")
            .id
    }

    /// Create a submodule under a module.
    pub async fn create_submodule(&self, module_id: Uuid, name: &str) -> Submodule {
        self.db
            .create_submodule(name, module_id, Some("easy"), false)
            .await
            .expect("Failed to create test submodule")
    }

    /// Seed `count` multiple-choice questions, returning their ids in order.
    pub async fn seed_questions(&self, submodule_id: Uuid, count: usize) -> Vec<i64> {
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let body: QuestionBody =
                serde_json::from_value(fixtures::mcq_body(&format!("Question {i}")))
                    .expect("Failed to build question body");
            let question = self
                .db
                .insert_question(submodule_id, &body)
                .await
                .expect("Failed to seed question");
            ids.push(question.id);
        }
        ids
    }

    /// Create a user row directly, returning its id.
    pub async fn create_user(&self, google_id: &str, is_admin: bool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO users (google_id, name, email, is_admin)
             VALUES ($1, 'Test User', $2, $3)
             ON CONFLICT (google_id) DO UPDATE SET is_admin = EXCLUDED.is_admin
             RETURNING id",
        )
        .bind(google_id)
        .bind(format!("{google_id}@example.com"))
        .bind(is_admin)
        .fetch_one(self.db.pool())
        .await
        .expect("Failed to create test user")
    }

    /// Remove a subject tree; questions and submodules cascade via FKs.
    pub async fn cleanup_subject(&self, subject_id: Uuid) {
        let _ = sqlx::query("DELETE FROM analytics WHERE subject_id = $1")
            .bind(subject_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(subject_id)
            .execute(self.db.pool())
            .await;
    }

    /// Remove a user and its dependent rows.
    pub async fn cleanup_user(&self, google_id: &str) {
        let _ = sqlx::query("DELETE FROM analytics WHERE google_id = $1")
            .bind(google_id)
            .execute(self.db.pool())
            .await;

        let _ = sqlx::query("DELETE FROM users WHERE google_id = $1")
            .bind(google_id)
            .execute(self.db.pool())
            .await;
    }
}
