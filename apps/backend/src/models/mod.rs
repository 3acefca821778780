//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from quiz-core
pub use quiz_core::types::{
    AnalyticsReport, Attempt, Mapping, McqOption, QuestionAnswer, QuestionTag, QuestionType,
    RawQuestion,
};

// === Database Entity Types ===

/// Top-level catalog entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Module under a subject
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Module {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Leaf quiz unit under a module
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Submodule {
    pub id: Uuid,
    pub module_id: Uuid,
    pub name: String,
    pub difficulty: Option<String>,
    pub is_pro: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Question stored in PostgreSQL. Type-specific payloads live in jsonb
/// columns; only the columns matching `question_type` are populated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbQuestion {
    pub id: i64,
    pub submodule_id: Uuid,
    pub question_text: String,
    pub question_type: String,
    pub options: Option<Json<Vec<McqOption>>>,
    pub correct_answer: Option<bool>,
    pub blanks: Option<Json<Vec<String>>>,
    pub left_items: Option<Json<Vec<String>>>,
    pub right_items: Option<Json<Vec<String>>>,
    pub correct_mappings: Option<Json<Vec<Mapping>>>,
    pub created_at: DateTime<Utc>,
}

/// User account keyed by external Google id
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub google_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    pub is_subscribed: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// One stored quiz attempt (user x submodule) with per-question answers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttemptRow {
    pub id: Uuid,
    pub google_id: String,
    pub subject_id: Uuid,
    pub submodule_id: Uuid,
    pub tag_counts: Option<Json<serde_json::Value>>,
    pub question_answers: Json<Vec<QuestionAnswer>>,
    pub total_time_spent: i32,
    pub correct_answers: i32,
    pub incorrect_answers: i32,
    pub progress: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl AttemptRow {
    /// Convert to the reducer input type
    pub fn to_core_attempt(&self) -> Attempt {
        Attempt {
            correct_answers: self.correct_answers.max(0) as u32,
            incorrect_answers: self.incorrect_answers.max(0) as u32,
            total_time_spent: self.total_time_spent.max(0) as u32,
            question_answers: self.question_answers.0.clone(),
            completed_at: self.updated_at,
        }
    }
}

/// Mock payment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub card_last_four: String,
    pub amount: f64,
    pub payment_status: String,
    pub payment_date: DateTime<Utc>,
}

/// Stored contact-form message
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

// === Auth Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct GoogleLoginRequest {
    pub token: String,
}

/// User fields exposed to the client after login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthUser {
    pub google_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    pub is_subscribed: bool,
    pub is_admin: bool,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            google_id: user.google_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            picture: user.picture.clone(),
            is_subscribed: user.is_subscribed,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GoogleLoginResponse {
    pub user: AuthUser,
    pub token: String,
}

// === Course Browsing Types ===

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub search: Option<String>,
    pub include_disabled: Option<String>,
}

impl DashboardQuery {
    /// The original client sends "1" or "true" for this flag.
    pub fn show_all(&self) -> bool {
        matches!(self.include_disabled.as_deref(), Some("1") | Some("true"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub subjects: Vec<Subject>,
    pub total_subjects: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmoduleSummary {
    pub id: Uuid,
    pub name: String,
    pub is_pro: bool,
    pub difficulty: Option<String>,
    pub question_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModuleWithSubmodules {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub sub_modules: Vec<SubmoduleSummary>,
    pub total_sub_modules: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CourseDetailResponse {
    pub subject: SubjectSummary,
    pub modules: Vec<ModuleWithSubmodules>,
    pub total_modules: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmoduleListResponse {
    pub sub_modules: Vec<Submodule>,
    pub total_sub_modules: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QuestionsQuery {
    pub last_question_id: Option<i64>,
    pub limit: Option<i64>,
    pub include_disabled: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmoduleRef {
    pub id: Uuid,
    pub name: String,
    pub is_pro: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub id: i64,
    pub question_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<McqOption>>,
}

impl From<DbQuestion> for QuestionSummary {
    fn from(q: DbQuestion) -> Self {
        Self {
            id: q.id,
            question_text: q.question_text,
            options: q.options.map(|o| o.0),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Pagination {
    pub has_more: bool,
    pub next_cursor: Option<i64>,
    pub total_questions: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionPageResponse {
    pub sub_module: SubmoduleRef,
    pub questions: Vec<QuestionSummary>,
    pub pagination: Pagination,
}

// === Admin Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSubjectRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub id: Uuid,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateModuleRequest {
    pub name: String,
    pub subject_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSubmoduleRequest {
    pub name: String,
    pub module_id: Uuid,
    pub difficulty: Option<String>,
    #[serde(default)]
    pub is_pro: bool,
}

/// Body for question create/update. Payload fields are all optional;
/// which ones matter depends on `question_type`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QuestionBody {
    pub question_text: String,
    pub question_type: Option<String>,
    #[serde(default)]
    pub options: Vec<McqOption>,
    pub correct_answer: Option<bool>,
    #[serde(default)]
    pub blanks: Vec<String>,
    #[serde(default)]
    pub left_items: Vec<String>,
    #[serde(default)]
    pub right_items: Vec<String>,
    #[serde(default)]
    pub correct_mappings: Vec<Mapping>,
}

impl QuestionBody {
    /// Question type with the mcq fallback applied.
    pub fn resolved_type(&self) -> QuestionType {
        self.question_type
            .as_deref()
            .map(QuestionType::from_str_lossy)
            .unwrap_or_default()
    }
}

impl From<RawQuestion> for QuestionBody {
    fn from(raw: RawQuestion) -> Self {
        Self {
            question_text: raw.question_text,
            question_type: raw.question_type,
            options: raw.options,
            correct_answer: raw.correct_answer,
            blanks: raw.blanks,
            left_items: raw.left_items,
            right_items: raw.right_items,
            correct_mappings: raw.correct_mappings,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateQuestionRequest {
    pub submodule_id: Uuid,
    #[serde(flatten)]
    pub question: QuestionBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmoduleQuestionsResponse {
    pub submodule: SubmoduleWithQuestions,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmoduleWithQuestions {
    pub name: String,
    pub difficulty: Option<String>,
    pub is_pro: bool,
    pub questions: Vec<DbQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub submodule: Submodule,
    pub questions_count: usize,
}

// === User / Analytics Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<DbQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    pub google_id: String,
    pub submodule_id: Uuid,
    pub user_answer: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NoteRequest {
    pub google_id: String,
    pub submodule_id: Uuid,
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TagRequest {
    pub google_id: String,
    pub submodule_id: Uuid,
    pub tag: QuestionTag,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnalyticsRequest {
    pub google_id: String,
    pub subject_id: Uuid,
    pub submodule_id: Uuid,
    pub tag_counts: Option<serde_json::Value>,
    pub question_answers: Vec<QuestionAnswer>,
    #[serde(default)]
    pub total_time_spent: i32,
    #[serde(default)]
    pub correct_answers: i32,
    #[serde(default)]
    pub incorrect_answers: i32,
    pub progress: Option<f64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    pub google_id: String,
    pub submodule_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub response_data: AnalyticsReport,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttemptedQuery {
    pub google_id: String,
    pub subject_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttemptedResponse {
    pub attempted_submodules: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetQuizRequest {
    pub google_id: String,
    pub submodule_id: Uuid,
}

// === Payment Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessPaymentRequest {
    pub email: String,
    pub card_number: String,
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessPaymentResponse {
    pub subscription_status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<bool>,
}

// === Contact Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}
