//! Core types for the quiz platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Question kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Mcq,
    #[serde(rename = "truefalse")]
    TrueFalse,
    #[serde(rename = "fillblanks")]
    FillBlanks,
    #[serde(rename = "matchfollowing")]
    MatchFollowing,
}

impl Default for QuestionType {
    fn default() -> Self {
        Self::Mcq
    }
}

impl QuestionType {
    /// Get the type name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mcq => "mcq",
            Self::TrueFalse => "truefalse",
            Self::FillBlanks => "fillblanks",
            Self::MatchFollowing => "matchfollowing",
        }
    }

    /// Parse from string. Unknown values map to `Mcq`, matching the
    /// lenient behavior of create and import.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "truefalse" => Self::TrueFalse,
            "fillblanks" => Self::FillBlanks,
            "matchfollowing" => Self::MatchFollowing,
            _ => Self::Mcq,
        }
    }
}

/// One choice of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqOption {
    pub option_text: String,
    pub is_correct: bool,
}

/// A left-to-right pairing for match-the-following questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub left_index: usize,
    pub right_index: usize,
}

/// Question as it appears in an uploaded import file (camelCase keys,
/// most fields optional depending on the question type).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawQuestion {
    pub question_text: String,
    pub question_type: Option<String>,
    pub options: Vec<McqOption>,
    pub correct_answer: Option<bool>,
    pub blanks: Vec<String>,
    pub left_items: Vec<String>,
    pub right_items: Vec<String>,
    pub correct_mappings: Vec<Mapping>,
}

impl RawQuestion {
    /// Resolved question type with the mcq fallback applied.
    pub fn resolved_type(&self) -> QuestionType {
        self.question_type
            .as_deref()
            .map(QuestionType::from_str_lossy)
            .unwrap_or_default()
    }
}

/// Review tag a user can attach to a question after answering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionTag {
    Ok,
    Bad,
    Important,
}

/// One answered question inside a stored attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<QuestionTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl QuestionAnswer {
    pub fn new(question_id: i64) -> Self {
        Self {
            question_id,
            user_answer: None,
            tag: None,
            notes: None,
        }
    }
}

/// One quiz attempt, the unit the analytics reducer folds over.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub total_time_spent: u32,
    pub question_answers: Vec<QuestionAnswer>,
    pub completed_at: DateTime<Utc>,
}

/// Rolled-up counters across all attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsStats {
    pub total_questions: usize,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    pub total_time_spent: u32,
    pub total_quizzes: usize,
    pub best_score: u32,
}

/// Question reference carried in a classification bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedQuestion {
    pub question_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Per-tag question buckets; `common` collects every answer with a note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionClassification {
    pub ok: Vec<TaggedQuestion>,
    pub bad: Vec<TaggedQuestion>,
    pub important: Vec<TaggedQuestion>,
    pub common: Vec<TaggedQuestion>,
}

/// One attempt on the score timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub label: String,
    pub score: u32,
    pub accuracy: u32,
    pub date: DateTime<Utc>,
}

/// Attempt count for one day of the activity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDay {
    pub day: String,
    pub count: usize,
}

/// Full analytics report for a user (optionally scoped to one submodule).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub stats: AnalyticsStats,
    pub question_classification: QuestionClassification,
    pub timeline: Vec<TimelinePoint>,
    pub activity: Vec<ActivityDay>,
}
