//! Core quiz library shared by the backend application.
//!
//! Provides:
//! - Parsers for bulk question import files (JSON and CSV)
//! - The analytics reducer that folds attempts into dashboard statistics
//! - Shared types (questions, answers, tags, reports)

pub mod analytics;
pub mod error;
pub mod import;
pub mod types;

pub use analytics::{reduce, ACTIVITY_WINDOW_DAYS};
pub use error::{ImportError, Result};
pub use import::{parse_csv, parse_json};
pub use types::{
    ActivityDay, AnalyticsReport, AnalyticsStats, Attempt, Mapping, McqOption, QuestionAnswer,
    QuestionClassification, QuestionTag, QuestionType, RawQuestion, TaggedQuestion, TimelinePoint,
};
