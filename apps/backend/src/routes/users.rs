//! Quiz taking and analytics routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use quiz_core::QuestionAnswer;
use serde_json::json;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// GET /api/users/submodules/{id}
pub async fn submodule_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionsResponse>> {
    let questions = state.db.get_questions_by_submodule(id).await?;

    if questions.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No questions for submodule {id}"
        )));
    }

    Ok(Json(QuestionsResponse { questions }))
}

/// POST /api/users/questions/{id}/attempt
///
/// Records the user's answer inside the latest analytics row for the
/// submodule, adding an entry for the question if none exists yet.
pub async fn record_attempt(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<serde_json::Value>> {
    let attempt = state
        .db
        .get_latest_attempt(&req.google_id, req.submodule_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No analytics row for submodule {}",
                req.submodule_id
            ))
        })?;

    let mut answers = attempt.question_answers.0;
    match answers.iter_mut().find(|a| a.question_id == question_id) {
        Some(entry) => entry.user_answer = Some(req.user_answer),
        None => {
            let mut entry = QuestionAnswer::new(question_id);
            entry.user_answer = Some(req.user_answer);
            answers.push(entry);
        }
    }

    state.db.update_attempt_answers(attempt.id, &answers).await?;

    Ok(Json(json!({ "question_id": question_id, "recorded": true })))
}

/// PUT /api/users/questions/{id}/note
pub async fn set_note(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    Json(req): Json<NoteRequest>,
) -> Result<Json<serde_json::Value>> {
    let attempt = state
        .db
        .get_latest_attempt(&req.google_id, req.submodule_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No analytics row for submodule {}",
                req.submodule_id
            ))
        })?;

    let mut answers = attempt.question_answers.0;
    let entry = answers
        .iter_mut()
        .find(|a| a.question_id == question_id)
        .ok_or_else(|| ApiError::NotFound(format!("Question {question_id} in attempt")))?;
    entry.notes = Some(req.note);

    state.db.update_attempt_answers(attempt.id, &answers).await?;

    Ok(Json(json!({ "question_id": question_id, "updated": true })))
}

/// PUT /api/users/questions/{id}/tag
pub async fn set_tag(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    Json(req): Json<TagRequest>,
) -> Result<Json<serde_json::Value>> {
    let attempt = state
        .db
        .get_latest_attempt(&req.google_id, req.submodule_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No analytics row for submodule {}",
                req.submodule_id
            ))
        })?;

    let mut answers = attempt.question_answers.0;
    let entry = answers
        .iter_mut()
        .find(|a| a.question_id == question_id)
        .ok_or_else(|| ApiError::NotFound(format!("Question {question_id} in attempt")))?;
    entry.tag = Some(req.tag);

    state.db.update_attempt_answers(attempt.id, &answers).await?;

    Ok(Json(json!({ "question_id": question_id, "updated": true })))
}

/// POST /api/users/submit-analytics
pub async fn submit_analytics(
    State(state): State<AppState>,
    Json(req): Json<SubmitAnalyticsRequest>,
) -> Result<(StatusCode, Json<AttemptRow>)> {
    if req.google_id.trim().is_empty() {
        return Err(ApiError::BadRequest("google_id is required".to_string()));
    }

    let attempt = state.db.insert_attempt(&req).await?;

    tracing::debug!(
        google_id = %attempt.google_id,
        submodule_id = %attempt.submodule_id,
        "attempt recorded"
    );
    Ok((StatusCode::CREATED, Json(attempt)))
}

/// GET /api/users/analytics
pub async fn analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>> {
    let rows = state
        .db
        .get_attempts(&query.google_id, query.submodule_id)
        .await?;

    if rows.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No analytics for user {}",
            query.google_id
        )));
    }

    let attempts: Vec<_> = rows.iter().map(AttemptRow::to_core_attempt).collect();
    let report = quiz_core::reduce(&attempts, Utc::now().date_naive());

    Ok(Json(AnalyticsResponse {
        response_data: report,
    }))
}

/// GET /api/users/attempted-submodule
pub async fn attempted_submodules(
    State(state): State<AppState>,
    Query(query): Query<AttemptedQuery>,
) -> Result<Json<AttemptedResponse>> {
    let attempted = state
        .db
        .get_attempted_submodules(&query.google_id, query.subject_id)
        .await?;

    Ok(Json(AttemptedResponse {
        attempted_submodules: attempted,
    }))
}

/// POST /api/users/reset-quiz
pub async fn reset_quiz(
    State(state): State<AppState>,
    Json(req): Json<ResetQuizRequest>,
) -> Result<Json<serde_json::Value>> {
    let deleted = state
        .db
        .delete_attempts(&req.google_id, req.submodule_id)
        .await?;

    if deleted == 0 {
        return Err(ApiError::NotFound(format!(
            "No attempts for submodule {}",
            req.submodule_id
        )));
    }

    Ok(Json(json!({ "deleted": deleted })))
}
