//! Catalog browsing routes

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// GET /api/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>> {
    let subjects = state
        .db
        .list_subjects(query.search.as_deref(), query.show_all())
        .await?;

    let total_subjects = subjects.len();
    Ok(Json(DashboardResponse {
        subjects,
        total_subjects,
    }))
}

/// GET /api/courses/{subject_name}
pub async fn course_detail(
    State(state): State<AppState>,
    Path(subject_name): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<CourseDetailResponse>> {
    let subject = state
        .db
        .get_subject_by_name(&subject_name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Subject '{subject_name}'")))?;

    let show_all = query.show_all();
    let modules = state.db.get_modules_by_subject(subject.id, show_all).await?;

    let mut detailed = Vec::with_capacity(modules.len());
    for module in modules {
        let submodules = state.db.get_submodules_by_module(module.id, show_all).await?;

        let mut summaries = Vec::with_capacity(submodules.len());
        for sub in submodules {
            let question_count = state.db.count_questions(sub.id).await?;
            summaries.push(SubmoduleSummary {
                id: sub.id,
                name: sub.name,
                is_pro: sub.is_pro,
                difficulty: sub.difficulty,
                question_count,
            });
        }

        let total_sub_modules = summaries.len();
        detailed.push(ModuleWithSubmodules {
            id: module.id,
            name: module.name,
            is_active: module.is_active,
            sub_modules: summaries,
            total_sub_modules,
        });
    }

    let total_modules = detailed.len();
    Ok(Json(CourseDetailResponse {
        subject: SubjectSummary {
            id: subject.id,
            name: subject.name,
            description: subject.description,
        },
        modules: detailed,
        total_modules,
    }))
}

/// GET /api/modules/submodules/{module_id}
pub async fn module_submodules(
    State(state): State<AppState>,
    Path(module_id): Path<Uuid>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<SubmoduleListResponse>> {
    let sub_modules = state
        .db
        .get_submodules_by_module(module_id, query.show_all())
        .await?;

    if sub_modules.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No submodules for module {module_id}"
        )));
    }

    let total_sub_modules = sub_modules.len();
    Ok(Json(SubmoduleListResponse {
        sub_modules,
        total_sub_modules,
    }))
}

/// GET /api/courses/{subject_name}/{submodule_id}
///
/// Keyset-paginated questions of a submodule. The cursor is the last
/// question id of the previous page; one extra row is fetched to decide
/// `has_more`.
pub async fn submodule_questions(
    State(state): State<AppState>,
    Path((subject_name, submodule_id)): Path<(String, Uuid)>,
    Query(query): Query<QuestionsQuery>,
) -> Result<Json<QuestionPageResponse>> {
    let subject = state
        .db
        .get_subject_by_name(&subject_name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Subject '{subject_name}'")))?;

    let submodule = state
        .db
        .get_submodule(submodule_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Submodule {submodule_id}")))?;

    // The submodule must sit under a module of the requested subject.
    state
        .db
        .get_module_of_subject(submodule.module_id, subject.id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "Submodule {submodule_id} does not belong to subject '{subject_name}'"
            ))
        })?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let after = query.last_question_id.unwrap_or(0);

    let mut rows = state
        .db
        .get_questions_page(submodule_id, after, limit + 1)
        .await?;
    let has_more = rows.len() as i64 > limit;
    rows.truncate(limit as usize);

    let total_questions = state.db.count_questions(submodule_id).await?;
    let next_cursor = has_more.then(|| rows.last().map(|q| q.id)).flatten();

    Ok(Json(QuestionPageResponse {
        sub_module: SubmoduleRef {
            id: submodule.id,
            name: submodule.name,
            is_pro: submodule.is_pro,
        },
        questions: rows.into_iter().map(QuestionSummary::from).collect(),
        pagination: Pagination {
            has_more,
            next_cursor,
            total_questions,
        },
    }))
}
