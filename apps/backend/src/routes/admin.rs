//! Catalog administration routes

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use quiz_core::RawQuestion;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// POST /api/admin/subjects
pub async fn create_subject(
    State(state): State<AppState>,
    Json(req): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<Subject>)> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Subject name is required".to_string()));
    }

    let subject = state
        .db
        .create_subject(name, req.description.as_deref())
        .await?;

    tracing::info!(subject_id = %subject.id, name = %subject.name, "subject created");
    Ok((StatusCode::CREATED, Json(subject)))
}

/// PUT /api/admin/subjects/{id}
pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSubjectRequest>,
) -> Result<Json<Subject>> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Subject name is required".to_string()));
    }

    let subject = state
        .db
        .update_subject(id, name, req.description.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Subject {id}")))?;

    Ok(Json(subject))
}

/// PATCH /api/admin/subjects/{id}/toggle
pub async fn toggle_subject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>> {
    state
        .db
        .get_subject(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Subject {id}")))?;

    state.db.set_subject_active(id, req.is_active).await?;

    tracing::info!(subject_id = %id, is_active = req.is_active, "subject toggled");
    Ok(Json(ToggleResponse {
        id,
        is_active: req.is_active,
    }))
}

/// POST /api/admin/modules
pub async fn create_module(
    State(state): State<AppState>,
    Json(req): Json<CreateModuleRequest>,
) -> Result<(StatusCode, Json<Module>)> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Module name is required".to_string()));
    }

    state
        .db
        .get_subject(req.subject_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Subject {}", req.subject_id)))?;

    let module = state.db.create_module(name, req.subject_id).await?;
    Ok((StatusCode::CREATED, Json(module)))
}

/// PATCH /api/admin/modules/{id}/toggle
pub async fn toggle_module(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>> {
    state
        .db
        .get_module(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Module {id}")))?;

    state.db.set_module_active(id, req.is_active).await?;

    Ok(Json(ToggleResponse {
        id,
        is_active: req.is_active,
    }))
}

/// POST /api/admin/sub-modules
pub async fn create_submodule(
    State(state): State<AppState>,
    Json(req): Json<CreateSubmoduleRequest>,
) -> Result<(StatusCode, Json<Submodule>)> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest(
            "Submodule name is required".to_string(),
        ));
    }

    state
        .db
        .get_module(req.module_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Module {}", req.module_id)))?;

    let submodule = state
        .db
        .create_submodule(name, req.module_id, req.difficulty.as_deref(), req.is_pro)
        .await?;

    Ok((StatusCode::CREATED, Json(submodule)))
}

/// PATCH /api/admin/sub-modules/{id}/toggle
pub async fn toggle_submodule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>> {
    state
        .db
        .get_submodule(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Submodule {id}")))?;

    state.db.set_submodule_active(id, req.is_active).await?;

    Ok(Json(ToggleResponse {
        id,
        is_active: req.is_active,
    }))
}

/// POST /api/admin/questions
pub async fn create_question(
    State(state): State<AppState>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<DbQuestion>)> {
    if req.question.question_text.trim().is_empty() {
        return Err(ApiError::BadRequest("Question text is required".to_string()));
    }

    state
        .db
        .get_submodule(req.submodule_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Submodule {}", req.submodule_id)))?;

    let question = state
        .db
        .insert_question(req.submodule_id, &req.question)
        .await?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// PUT /api/admin/questions/{id}
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<QuestionBody>,
) -> Result<Json<DbQuestion>> {
    if body.question_text.trim().is_empty() {
        return Err(ApiError::BadRequest("Question text is required".to_string()));
    }

    let question = state
        .db
        .update_question(id, &body)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Question {id}")))?;

    Ok(Json(question))
}

/// GET /api/admin/submodules/{submodule_id}
pub async fn submodule_with_questions(
    State(state): State<AppState>,
    Path(submodule_id): Path<Uuid>,
) -> Result<Json<SubmoduleQuestionsResponse>> {
    let submodule = state
        .db
        .get_submodule(submodule_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Submodule {submodule_id}")))?;

    let questions = state.db.get_questions_by_submodule(submodule_id).await?;

    Ok(Json(SubmoduleQuestionsResponse {
        submodule: SubmoduleWithQuestions {
            name: submodule.name,
            difficulty: submodule.difficulty,
            is_pro: submodule.is_pro,
            questions,
        },
    }))
}

/// POST /api/admin/submodules/upload
///
/// Multipart form: submodule fields plus one JSON or CSV question file.
/// Creates the submodule, then inserts questions in input order. An
/// insert failure aborts the loop without rolling back earlier rows.
pub async fn upload_submodule(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut name: Option<String> = None;
    let mut module_id: Option<Uuid> = None;
    let mut difficulty: Option<String> = None;
    let mut is_pro = false;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => {
                name = Some(read_text_field(field).await?);
            }
            "module_id" => {
                let raw = read_text_field(field).await?;
                module_id = Some(raw.trim().parse().map_err(|_| {
                    ApiError::BadRequest(format!("Invalid module_id '{raw}'"))
                })?);
            }
            "difficulty" => {
                difficulty = Some(read_text_field(field).await?);
            }
            "is_pro" => {
                let raw = read_text_field(field).await?;
                is_pro = matches!(raw.trim(), "1" | "true");
            }
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {e}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let name = name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Submodule name is required".to_string()))?;
    let module_id =
        module_id.ok_or_else(|| ApiError::BadRequest("module_id is required".to_string()))?;
    let (filename, contents) =
        file.ok_or_else(|| ApiError::BadRequest("Question file is required".to_string()))?;

    state
        .db
        .get_module(module_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Module {module_id}")))?;

    let questions = parse_upload(&filename, &contents)?;

    let submodule = state
        .db
        .create_submodule(name.trim(), module_id, difficulty.as_deref(), is_pro)
        .await?;

    let mut inserted = 0;
    for raw in questions {
        let body = QuestionBody::from(raw);
        state.db.insert_question(submodule.id, &body).await?;
        inserted += 1;
    }

    tracing::info!(
        submodule_id = %submodule.id,
        questions = inserted,
        file = %filename,
        "submodule uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            submodule,
            questions_count: inserted,
        }),
    ))
}

/// Dispatch on file extension; unknown extensions try JSON.
fn parse_upload(filename: &str, contents: &[u8]) -> Result<Vec<RawQuestion>> {
    let is_csv = filename
        .rsplit('.')
        .next()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let questions = if is_csv {
        let text = std::str::from_utf8(contents)
            .map_err(|_| ApiError::BadRequest("CSV file is not valid UTF-8".to_string()))?;
        quiz_core::parse_csv(text)?
    } else {
        quiz_core::parse_json(contents)?
    };

    Ok(questions)
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart field: {e}")))
}
